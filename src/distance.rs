//! Distance from a shared origin to delivery points.
//!
//! Geodesic distance on the WGS84 ellipsoid is the default. It ignores roads,
//! but needs no routing engine and is close enough to rank trips by cost.

use geo::{Distance, Geodesic, Haversine, Point};

use crate::model::Coordinate;

const METERS_PER_KM: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMethod {
    /// Ellipsoidal geodesic (Karney).
    #[default]
    Geodesic,
    /// Great-circle distance on a sphere. Faster, off by up to ~0.5%.
    Haversine,
}

impl DistanceMethod {
    /// Distance between two points in kilometers.
    pub fn distance_km(self, from: Coordinate, to: Coordinate) -> f64 {
        let from: Point<f64> = from.into();
        let to: Point<f64> = to.into();

        let meters = match self {
            DistanceMethod::Geodesic => Geodesic.distance(from, to),
            DistanceMethod::Haversine => Haversine.distance(from, to),
        };

        meters / METERS_PER_KM
    }
}

/// Geodesic distance between two points in kilometers.
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    DistanceMethod::Geodesic.distance_km(from, to)
}

/// Distance from `origin` to each destination, in destination order.
pub fn distances(
    origin: Coordinate,
    destinations: &[Coordinate],
    method: DistanceMethod,
) -> Vec<f64> {
    destinations
        .iter()
        .map(|destination| method.distance_km(origin, *destination))
        .collect()
}
