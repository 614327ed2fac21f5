//! Test fixtures for fleet-assign.
//!
//! Provides:
//! - Medellín-area addresses with known coordinates
//! - A stub geocoder that counts provider calls
//! - Builders for vehicles and orders

pub mod medellin_locations;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use fleet_assign::error::GeocodeError;
use fleet_assign::model::{GeocodedPoint, Order, Vehicle};
use fleet_assign::traits::Geocoder;

pub use medellin_locations::*;

/// Geocoder answering from a fixed table.
pub struct StubGeocoder {
    known: HashMap<String, Location>,
    calls: AtomicUsize,
}

impl StubGeocoder {
    pub fn new(locations: impl IntoIterator<Item = Location>) -> Self {
        Self {
            known: locations
                .into_iter()
                .map(|location| (location.address.to_string(), location))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn medellin() -> Self {
        Self::new(all_locations())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for StubGeocoder {
    fn geocode(&self, address: &str) -> Result<GeocodedPoint, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.known
            .get(address)
            .map(|location| GeocodedPoint {
                query: address.to_string(),
                address: location.resolved.to_string(),
                lat: location.lat,
                lon: location.lng,
            })
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))
    }
}

pub fn gasoline_truck(plate: &str, km_per_gallon: f64) -> Vehicle {
    let mut vehicle = Vehicle::new(plate, "gasolina", km_per_gallon);
    vehicle.model = "NPR".to_string();
    vehicle
}

pub fn diesel_truck(plate: &str, km_per_gallon: f64) -> Vehicle {
    let mut vehicle = Vehicle::new(plate, "diesel", km_per_gallon);
    vehicle.model = "Hilux".to_string();
    vehicle
}

pub fn order_to(location: &Location, customer: &str) -> Order {
    Order::new(location.address, customer)
}
