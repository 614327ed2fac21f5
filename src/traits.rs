//! Collaborator interfaces for the assignment pipeline.
//!
//! These are intentionally narrow. The surrounding application implements
//! them for its own storage and records; the pipeline never reaches past them.

use crate::error::{GeocodeError, StoreError};
use crate::model::{GeocodedPoint, Order, Vehicle};

/// A vehicle that can be priced per kilometer.
pub trait FleetVehicle {
    /// Plate identifier, used only for display and log context.
    fn plate(&self) -> &str;

    /// Make/model, used only for display.
    fn model(&self) -> &str {
        ""
    }

    /// Raw fuel type text as stored by the application.
    fn fuel_type(&self) -> &str;

    /// Distance per fuel volume unit. Must be > 0 for the vehicle to be usable.
    fn fuel_economy(&self) -> f64;
}

/// An order waiting for a vehicle.
pub trait DeliveryOrder {
    /// Free-text delivery address.
    fn address(&self) -> &str;

    fn customer(&self) -> &str {
        ""
    }
}

/// Resolves free-text addresses to coordinates.
///
/// Implementations make exactly one provider attempt per call. Fallback and
/// caching are layered on top.
pub trait Geocoder: Sync {
    fn geocode(&self, address: &str) -> Result<GeocodedPoint, GeocodeError>;
}

/// Append-only record store backing the geocode cache.
pub trait GeocodeStore: Sync {
    /// Every record appended so far, oldest first.
    fn load(&self) -> Result<Vec<GeocodedPoint>, StoreError>;

    fn append(&self, point: &GeocodedPoint) -> Result<(), StoreError>;
}

/// Supplies the fleet and the pending orders.
///
/// Called once per planning request so the pipeline always sees current data.
pub trait FleetSource {
    fn vehicles(&self) -> Result<Vec<Vehicle>, StoreError>;

    fn orders(&self) -> Result<Vec<Order>, StoreError>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn geocode(&self, address: &str) -> Result<GeocodedPoint, GeocodeError> {
        (**self).geocode(address)
    }
}

impl<S: GeocodeStore + ?Sized> GeocodeStore for &S {
    fn load(&self) -> Result<Vec<GeocodedPoint>, StoreError> {
        (**self).load()
    }

    fn append(&self, point: &GeocodedPoint) -> Result<(), StoreError> {
        (**self).append(point)
    }
}
