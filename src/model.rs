//! Plain records consumed by the assignment pipeline.
//!
//! `Vehicle` and `Order` mirror the tables kept by the surrounding
//! application. The pipeline itself only reads them through the traits in
//! [`crate::traits`], so callers with their own record types can skip these.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExclusionReason;
use crate::traits::{DeliveryOrder, FleetVehicle};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        geo::Point::new(coordinate.lon, coordinate.lat)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

/// One geocoding result as kept by the cache store.
///
/// `query` is the text submitted to the provider, `address` the location
/// name the provider resolved it to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedPoint {
    pub query: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
}

impl GeocodedPoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuelType {
    Gasoline,
    Diesel,
}

impl FromStr for FuelType {
    type Err = ExclusionReason;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "gasoline" | "gasolina" => Ok(FuelType::Gasoline),
            // "acpm" is the Colombian trade name for diesel
            "diesel" | "acpm" => Ok(FuelType::Diesel),
            _ => Err(ExclusionReason::UnknownFuelType(value.to_string())),
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelType::Gasoline => write!(f, "gasoline"),
            FuelType::Diesel => write!(f, "diesel"),
        }
    }
}

/// Unit price per fuel volume unit, in local currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelPrices {
    pub gasoline: f64,
    pub diesel: f64,
}

impl Default for FuelPrices {
    fn default() -> Self {
        Self {
            gasoline: 15000.0,
            diesel: 9500.0,
        }
    }
}

impl FuelPrices {
    pub fn unit_price(&self, fuel: FuelType) -> f64 {
        match fuel {
            FuelType::Gasoline => self.gasoline,
            FuelType::Diesel => self.diesel,
        }
    }
}

/// A fleet vehicle as stored by the data collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(alias = "placa")]
    pub plate: String,
    #[serde(alias = "tipo", default)]
    pub category: String,
    #[serde(alias = "modelo", default)]
    pub model: String,
    #[serde(alias = "anio", default)]
    pub model_year: Option<i32>,
    #[serde(alias = "capacidad", default)]
    pub tank_capacity: Option<f64>,
    #[serde(alias = "kilometraje", default)]
    pub odometer: Option<f64>,
    #[serde(alias = "combustible")]
    pub fuel_type: String,
    /// Distance per fuel volume unit (km per gallon in the stock data).
    #[serde(alias = "rendimiento")]
    pub fuel_economy: f64,
}

impl Vehicle {
    pub fn new(plate: impl Into<String>, fuel_type: impl Into<String>, fuel_economy: f64) -> Self {
        Self {
            plate: plate.into(),
            category: String::new(),
            model: String::new(),
            model_year: None,
            tank_capacity: None,
            odometer: None,
            fuel_type: fuel_type.into(),
            fuel_economy,
        }
    }
}

impl FleetVehicle for Vehicle {
    fn plate(&self) -> &str {
        &self.plate
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn fuel_type(&self) -> &str {
        &self.fuel_type
    }

    fn fuel_economy(&self) -> f64 {
        self.fuel_economy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    #[serde(alias = "Pendiente", alias = "pending")]
    Pending,
    #[serde(alias = "En camino", alias = "in-transit", alias = "in_transit")]
    InTransit,
    #[serde(alias = "Entregado", alias = "delivered")]
    Delivered,
}

/// A delivery order. Only `address` feeds the cost model; the other fields
/// ride along for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub address: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub status: OrderStatus,
}

impl Order {
    pub fn new(address: impl Into<String>, customer: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            created_at: String::new(),
            customer: customer.into(),
            status: OrderStatus::Pending,
        }
    }
}

impl DeliveryOrder for Order {
    fn address(&self) -> &str {
        &self.address
    }

    fn customer(&self) -> &str {
        &self.customer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuel_type_aliases() {
        assert_eq!("gasolina".parse::<FuelType>().unwrap(), FuelType::Gasoline);
        assert_eq!("Gasoline".parse::<FuelType>().unwrap(), FuelType::Gasoline);
        assert_eq!("diesel".parse::<FuelType>().unwrap(), FuelType::Diesel);
        assert_eq!(" ACPM ".parse::<FuelType>().unwrap(), FuelType::Diesel);
    }

    #[test]
    fn test_unknown_fuel_type() {
        let err = "electric".parse::<FuelType>().unwrap_err();
        assert_eq!(err, ExclusionReason::UnknownFuelType("electric".to_string()));
    }

    #[test]
    fn test_default_prices() {
        let prices = FuelPrices::default();
        assert_eq!(prices.unit_price(FuelType::Gasoline), 15000.0);
        assert_eq!(prices.unit_price(FuelType::Diesel), 9500.0);
    }

    #[test]
    fn test_coordinate_to_point_is_lon_lat() {
        let point: geo::Point<f64> = Coordinate::new(6.2, -75.6).into();
        assert_eq!(point.x(), -75.6);
        assert_eq!(point.y(), 6.2);
    }
}
