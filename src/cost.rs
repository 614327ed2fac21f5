//! Per-order, per-vehicle travel cost.
//!
//! Cost of vehicle `j` serving order `i` is
//! `distance[i] * unit_price(fuel_type[j]) / fuel_economy[j]`.
//! Pairings with no real cost (coincident origin and destination, or
//! non-finite arithmetic) are marked [`TripCost::Infeasible`] here, once,
//! rather than left as a zero for the solver to reinterpret.

use tracing::{debug, warn};

use crate::cache::GeocodeCache;
use crate::distance::distances;
use crate::error::{ExclusionReason, PlannerError};
use crate::model::{FuelPrices, FuelType};
use crate::planner::{OrderGeocodeFallback, PlanOptions};
use crate::traits::{DeliveryOrder, FleetVehicle, GeocodeStore, Geocoder};

/// Trips shorter than this (one millimetre) count as coincident endpoints.
const COINCIDENT_KM: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TripCost {
    Feasible(f64),
    Infeasible,
}

impl TripCost {
    /// Zero, negative and non-finite values are infeasible.
    pub fn from_value(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            TripCost::Feasible(value)
        } else {
            TripCost::Infeasible
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            TripCost::Feasible(value) => Some(value),
            TripCost::Infeasible => None,
        }
    }

    pub fn is_feasible(self) -> bool {
        matches!(self, TripCost::Feasible(_))
    }

    /// Numeric form for the solver; infeasible maps to +inf.
    pub fn as_f64(self) -> f64 {
        self.value().unwrap_or(f64::INFINITY)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedVehicle {
    /// Index into the caller's vehicle list.
    pub vehicle: usize,
    pub reason: ExclusionReason,
}

/// Orders x usable vehicles.
///
/// Columns only exist for vehicles that could be priced; `vehicle_index`
/// maps a column back to the caller's vehicle list.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: Vec<Vec<TripCost>>,
    vehicle_indices: Vec<usize>,
    excluded: Vec<ExcludedVehicle>,
}

impl CostMatrix {
    /// Build from raw rows. `vehicle_indices[j]` names the vehicle of column `j`.
    pub fn new(rows: Vec<Vec<TripCost>>, vehicle_indices: Vec<usize>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == vehicle_indices.len()));
        Self {
            rows,
            vehicle_indices,
            excluded: Vec::new(),
        }
    }

    /// Build from plain numbers with columns in vehicle order. Entries that
    /// are zero or non-finite become infeasible.
    pub fn from_values(values: &[Vec<f64>]) -> Self {
        let columns = values.first().map_or(0, |row| row.len());
        let rows = values
            .iter()
            .map(|row| row.iter().map(|&value| TripCost::from_value(value)).collect())
            .collect();
        Self::new(rows, (0..columns).collect())
    }

    pub fn order_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of usable vehicle columns.
    pub fn column_count(&self) -> usize {
        self.vehicle_indices.len()
    }

    pub fn get(&self, order: usize, column: usize) -> TripCost {
        self.rows[order][column]
    }

    pub fn row(&self, order: usize) -> &[TripCost] {
        &self.rows[order]
    }

    pub fn rows(&self) -> &[Vec<TripCost>] {
        &self.rows
    }

    pub fn vehicle_index(&self, column: usize) -> usize {
        self.vehicle_indices[column]
    }

    pub fn vehicle_indices(&self) -> &[usize] {
        &self.vehicle_indices
    }

    /// Column holding `vehicle`, if it was not excluded.
    pub fn column_of(&self, vehicle: usize) -> Option<usize> {
        self.vehicle_indices.iter().position(|&index| index == vehicle)
    }

    pub fn excluded(&self) -> &[ExcludedVehicle] {
        &self.excluded
    }

    pub fn to_f64_rows(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cost| cost.as_f64()).collect())
            .collect()
    }
}

/// Fuel cost of driving one kilometer.
pub fn cost_per_km<V: FleetVehicle + ?Sized>(
    vehicle: &V,
    prices: &FuelPrices,
) -> Result<f64, ExclusionReason> {
    let fuel: FuelType = vehicle.fuel_type().parse()?;

    let economy = vehicle.fuel_economy();
    if !economy.is_finite() || economy <= 0.0 {
        return Err(ExclusionReason::InvalidFuelEconomy(economy));
    }

    Ok(prices.unit_price(fuel) / economy)
}

/// Cost matrix from an order-indexed distance vector.
///
/// Vehicles that cannot be priced are left out and listed in
/// [`CostMatrix::excluded`].
pub fn build_cost_matrix<V: FleetVehicle>(
    distances_km: &[f64],
    vehicles: &[V],
    prices: &FuelPrices,
) -> CostMatrix {
    let mut per_km = Vec::with_capacity(vehicles.len());
    let mut vehicle_indices = Vec::with_capacity(vehicles.len());
    let mut excluded = Vec::new();

    for (index, vehicle) in vehicles.iter().enumerate() {
        match cost_per_km(vehicle, prices) {
            Ok(rate) => {
                per_km.push(rate);
                vehicle_indices.push(index);
            }
            Err(reason) => {
                warn!(
                    vehicle = index,
                    plate = %vehicle.plate(),
                    %reason,
                    "excluding vehicle from assignment"
                );
                excluded.push(ExcludedVehicle { vehicle: index, reason });
            }
        }
    }

    let rows = distances_km
        .iter()
        .map(|&distance| {
            per_km
                .iter()
                .map(|&rate| {
                    if distance.abs() < COINCIDENT_KM {
                        TripCost::Infeasible
                    } else {
                        TripCost::from_value(distance * rate)
                    }
                })
                .collect()
        })
        .collect();

    CostMatrix {
        rows,
        vehicle_indices,
        excluded,
    }
}

/// Geocode the origin and every order, then price every order against every
/// usable vehicle.
pub fn trip_cost_matrix<V, O, G, S>(
    origin_address: &str,
    vehicles: &[V],
    orders: &[O],
    cache: &GeocodeCache<G, S>,
    options: &PlanOptions,
) -> Result<CostMatrix, PlannerError>
where
    V: FleetVehicle,
    O: DeliveryOrder,
    G: Geocoder,
    S: GeocodeStore,
{
    let origin = cache.resolve_strict(origin_address)?;

    let addresses: Vec<&str> = orders.iter().map(|order| order.address()).collect();
    let destinations = match options.order_fallback {
        OrderGeocodeFallback::Reject => cache.resolve_many_strict(&addresses)?,
        OrderGeocodeFallback::Origin => cache.resolve_many(&addresses, origin_address)?,
    };

    let distances_km = distances(origin, &destinations, options.distance_method);
    debug!(orders = orders.len(), vehicles = vehicles.len(), "building cost matrix");

    Ok(build_cost_matrix(&distances_km, vehicles, &options.fuel_prices))
}
