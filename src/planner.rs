//! End-to-end assignment pipeline.
//!
//! origin + orders -> coordinates -> distances -> cost matrix -> assignment.
//! Records are taken as parameters (or loaded fresh from a [`FleetSource`])
//! on every call; nothing about the fleet is cached between requests.

use tracing::info;

use crate::assignment::{Assignment, assign};
use crate::cache::GeocodeCache;
use crate::cost::{CostMatrix, trip_cost_matrix};
use crate::distance::DistanceMethod;
use crate::error::PlannerError;
use crate::model::{FuelPrices, Order, Vehicle};
use crate::traits::{DeliveryOrder, FleetSource, FleetVehicle, GeocodeStore, Geocoder};

/// What to do with an order whose address does not geocode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderGeocodeFallback {
    /// Fail the request, naming the order.
    #[default]
    Reject,
    /// Geocode the origin address instead. The order ends up zero distance
    /// away, which is infeasible, so the request still fails at assignment
    /// time with the order identified.
    Origin,
}

#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub fuel_prices: FuelPrices,
    pub distance_method: DistanceMethod,
    pub order_fallback: OrderGeocodeFallback,
}

#[derive(Debug, Clone)]
pub struct AssignmentPlan {
    pub matrix: CostMatrix,
    pub assignment: Assignment,
}

/// One assignment row joined back to the records it indexes.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentDetail {
    pub order: usize,
    pub vehicle: usize,
    pub cost: f64,
    pub plate: String,
    pub model: String,
    pub address: String,
    pub customer: String,
}

impl AssignmentPlan {
    pub fn total_cost(&self) -> f64 {
        self.assignment.total_cost()
    }

    /// Join index pairs with the records they came from, ordered by vehicle.
    ///
    /// `orders` and `vehicles` must be the same slices the plan was built from.
    pub fn details<V, O>(&self, orders: &[O], vehicles: &[V]) -> Vec<AssignmentDetail>
    where
        V: FleetVehicle,
        O: DeliveryOrder,
    {
        let mut details: Vec<AssignmentDetail> = self
            .assignment
            .pairs()
            .iter()
            .map(|pair| {
                let order = &orders[pair.order];
                let vehicle = &vehicles[pair.vehicle];
                AssignmentDetail {
                    order: pair.order,
                    vehicle: pair.vehicle,
                    cost: pair.cost,
                    plate: vehicle.plate().to_string(),
                    model: vehicle.model().to_string(),
                    address: order.address().to_string(),
                    customer: order.customer().to_string(),
                }
            })
            .collect();

        details.sort_by_key(|detail| detail.vehicle);
        details
    }
}

/// Compute the cost-minimizing vehicle for each order leaving `origin_address`.
pub fn plan<V, O, G, S>(
    origin_address: &str,
    vehicles: &[V],
    orders: &[O],
    cache: &GeocodeCache<G, S>,
    options: &PlanOptions,
) -> Result<AssignmentPlan, PlannerError>
where
    V: FleetVehicle,
    O: DeliveryOrder,
    G: Geocoder,
    S: GeocodeStore,
{
    let matrix = trip_cost_matrix(origin_address, vehicles, orders, cache, options)?;
    let assignment = assign(&matrix)?;

    info!(
        origin = %origin_address,
        orders = orders.len(),
        vehicles = vehicles.len(),
        excluded = matrix.excluded().len(),
        matched = assignment.len(),
        total_cost = assignment.total_cost(),
        "assignment planned"
    );

    Ok(AssignmentPlan { matrix, assignment })
}

/// Load the current fleet and orders from `source`, then [`plan`].
///
/// Returns the loaded records alongside the plan so callers can join
/// against the exact data that was optimized.
pub fn plan_from_source<F, G, S>(
    origin_address: &str,
    source: &F,
    cache: &GeocodeCache<G, S>,
    options: &PlanOptions,
) -> Result<SourcedPlan, PlannerError>
where
    F: FleetSource + ?Sized,
    G: Geocoder,
    S: GeocodeStore,
{
    let vehicles = source.vehicles()?;
    let orders = source.orders()?;
    let plan = plan(origin_address, &vehicles, &orders, cache, options)?;

    Ok(SourcedPlan {
        vehicles,
        orders,
        plan,
    })
}

#[derive(Debug, Clone)]
pub struct SourcedPlan {
    pub vehicles: Vec<Vehicle>,
    pub orders: Vec<Order>,
    pub plan: AssignmentPlan,
}

impl SourcedPlan {
    pub fn details(&self) -> Vec<AssignmentDetail> {
        self.plan.details(&self.orders, &self.vehicles)
    }
}
