//! fleet-assign
//!
//! Cost-minimizing one-to-one assignment of fleet vehicles to delivery
//! orders leaving a shared origin. Addresses are geocoded through a
//! write-through cache, trips are priced from geodesic distance and each
//! vehicle's fuel economy, and the assignment is solved with the Hungarian
//! algorithm.

pub mod traits;
pub mod model;
pub mod error;
pub mod nominatim;
pub mod geocode;
pub mod cache;
pub mod distance;
pub mod cost;
pub mod assignment;
pub mod planner;
pub mod fleet_csv;

pub use error::PlannerError;
pub use planner::{plan, plan_from_source, AssignmentPlan, PlanOptions};
