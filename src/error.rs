//! Error types for the assignment pipeline.

use thiserror::Error;

/// Terminal failures for a planning request.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Neither the address nor its fallback resolved.
    #[error("could not geocode address {address:?}{}", order_context(.order))]
    GeocodingFailure {
        address: String,
        order: Option<usize>,
        #[source]
        source: GeocodeError,
    },

    #[error("no feasible vehicle available for order {order}")]
    DegenerateAssignment { order: usize },

    #[error("fleet data unavailable: {0}")]
    FleetSource(#[from] StoreError),
}

fn order_context(order: &Option<usize>) -> String {
    match order {
        Some(index) => format!(" for order {}", index),
        None => String::new(),
    }
}

/// A single failed provider attempt.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("no match for address {0:?}")]
    NotFound(String),

    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid geocoding response: {0}")]
    Parse(String),
}

/// Backing store failures. Recoverable for the geocode cache.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Why a vehicle was left out of the cost matrix.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExclusionReason {
    #[error("unknown fuel type {0:?}")]
    UnknownFuelType(String),

    #[error("invalid fuel economy {0}")]
    InvalidFuelEconomy(f64),
}
