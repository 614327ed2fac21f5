//! Single-address resolution with one fallback attempt.

use tracing::{debug, warn};

use crate::error::PlannerError;
use crate::model::GeocodedPoint;
use crate::traits::Geocoder;

/// Geocode `address`, retrying once with `fallback` if the first attempt fails.
///
/// A provider timeout counts as a failed attempt. When the fallback is used
/// the returned point's `query` is the fallback text, so a cache never files
/// the fallback's coordinates under the unresolved address.
pub fn geocode_with_fallback<G: Geocoder + ?Sized>(
    geocoder: &G,
    address: &str,
    fallback: Option<&str>,
) -> Result<GeocodedPoint, PlannerError> {
    let primary_err = match geocoder.geocode(address) {
        Ok(point) => return Ok(point),
        Err(err) => err,
    };

    let Some(fallback) = fallback else {
        return Err(PlannerError::GeocodingFailure {
            address: address.to_string(),
            order: None,
            source: primary_err,
        });
    };

    warn!(%address, %fallback, error = %primary_err, "address did not resolve, trying fallback");

    match geocoder.geocode(fallback) {
        Ok(point) => {
            debug!(%address, resolved = %point.address, "fallback address resolved");
            Ok(point)
        }
        Err(source) => Err(PlannerError::GeocodingFailure {
            address: address.to_string(),
            order: None,
            source,
        }),
    }
}
