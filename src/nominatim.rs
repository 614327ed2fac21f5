//! Nominatim HTTP adapter for address geocoding.

use serde::Deserialize;

use crate::error::GeocodeError;
use crate::model::GeocodedPoint;
use crate::traits::Geocoder;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim's usage policy rejects requests without an identifying agent.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "fleet_assign_geocoder".to_string(),
            timeout_secs: 10,
        }
    }
}

impl NominatimConfig {
    /// Defaults overridden by `NOMINATIM_URL`, `NOMINATIM_USER_AGENT` and
    /// `NOMINATIM_TIMEOUT_SECS` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("NOMINATIM_URL") {
            config.base_url = url;
        }
        if let Ok(agent) = std::env::var("NOMINATIM_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(secs) = std::env::var("NOMINATIM_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
        {
            config.timeout_secs = secs;
        }
        config
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for NominatimClient {
    fn geocode(&self, address: &str) -> Result<GeocodedPoint, GeocodeError> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));

        let places = self
            .client
            .get(url)
            .query(&[("q", address), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<NominatimPlace>>())?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))?;

        place.into_point(address)
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimPlace {
    fn into_point(self, query: &str) -> Result<GeocodedPoint, GeocodeError> {
        let lat = parse_degrees(&self.lat)?;
        let lon = parse_degrees(&self.lon)?;

        Ok(GeocodedPoint {
            query: query.to_string(),
            address: self.display_name,
            lat,
            lon,
        })
    }
}

fn parse_degrees(value: &str) -> Result<f64, GeocodeError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|degrees| degrees.is_finite())
        .ok_or_else(|| GeocodeError::Parse(format!("bad coordinate {:?}", value)))
}
