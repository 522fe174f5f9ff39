//! Geocoding providers.

use std::time::Duration;

use serde::Deserialize;

use super::rate_limit::RateLimiter;
use super::types::GeocodeError;
use crate::config::GeocoderConfig;
use crate::geo::Coordinates;

/// Turns a free-form place description into coordinates.
///
/// `Ok(None)` means the service answered but had no match.
pub trait Geocoder {
    fn geocode(&mut self, query: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

// ─── Nominatim provider ─────────────────────────────────────────

#[derive(Deserialize, Debug, Clone)]
pub struct NominatimResult {
    pub lat: String,
    pub lon: String,
}

/// OpenStreetMap Nominatim over blocking HTTP, one request at a time.
pub struct NominatimGeocoder {
    agent: ureq::Agent,
    base_url: String,
    user_agent: String,
    limiter: RateLimiter,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            limiter: RateLimiter::new(config.min_delay_ms),
        }
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&mut self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let waited = self.limiter.wait();
        tracing::trace!(waited_ms = waited.as_millis() as u64, query, "sending geocode request");

        let response = self
            .agent
            .get(&self.base_url)
            .set("User-Agent", &self.user_agent)
            .query("q", query)
            .query("format", "json")
            .query("limit", "1")
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => GeocodeError::Unavailable(format!("HTTP {}", code)),
                other => GeocodeError::Unavailable(other.to_string()),
            })?;

        let results: Vec<NominatimResult> = response
            .into_json()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        first_match(&results)
    }
}

/// Coordinates of the top-ranked result, if any.
fn first_match(results: &[NominatimResult]) -> Result<Option<Coordinates>, GeocodeError> {
    let Some(top) = results.first() else {
        return Ok(None);
    };
    let lat: f64 = top
        .lat
        .parse()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad lat '{}'", top.lat)))?;
    let lon: f64 = top
        .lon
        .parse()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad lon '{}'", top.lon)))?;
    Coordinates::new(lat, lon)
        .map(Some)
        .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))
}
