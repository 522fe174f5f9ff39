//! Core types for the location subsystem.

use serde::Serialize;
use std::fmt;

use crate::geo::Coordinates;

/// A movie entry whose location was geocoded and measured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedMovie {
    pub title: String,
    pub year: u16,
    pub coords: Coordinates,
    pub distance_km: f64,
}

/// Why a single geocoding request produced nothing usable.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// Service unreachable, timed out, or answered with an HTTP error.
    #[error("geocoder unavailable: {0}")]
    Unavailable(String),
    /// Service answered but the body made no sense.
    #[error("invalid geocoder response: {0}")]
    InvalidResponse(String),
}

/// Counters for one resolve pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolveStats {
    /// Requests actually sent to the geocoder.
    pub geocoded: usize,
    pub cache_hits: usize,
    pub not_found: usize,
    pub unavailable: usize,
    pub too_far: usize,
    pub resolved: usize,
}

impl fmt::Display for ResolveStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} resolved ({} geocoded, {} from cache), {} not found, {} unavailable, {} too far",
            self.resolved, self.geocoded, self.cache_hits, self.not_found, self.unavailable, self.too_far
        )
    }
}
