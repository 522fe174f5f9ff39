//! Run-scoped cache of geocoded locations.
//!
//! Keyed by the raw location string from the database. Nothing is persisted.

use std::collections::HashMap;

use crate::geo::Coordinates;

/// What is known about a location after one lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CachedLocation {
    Found { coords: Coordinates, distance_km: f64 },
    /// The geocoder had no match; don't ask again.
    NotFound,
}

#[derive(Debug, Default)]
pub struct DistanceCache {
    entries: HashMap<String, CachedLocation>,
    hits: usize,
    misses: usize,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a location, counting the hit or miss.
    pub fn get(&mut self, location: &str) -> Option<CachedLocation> {
        match self.entries.get(location) {
            Some(entry) => {
                self.hits += 1;
                Some(*entry)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, location: &str, entry: CachedLocation) {
        self.entries.insert(location.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
