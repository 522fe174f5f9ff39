//! Picks the movies that end up on the map.

use std::collections::HashSet;

use crate::config::SelectConfig;
use crate::location::ResolvedMovie;

/// Stable ascending sort by distance to the user.
pub fn sort_by_distance(movies: &mut [ResolvedMovie]) {
    movies.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
}

/// Limits for [`select_nearest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub candidate_limit: usize,
    pub marker_limit: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            candidate_limit: 100,
            marker_limit: 10,
        }
    }
}

impl From<&SelectConfig> for Selection {
    fn from(config: &SelectConfig) -> Self {
        Self {
            candidate_limit: config.candidate_limit,
            marker_limit: config.marker_limit,
        }
    }
}

/// Walk the first `candidate_limit` movies of an already sorted list and keep
/// up to `marker_limit` of them, one per distinct coordinate.
pub fn select_nearest(sorted: &[ResolvedMovie], limits: Selection) -> Vec<ResolvedMovie> {
    let mut taken: HashSet<(u64, u64)> = HashSet::new();
    let mut selected = Vec::new();

    for movie in sorted.iter().take(limits.candidate_limit) {
        if selected.len() >= limits.marker_limit {
            break;
        }
        if !taken.insert(movie.coords.identity_key()) {
            continue;
        }
        selected.push(movie.clone());
    }

    tracing::debug!(
        candidates = sorted.len().min(limits.candidate_limit),
        selected = selected.len(),
        "selection finished"
    );
    selected
}
