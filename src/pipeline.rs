//! End-to-end run: scan → resolve → select → render.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::AppConfig;
use crate::error::Result;
use crate::geo::Coordinates;
use crate::location::{Geocoder, MovieResolver, ResolveStats, ResolvedMovie};
use crate::parser::{self, ScanWindow};
use crate::render::{Marker, MarkerIcon, MovieMap};
use crate::selector::{self, Selection};

pub const USER_POPUP: &str = "You are here";
pub const CLICK_POPUP: &str = "You've clicked here";

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    pub year: u16,
    pub user: Coordinates,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique (title, year, location) entries found in the scan window.
    pub entries: usize,
    pub stats: ResolveStats,
    /// Movies placed on the map, nearest first.
    pub selected: Vec<ResolvedMovie>,
    pub output: PathBuf,
}

/// Run the whole pipeline and write the map to `output`.
pub fn run(
    config: &AppConfig,
    query: Query,
    input: &Path,
    output: &Path,
    geocoder: &mut dyn Geocoder,
) -> Result<RunReport> {
    tracing::info!(year = query.year, input = %input.display(), "scanning database");
    let entries = parser::scan_file(input, query.year, ScanWindow::from(&config.scan))?;
    tracing::info!(entries = entries.len(), "scan complete");

    let (mut movies, stats) =
        MovieResolver::new(geocoder, query.user, config.resolve.max_distance_km).resolve(&entries);

    selector::sort_by_distance(&mut movies);
    let selected = selector::select_nearest(&movies, Selection::from(&config.select));

    build_map(&selected, query.user).save(output)?;

    Ok(RunReport {
        entries: entries.len(),
        stats,
        selected,
        output: output.to_path_buf(),
    })
}

/// One marker per movie, then the user's own marker.
pub fn build_map(selected: &[ResolvedMovie], user: Coordinates) -> MovieMap {
    let mut map = MovieMap::new().with_click_marker(CLICK_POPUP);
    for movie in selected {
        map.add_marker(Marker::new(movie.coords, movie.title.clone(), MarkerIcon::movie()));
    }
    map.add_marker(Marker::new(user, USER_POPUP, MarkerIcon::home()));
    map
}
