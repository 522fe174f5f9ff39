//! Run configuration.
//!
//! Optional TOML file at `~/.moviemap/config.toml` (or `--config <path>`).
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MovieMapError, Result};

const CONFIG_DIR_NAME: &str = ".moviemap";
const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

// ─── Config structs ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub resolve: ResolveConfig,
    #[serde(default)]
    pub select: SelectConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
}

/// `[scan]`: which slice of the database is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Lines up to and including this 1-based number are skipped.
    #[serde(default = "default_skip_lines")]
    pub skip_lines: usize,
    /// Last 1-based line number that is read.
    #[serde(default = "default_last_line")]
    pub last_line: usize,
}

/// `[resolve]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfig {
    #[serde(default = "default_max_distance_km")]
    pub max_distance_km: f64,
}

/// `[select]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectConfig {
    /// How many of the nearest movies are looked at.
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
    /// How many distinct-coordinate markers end up on the map.
    #[serde(default = "default_marker_limit")]
    pub marker_limit: usize,
}

/// `[geocoder]`: Nominatim access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Minimum pause between two requests. Public Nominatim allows one per second.
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_skip_lines() -> usize {
    125_000
}

fn default_last_line() -> usize {
    150_000
}

fn default_max_distance_km() -> f64 {
    2000.0
}

fn default_candidate_limit() -> usize {
    100
}

fn default_marker_limit() -> usize {
    10
}

fn default_base_url() -> String {
    DEFAULT_NOMINATIM_URL.to_string()
}

fn default_user_agent() -> String {
    format!("moviemap/{}", env!("CARGO_PKG_VERSION"))
}

fn default_min_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            skip_lines: default_skip_lines(),
            last_line: default_last_line(),
        }
    }
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            max_distance_km: default_max_distance_km(),
        }
    }
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            candidate_limit: default_candidate_limit(),
            marker_limit: default_marker_limit(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            min_delay_ms: default_min_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Reject settings the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.scan.skip_lines >= self.scan.last_line {
            return Err(MovieMapError::config(format!(
                "scan.skip_lines ({}) must be below scan.last_line ({})",
                self.scan.skip_lines, self.scan.last_line
            )));
        }
        let max = self.resolve.max_distance_km;
        if max.is_nan() || max <= 0.0 {
            return Err(MovieMapError::config(
                "resolve.max_distance_km must be positive",
            ));
        }
        if self.select.candidate_limit == 0 || self.select.marker_limit == 0 {
            return Err(MovieMapError::config(
                "select.candidate_limit and select.marker_limit must be at least 1",
            ));
        }
        if self.geocoder.base_url.trim().is_empty() {
            return Err(MovieMapError::config("geocoder.base_url is empty"));
        }
        Ok(())
    }
}

// ─── Loading ────────────────────────────────────────────────────

/// `~/.moviemap/config.toml`, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load config: an explicit path must exist; otherwise the default path is
/// used when present, and built-in defaults when not.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let config = match explicit {
        Some(path) => load_config_from(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => load_config_from(&path)?,
            _ => {
                tracing::debug!("no config file found, using defaults");
                AppConfig::default()
            }
        },
    };
    config.validate()?;
    Ok(config)
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| MovieMapError::io(path, e))?;
    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        MovieMapError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}
