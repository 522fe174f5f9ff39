//! Error types for movie_map.

use std::path::PathBuf;

/// Top-level error for everything that can abort a run.
///
/// Per-entry geocoding failures are not in here: they live in
/// [`GeocodeError`](crate::location::GeocodeError) and are absorbed by the resolver.
#[derive(Debug, thiserror::Error)]
pub enum MovieMapError {
    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// User coordinates out of range or unparsable.
    #[error("invalid coordinates: {message}")]
    InvalidCoordinates { message: String },

    /// Map document could not be assembled.
    #[error("render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, MovieMapError>;

impl MovieMapError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn coordinates(msg: impl Into<String>) -> Self {
        Self::InvalidCoordinates {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MovieMapError::config("skip_lines must be below last_line");
        assert_eq!(err.to_string(), "config error: skip_lines must be below last_line");

        let err = MovieMapError::coordinates("latitude 91 out of range");
        assert!(err.to_string().starts_with("invalid coordinates"));

        let err = MovieMapError::io(
            "locations.list",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("locations.list"));
    }
}
