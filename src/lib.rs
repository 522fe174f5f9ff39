//! movie_map: filming locations of a given year, nearest to you, on a map.
//!
//! Pipeline: [`parser`] scans `locations.list`, [`location`] geocodes and
//! measures distances, [`selector`] picks the nearest distinct places,
//! [`render`] writes the Leaflet page. [`pipeline::run`] wires them together.

pub mod config;
pub mod error;
pub mod geo;
pub mod location;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod selector;

pub use error::{MovieMapError, Result};
