//! Coordinates and great-circle distance.

use crate::error::{MovieMapError, Result};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in km (IUGG), the radius the haversine distances are reported in.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Build validated coordinates. Lat: -90..90, Lon: -180..180.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(MovieMapError::coordinates(format!(
                "latitude {} out of range -90..90",
                lat
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(MovieMapError::coordinates(format!(
                "longitude {} out of range -180..180",
                lon
            )));
        }
        Ok(Self { lat, lon })
    }

    /// Parse a latitude/longitude pair given as two strings (e.g. from the command line).
    pub fn parse_pair(lat: &str, lon: &str) -> Result<Self> {
        let lat = parse_degrees(lat, "latitude")?;
        let lon = parse_degrees(lon, "longitude")?;
        Self::new(lat, lon)
    }

    /// Key for exact coordinate identity. `-0.0` and `0.0` count as the same point.
    pub fn identity_key(&self) -> (u64, u64) {
        ((self.lat + 0.0).to_bits(), (self.lon + 0.0).to_bits())
    }
}

fn parse_degrees(raw: &str, what: &str) -> Result<f64> {
    // Tolerate the "49.83826," form users paste from map apps.
    let cleaned = raw.trim().trim_end_matches(',').trim();
    cleaned
        .parse::<f64>()
        .map_err(|_| MovieMapError::coordinates(format!("{} '{}' is not a number", what, raw)))
}

/// Great-circle distance between two points in kilometres (haversine formula).
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Format coordinates with hemisphere letters: `49.8383°N, 24.0232°E`.
pub fn format_coords(c: Coordinates) -> String {
    let lat_dir = if c.lat >= 0.0 { 'N' } else { 'S' };
    let lon_dir = if c.lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.4}°{}, {:.4}°{}", c.lat.abs(), lat_dir, c.lon.abs(), lon_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn at(lat: f64, lon: f64) -> Coordinates {
        Coordinates::new(lat, lon).unwrap()
    }

    #[test]
    fn test_haversine_zero() {
        let lviv = at(49.83826, 24.02324);
        assert_eq!(haversine_km(lviv, lviv), 0.0);
    }

    #[test]
    fn test_haversine_lviv_kyiv() {
        let lviv = at(49.8397, 24.0297);
        let kyiv = at(50.4501, 30.5234);
        // ~469 km
        let d = haversine_km(lviv, kyiv);
        assert!((d - 469.0).abs() < 5.0, "got {}", d);
    }

    #[test]
    fn test_haversine_quarter_meridian() {
        let equator = at(0.0, 0.0);
        let pole = at(90.0, 0.0);
        let expected = EARTH_RADIUS_KM * std::f64::consts::FRAC_PI_2;
        assert_relative_eq!(haversine_km(equator, pole), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = at(34.0522, -118.2437);
        let b = at(51.5074, -0.1278);
        assert_relative_eq!(haversine_km(a, b), haversine_km(b, a), epsilon = 1e-9);
    }

    #[test]
    fn test_haversine_antimeridian() {
        let a = at(0.0, 179.5);
        let b = at(0.0, -179.5);
        assert!(haversine_km(a, b) < 112.0);
    }

    #[test]
    fn test_coordinates_range() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(Coordinates::new(90.1, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_parse_pair() {
        let c = Coordinates::parse_pair("49.83826,", " 24.02324").unwrap();
        assert_relative_eq!(c.lat, 49.83826);
        assert_relative_eq!(c.lon, 24.02324);

        let c = Coordinates::parse_pair("-33.8688", "151.2093").unwrap();
        assert!(c.lat < 0.0);

        assert!(Coordinates::parse_pair("north", "24.0").is_err());
    }

    #[test]
    fn test_identity_key_signed_zero() {
        assert_eq!(at(0.0, 10.0).identity_key(), at(-0.0, 10.0).identity_key());
        assert_ne!(at(1.0, 10.0).identity_key(), at(1.0, 10.000001).identity_key());
    }

    #[test]
    fn test_format_coords() {
        assert_eq!(format_coords(at(49.83826, 24.02324)), "49.8383°N, 24.0232°E");
        assert_eq!(format_coords(at(-33.8688, -70.6693)), "33.8688°S, 70.6693°W");
    }
}
