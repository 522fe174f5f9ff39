//! Movie resolver: cache → geocoder → distance filter.
//!
//! Every failure is per entry. A location that cannot be placed simply drops
//! out of the result.

use super::cache::{CachedLocation, DistanceCache};
use super::providers::Geocoder;
use super::types::{ResolveStats, ResolvedMovie};
use crate::geo::{haversine_km, Coordinates};
use crate::parser::MovieEntry;

/// Resolves entries relative to one user position. Cached distances are only
/// valid for that position, so the cache lives and dies with the resolver.
pub struct MovieResolver<'g> {
    geocoder: &'g mut dyn Geocoder,
    user: Coordinates,
    max_distance_km: f64,
    cache: DistanceCache,
}

impl<'g> MovieResolver<'g> {
    pub fn new(geocoder: &'g mut dyn Geocoder, user: Coordinates, max_distance_km: f64) -> Self {
        Self {
            geocoder,
            user,
            max_distance_km,
            cache: DistanceCache::new(),
        }
    }

    /// Resolve all entries, keeping input order. Entries further away than
    /// `max_distance_km` are dropped; exactly at the limit is kept.
    pub fn resolve(&mut self, entries: &[MovieEntry]) -> (Vec<ResolvedMovie>, ResolveStats) {
        let mut stats = ResolveStats::default();
        let mut resolved = Vec::new();
        let (hits_before, misses_before) = (self.cache.hits(), self.cache.misses());

        for entry in entries {
            let Some((coords, distance_km)) = self.locate(&entry.location, &mut stats) else {
                continue;
            };
            if distance_km > self.max_distance_km {
                stats.too_far += 1;
                continue;
            }
            resolved.push(ResolvedMovie {
                title: entry.title.clone(),
                year: entry.year,
                coords,
                distance_km,
            });
        }

        stats.resolved = resolved.len();
        stats.cache_hits = self.cache.hits() - hits_before;
        stats.geocoded = self.cache.misses() - misses_before;
        tracing::info!(%stats, cached_locations = self.cache.len(), "resolve finished");
        (resolved, stats)
    }

    fn locate(&mut self, location: &str, stats: &mut ResolveStats) -> Option<(Coordinates, f64)> {
        if let Some(cached) = self.cache.get(location) {
            return match cached {
                CachedLocation::Found { coords, distance_km } => Some((coords, distance_km)),
                CachedLocation::NotFound => {
                    stats.not_found += 1;
                    None
                }
            };
        }

        match self.geocoder.geocode(location) {
            Ok(Some(coords)) => {
                let distance_km = haversine_km(self.user, coords);
                tracing::debug!(location, lat = coords.lat, lon = coords.lon, distance_km, "geocoded");
                self.cache.insert(location, CachedLocation::Found { coords, distance_km });
                Some((coords, distance_km))
            }
            Ok(None) => {
                tracing::debug!(location, "no geocoding match");
                stats.not_found += 1;
                self.cache.insert(location, CachedLocation::NotFound);
                None
            }
            // Not cached: the next entry with this location gets another try.
            // Only visible with -v; the entry just drops out of the map.
            Err(e) => {
                tracing::debug!(location, error = %e, "skipping entry");
                stats.unavailable += 1;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::GeocodeError;
    use std::collections::HashMap;

    /// Answers from a fixed table. Unknown places have no match; places listed
    /// in `down` fail as if the service were unreachable, places in `garbled`
    /// as if it had sent an undecodable body.
    #[derive(Default)]
    struct StubGeocoder {
        places: HashMap<String, Coordinates>,
        down: Vec<String>,
        garbled: Vec<String>,
        calls: Vec<String>,
    }

    impl StubGeocoder {
        fn with(mut self, name: &str, lat: f64, lon: f64) -> Self {
            self.places.insert(name.to_string(), Coordinates { lat, lon });
            self
        }

        fn down(mut self, name: &str) -> Self {
            self.down.push(name.to_string());
            self
        }

        fn garbled(mut self, name: &str) -> Self {
            self.garbled.push(name.to_string());
            self
        }
    }

    impl Geocoder for StubGeocoder {
        fn geocode(&mut self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
            self.calls.push(query.to_string());
            if self.down.iter().any(|d| d == query) {
                return Err(GeocodeError::Unavailable("connection refused".into()));
            }
            if self.garbled.iter().any(|g| g == query) {
                return Err(GeocodeError::InvalidResponse("expected value at line 1".into()));
            }
            Ok(self.places.get(query).copied())
        }
    }

    fn entry(title: &str, location: &str) -> MovieEntry {
        MovieEntry {
            title: title.into(),
            year: 2002,
            location: location.into(),
        }
    }

    const LVIV: Coordinates = Coordinates { lat: 49.83826, lon: 24.02324 };

    #[test]
    fn test_resolve_computes_distance() {
        let mut geo = StubGeocoder::default().with("Kyiv, Ukraine", 50.4501, 30.5234);
        let mut resolver = MovieResolver::new(&mut geo, LVIV, 2000.0);
        let (movies, stats) = resolver.resolve(&[entry("A", "Kyiv, Ukraine")]);

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "A");
        assert_eq!(movies[0].year, 2002);
        assert!((movies[0].distance_km - 468.0).abs() < 5.0);
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.geocoded, 1);
    }

    #[test]
    fn test_resolve_geocodes_each_location_once() {
        let mut geo = StubGeocoder::default().with("Kyiv, Ukraine", 50.4501, 30.5234);
        let entries = vec![
            entry("A", "Kyiv, Ukraine"),
            entry("B", "Kyiv, Ukraine"),
            entry("C", "Atlantis"),
            entry("D", "Atlantis"),
        ];
        let stats = {
            let mut resolver = MovieResolver::new(&mut geo, LVIV, 2000.0);
            let (movies, stats) = resolver.resolve(&entries);
            assert_eq!(movies.len(), 2);
            assert_eq!(resolver.cache.len(), 2);
            stats
        };

        assert_eq!(geo.calls, vec!["Kyiv, Ukraine", "Atlantis"]);
        assert_eq!(stats.geocoded, 2);
        assert_eq!(stats.cache_hits, 2);
        assert_eq!(stats.not_found, 2);
    }

    #[test]
    fn test_resolve_skips_unavailable_without_caching() {
        let mut geo = StubGeocoder::default().down("Kyiv, Ukraine");
        let entries = vec![entry("A", "Kyiv, Ukraine"), entry("B", "Kyiv, Ukraine")];
        let stats = {
            let mut resolver = MovieResolver::new(&mut geo, LVIV, 2000.0);
            let (movies, stats) = resolver.resolve(&entries);
            assert!(movies.is_empty());
            assert!(resolver.cache.is_empty());
            stats
        };

        assert_eq!(geo.calls.len(), 2);
        assert_eq!(stats.unavailable, 2);
    }

    #[test]
    fn test_resolve_distance_filter() {
        let mut geo = StubGeocoder::default()
            .with("Here", LVIV.lat, LVIV.lon)
            .with("Sydney", -33.8688, 151.2093);
        let mut resolver = MovieResolver::new(&mut geo, LVIV, 2000.0);
        let (movies, stats) = resolver.resolve(&[entry("Near", "Here"), entry("Far", "Sydney")]);

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Near");
        assert_eq!(movies[0].distance_km, 0.0);
        assert_eq!(stats.too_far, 1);
        assert!(movies.iter().all(|m| m.distance_km <= 2000.0));
    }

    #[test]
    fn test_resolve_keeps_exact_limit() {
        let mut geo = StubGeocoder::default().with("Kyiv", 50.4501, 30.5234);
        let exact = haversine_km(LVIV, Coordinates { lat: 50.4501, lon: 30.5234 });
        let mut resolver = MovieResolver::new(&mut geo, LVIV, exact);
        let (movies, _) = resolver.resolve(&[entry("Edge", "Kyiv")]);
        assert_eq!(movies.len(), 1);
    }

    #[test]
    fn test_resolve_skips_invalid_without_caching() {
        let mut geo = StubGeocoder::default()
            .garbled("Lviv, Ukraine")
            .with("Kyiv, Ukraine", 50.4501, 30.5234);
        let entries = vec![
            entry("A", "Lviv, Ukraine"),
            entry("B", "Kyiv, Ukraine"),
            entry("C", "Lviv, Ukraine"),
        ];
        let stats = {
            let mut resolver = MovieResolver::new(&mut geo, LVIV, 2000.0);
            let (movies, stats) = resolver.resolve(&entries);
            assert_eq!(movies.len(), 1);
            assert_eq!(movies[0].title, "B");
            assert_eq!(resolver.cache.len(), 1);
            stats
        };

        assert_eq!(geo.calls, vec!["Lviv, Ukraine", "Kyiv, Ukraine", "Lviv, Ukraine"]);
        assert_eq!(stats.unavailable, 2);
        assert_eq!(stats.geocoded, 3);
        assert_eq!(stats.cache_hits, 0);
    }

    #[test]
    fn test_resolve_failures_quiet_at_default_level() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl Write for Captured {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();

        let mut geo = StubGeocoder::default().down("Lviv, Ukraine").garbled("Kyiv, Ukraine");
        let (movies, stats) = tracing::subscriber::with_default(subscriber, || {
            MovieResolver::new(&mut geo, LVIV, 2000.0)
                .resolve(&[entry("A", "Lviv, Ukraine"), entry("B", "Kyiv, Ukraine")])
        });

        assert!(movies.is_empty());
        assert_eq!(stats.unavailable, 2);
        let output = captured.0.lock().unwrap();
        assert!(output.is_empty(), "unexpected log output: {}", String::from_utf8_lossy(&output));
    }
}
