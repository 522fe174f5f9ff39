//! Location resolution for movie entries.
//!
//! Geocodes filming locations through Nominatim, caches them for the run,
//! and measures their distance to the user.

pub mod cache;
pub mod providers;
pub mod rate_limit;
pub mod resolver;
pub mod types;

pub use cache::{CachedLocation, DistanceCache};
pub use providers::{Geocoder, NominatimGeocoder};
pub use rate_limit::RateLimiter;
pub use resolver::MovieResolver;
pub use types::{GeocodeError, ResolveStats, ResolvedMovie};
