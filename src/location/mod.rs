//! Location subsystem for Terraport.
//!
//! Resolves network addresses and place names to geo fixes through an
//! HTTP provider, an in-memory cache, and a built-in fallback dataset.

pub mod cache;
pub mod classifier;
pub mod providers;
pub mod resolver;
pub mod types;

pub use cache::{Clock, ManualClock, ResolutionCache, SystemClock};
pub use providers::{builtin_city_list, CityInfo, ProviderGateway};
pub use resolver::LocationResolver;
pub use types::{
    format_coords, FixSource, GeoFix, LocationError, LookupKey, LookupRequest, LookupTarget, Placement,
    PlanarPosition,
};
