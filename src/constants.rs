//! Centralized constants for the spotvibe crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Join radius for map clustering, in degrees (~100 m in Seoul)
    pub const CLUSTER_THRESHOLD_DEG: f64 = 0.001;
}

/// Post timing constants
pub mod post {
    /// A post captured within this many minutes is shown as "recent" on the map
    pub const RECENT_WINDOW_MINUTES: i64 = 5;
}

/// External API endpoints
pub mod api {
    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";
}

/// Cache settings
pub mod cache {
    /// IP location cache duration in seconds (1 hour)
    pub const IP_LOCATION_TTL_SECS: u64 = 3600;

    /// IP location cache file name
    pub const IP_LOCATION_CACHE_FILE: &str = "ip_location_cache.json";
}
