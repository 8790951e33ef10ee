//! IP-based viewer location
//!
//! Resolves an approximate viewer location from ip-api.com when the caller
//! has no device position. Results are cached on disk for an hour.

use crate::constants::api::IP_API_URL;
use crate::constants::cache::{IP_LOCATION_CACHE_FILE, IP_LOCATION_TTL_SECS};
use crate::error::{Error, Result};
use crate::geo::{GeoPoint, ViewerLocation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// IP location service with caching
#[derive(Debug)]
pub struct IpLocator {
    client: reqwest::Client,
    cache_path: Option<PathBuf>,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    country: Option<String>,
}

impl IpApiResponse {
    fn into_viewer_location(self) -> Result<ViewerLocation> {
        if self.status != "success" {
            return Err(Error::Geo("IP location lookup failed".to_string()));
        }

        let lat = self.lat.ok_or_else(|| Error::Geo("No latitude in response".to_string()))?;
        let lng = self.lon.ok_or_else(|| Error::Geo("No longitude in response".to_string()))?;
        let point = GeoPoint::checked(lat, lng)?;

        let display_name = [self.city, self.region_name, self.country]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        Ok(ViewerLocation {
            point,
            display_name: if display_name.is_empty() {
                "Unknown Location".to_string()
            } else {
                display_name
            },
        })
    }
}

/// Cached location data
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedLocation {
    location: ViewerLocation,
    timestamp: u64,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl IpLocator {
    /// Create a new IP locator with the default cache path
    pub fn new() -> Self {
        let cache_path = dirs::cache_dir()
            .map(|p| p.join(crate::config::defaults::APP_DIR_NAME).join(IP_LOCATION_CACHE_FILE));

        Self {
            client: reqwest::Client::new(),
            cache_path,
        }
    }

    /// Create an IP locator with a specific cache path
    pub fn with_cache_path(cache_path: PathBuf) -> Self {
        Self {
            client: reqwest::Client::new(),
            cache_path: Some(cache_path),
        }
    }

    /// Create an IP locator without caching
    pub fn without_cache() -> Self {
        Self {
            client: reqwest::Client::new(),
            cache_path: None,
        }
    }

    /// Get the viewer's approximate location
    pub async fn locate(&self) -> Result<ViewerLocation> {
        if let Some(cached) = self.load_cache() {
            debug!(location = %cached.point, "Using cached IP location");
            return Ok(cached);
        }

        let location = self.fetch_location().await?;
        self.save_cache(&location);

        Ok(location)
    }

    async fn fetch_location(&self) -> Result<ViewerLocation> {
        let response = self
            .client
            .get(IP_API_URL)
            .send()
            .await
            .map_err(|e| Error::Geo(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geo(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Geo(format!("Failed to parse IP location response: {}", e)))?;

        data.into_viewer_location()
    }

    /// Load cached location if still fresh
    fn load_cache(&self) -> Option<ViewerLocation> {
        let cache_path = self.cache_path.as_ref()?;
        let content = fs::read_to_string(cache_path).ok()?;
        let cached: CachedLocation = serde_json::from_str(&content).ok()?;

        if unix_now().saturating_sub(cached.timestamp) < IP_LOCATION_TTL_SECS {
            Some(cached.location)
        } else {
            None
        }
    }

    fn save_cache(&self, location: &ViewerLocation) {
        let Some(cache_path) = &self.cache_path else {
            return;
        };

        if let Some(parent) = cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let cached = CachedLocation {
            location: location.clone(),
            timestamp: unix_now(),
        };

        match serde_json::to_string_pretty(&cached) {
            Ok(content) => {
                if let Err(e) = fs::write(cache_path, content) {
                    warn!("Failed to write IP location cache: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize IP location cache: {}", e),
        }
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        if let Some(cache_path) = &self.cache_path {
            let _ = fs::remove_file(cache_path);
        }
    }

    /// Get cache duration
    pub fn cache_duration() -> Duration {
        Duration::from_secs(IP_LOCATION_TTL_SECS)
    }
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}
