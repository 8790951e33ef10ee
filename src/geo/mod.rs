//! Geographic primitives
//!
//! This module handles:
//! - The validated `GeoPoint` value type
//! - Great-circle and degree-space distances
//! - Viewer location lookup by IP address

pub mod distance;
pub mod ip_location;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude) in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Create a new point without validation
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Create a new point, rejecting non-finite or out-of-range values
    pub fn checked(lat: f64, lng: f64) -> Result<Self> {
        let point = Self::new(lat, lng);
        point.validate()?;
        Ok(point)
    }

    /// Validate that coordinates are finite and within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(Error::InvalidGeoPoint(format!(
                "({}, {}) is not a finite coordinate",
                self.lat, self.lng
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidGeoPoint(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::InvalidGeoPoint(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// Whether the point satisfies the coordinate invariant
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Arithmetic mean of a set of points, or `None` when empty
    pub fn mean<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        let (lat_sum, lng_sum, n) = points
            .into_iter()
            .fold((0.0, 0.0, 0usize), |(lat, lng, n), p| (lat + p.lat, lng + p.lng, n + 1));

        if n == 0 {
            return None;
        }
        Some(Self::new(lat_sum / n as f64, lng_sum / n as f64))
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// A resolved viewer location with a human-readable label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerLocation {
    #[serde(flatten)]
    pub point: GeoPoint,
    /// Display name (city, region, country)
    pub display_name: String,
}

/// Get the IP location service
pub fn get_ip_locator() -> ip_location::IpLocator {
    ip_location::IpLocator::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_bounds() {
        assert!(GeoPoint::new(90.0, 180.0).validate().is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).validate().is_ok());
        assert!(GeoPoint::new(37.5441, 127.0551).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(matches!(
            GeoPoint::new(90.1, 0.0).validate(),
            Err(Error::InvalidGeoPoint(_))
        ));
        assert!(matches!(
            GeoPoint::new(0.0, -180.5).validate(),
            Err(Error::InvalidGeoPoint(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::INFINITY).is_valid());
        assert!(GeoPoint::checked(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_mean() {
        let points = [GeoPoint::new(37.544, 127.055), GeoPoint::new(37.5441, 127.0551)];
        let mean = GeoPoint::mean(points.iter()).unwrap();
        approx::assert_abs_diff_eq!(mean.lat, 37.54405, epsilon = 1e-9);
        approx::assert_abs_diff_eq!(mean.lng, 127.05505, epsilon = 1e-9);

        assert!(GeoPoint::mean(std::iter::empty()).is_none());
    }

    #[test]
    fn test_viewer_location_serialization() {
        let loc = ViewerLocation {
            point: GeoPoint::new(37.5665, 126.978),
            display_name: "Seoul, South Korea".to_string(),
        };

        let json = serde_json::to_string(&loc).unwrap();
        assert!(json.contains("\"lat\":37.5665"));

        let parsed: ViewerLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.point.lng, 126.978);
        assert_eq!(parsed.display_name, "Seoul, South Korea");
    }
}
