//! Distance calculations
//!
//! Two metrics are used side by side: true great-circle distance for
//! ranking places against the viewer, and a flat degree-space distance for
//! map clustering within a single city.

use crate::constants::geo::EARTH_RADIUS_KM;
use crate::error::Result;
use crate::geo::GeoPoint;

/// Calculate the distance between two points in kilometers (Haversine formula)
///
/// # Arguments
/// * `a` - First point
/// * `b` - Second point
///
/// # Returns
/// Distance in kilometers, or `InvalidGeoPoint` if either point is
/// non-finite or out of range
pub fn haversine_distance_km(a: GeoPoint, b: GeoPoint) -> Result<f64> {
    a.validate()?;
    b.validate()?;

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    Ok(EARTH_RADIUS_KM * c)
}

/// Euclidean distance in raw degree space
///
/// Ignores the shrinking of longitude degrees away from the equator, which
/// is negligible over a ~100 m join radius inside one city.
pub fn planar_distance_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    ((a.lat - b.lat).powi(2) + (a.lng - b.lng).powi(2)).sqrt()
}

/// Format a distance for display
///
/// Under 1 km: whole meters ("500m away"). Otherwise one decimal of
/// kilometers ("1.2km away").
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        let meters = (distance_km * 1000.0).round() as i64;
        format!("{}m away", meters)
    } else {
        format!("{:.1}km away", distance_km)
    }
}
