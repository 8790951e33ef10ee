//! Records consumed from the data store
//!
//! Posts and places arrive already fetched and deserialized. Fields the
//! store may omit are optional here so a malformed record can still be
//! represented and skipped where it matters, instead of failing a batch.

pub mod vibe;

pub use vibe::{available_vibes, Vibe, VibeInfo};

use crate::constants::post::RECENT_WINDOW_MINUTES;
use crate::geo::GeoPoint;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Category assigned to places without one
pub const DEFAULT_CATEGORY: &str = "other";

/// A single user submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,

    /// Unknown vibe strings are read as `None`
    #[serde(
        default,
        deserialize_with = "vibe::deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub vibe: Option<Vibe>,

    /// GPS location of the photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,

    /// When the photo was taken
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,

    /// When the post was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,

    /// Image URLs; the first is the main photo
    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Post {
    /// Create a post with only an id; other fields are set with the `with_*` builders
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            place_id: None,
            place_name: None,
            vibe: None,
            location: None,
            captured_at: None,
            uploaded_at: None,
            images: Vec::new(),
            description: None,
            user_id: None,
        }
    }

    pub fn with_place_name(mut self, name: impl Into<String>) -> Self {
        self.place_name = Some(name.into());
        self
    }

    pub fn with_place_id(mut self, id: impl Into<String>) -> Self {
        self.place_id = Some(id.into());
        self
    }

    pub fn with_vibe(mut self, vibe: Vibe) -> Self {
        self.vibe = Some(vibe);
        self
    }

    pub fn with_location(mut self, lat: f64, lng: f64) -> Self {
        self.location = Some(GeoPoint::new(lat, lng));
        self
    }

    pub fn with_captured_at(mut self, at: DateTime<Utc>) -> Self {
        self.captured_at = Some(at);
        self
    }

    pub fn with_uploaded_at(mut self, at: DateTime<Utc>) -> Self {
        self.uploaded_at = Some(at);
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    /// The main photo URL
    pub fn main_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// The place name, if present and non-empty
    pub fn place_name(&self) -> Option<&str> {
        self.place_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Time used for recency ordering: capture time, then upload time, then the epoch
    pub fn recency_time(&self) -> DateTime<Utc> {
        self.captured_at.or(self.uploaded_at).unwrap_or_default()
    }

    /// Whether the post was captured within the last few minutes
    pub fn is_recent(&self, now: DateTime<Utc>) -> bool {
        match self.captured_at.or(self.uploaded_at) {
            Some(at) => now.signed_duration_since(at) < Duration::minutes(RECENT_WINDOW_MINUTES),
            None => false,
        }
    }
}

/// Short relative age label ("Just now", "12m ago", "3h ago", "2d ago")
pub fn time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = now.signed_duration_since(at).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    format!("{}d ago", hours / 24)
}

/// A venue managed through the admin surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,

    #[serde(default = "default_category")]
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Place {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: default_category(),
            location: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_location(mut self, lat: f64, lng: f64) -> Self {
        self.location = Some(GeoPoint::new(lat, lng));
        self
    }
}
