//! Data store snapshots
//!
//! The CLI works on a JSON export of the places and posts currently loaded
//! from the data store:
//!
//! ```json
//! { "places": [ ... ], "posts": [ ... ] }
//! ```

use crate::error::{Error, Result};
use crate::model::{Place, Post};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Places and posts fetched for one view
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub places: Vec<Place>,
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl Dataset {
    /// Load a snapshot from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| {
            Error::Dataset(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let dataset: Dataset = serde_json::from_str(&content).map_err(|e| {
            Error::Dataset(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        debug!(
            path = %path.display(),
            places = dataset.places.len(),
            posts = dataset.posts.len(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    /// Posts that can be placed on the map
    pub fn located_posts(&self) -> usize {
        self.posts.iter().filter(|p| p.location.is_some()).count()
    }
}
