//! Output formatters
//!
//! Provides trait-based output formatting for rankings and map markers.

pub mod gpx;
pub mod json;
pub mod text;
pub mod url;

use crate::cluster::MapItem;
use crate::config::Config;
use crate::error::Result;
use crate::rank::{RankMode, RankedPlace};
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Result of a CLI command, ready to be rendered
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report<'a> {
    /// Ordered hot spots
    Ranking {
        mode: RankMode,
        places: &'a [RankedPlace],
    },
    /// Map markers
    Map { items: &'a [MapItem] },
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Render a report
    ///
    /// # Arguments
    /// * `report` - The ranking or map markers to render
    /// * `config` - Application config (for url providers, etc.)
    fn format(&self, report: &Report<'_>, config: &Config) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "gpx" => Some(Box::new(gpx::GpxFormatter)),
        "url" => Some(Box::new(url::UrlFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    ["json", "text", "gpx", "url"]
        .into_iter()
        .filter_map(get_formatter)
        .map(|f| FormatInfo {
            name: f.name().to_string(),
            description: f.description().to_string(),
        })
        .collect()
}

/// Display name for a marker: the representative post's place name
pub(crate) fn marker_name(item: &MapItem) -> String {
    item.representative()
        .and_then(|post| post.place_name())
        .unwrap_or("Unnamed spot")
        .to_string()
}
