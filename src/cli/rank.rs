//! Rank command handler
//!
//! Orders the places in a data snapshot for the "Hot Spots Now" list.

use crate::cli::{emit, init_logging, list_formats, resolve_data_path};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::format::Report;
use crate::geo::{get_ip_locator, GeoPoint};
use crate::rank::picker::hot_spots_for_category;
use crate::rank::{rank_places, RankMode};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Rank command arguments
#[derive(Args)]
pub struct RankArgs {
    /// Data snapshot (JSON with places and posts)
    #[arg(long, short = 'd')]
    pub data: Option<PathBuf>,

    /// Viewer latitude
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Viewer longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Use current location (IP geolocation)
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub here: bool,

    /// Only list places in this category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the rank command
pub async fn run(args: RankArgs) -> Result<()> {
    init_logging("warn");

    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;
    let dataset = Dataset::load_from(resolve_data_path(args.data, &config)?)?;

    let viewer = resolve_viewer(args.lat, args.lng, args.here, &config).await?;

    let mut places = rank_places(&dataset.places, &dataset.posts, viewer)?;
    if let Some(category) = &args.category {
        places = hot_spots_for_category(places, category);
    }

    let mode = RankMode::for_viewer(viewer);
    info!(%mode, places = places.len(), "Ranked places");

    let format = args.format.unwrap_or_else(|| config.defaults.format.clone());
    emit(
        &Report::Ranking {
            mode,
            places: &places,
        },
        &format,
        args.output,
        &config,
    )
}

/// Work out where the viewer is, if anywhere
///
/// Explicit coordinates win, then `--here`, then `location.default_here`.
/// A failed IP lookup is not fatal: ranking falls back to popularity.
async fn resolve_viewer(
    lat: Option<f64>,
    lng: Option<f64>,
    here: bool,
    config: &Config,
) -> Result<Option<GeoPoint>> {
    if let (Some(lat), Some(lng)) = (lat, lng) {
        return GeoPoint::checked(lat, lng).map(Some);
    }

    if !(here || config.location.default_here) {
        return Ok(None);
    }

    match get_ip_locator().locate().await {
        Ok(location) => {
            eprintln!("Using IP location: {}", location.display_name);
            Ok(Some(location.point))
        }
        Err(e) => {
            eprintln!("Could not determine location ({}), ranking by popularity", e);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_resolve_viewer_from_coordinates() {
        let viewer = resolve_viewer(Some(37.5), Some(127.0), false, &Config::default())
            .await
            .unwrap();
        assert_eq!(viewer, Some(GeoPoint::new(37.5, 127.0)));
    }

    #[tokio::test]
    async fn test_resolve_viewer_rejects_out_of_range() {
        let result = resolve_viewer(Some(91.0), Some(127.0), false, &Config::default()).await;
        assert!(matches!(result, Err(Error::InvalidGeoPoint(_))));
    }

    #[tokio::test]
    async fn test_resolve_viewer_none_without_location() {
        let viewer = resolve_viewer(None, None, false, &Config::default())
            .await
            .unwrap();
        assert_eq!(viewer, None);
    }
}
