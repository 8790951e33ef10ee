//! Cluster command handler
//!
//! Groups the located posts of a data snapshot into map markers.

use crate::cli::{emit, init_logging, list_formats, resolve_data_path};
use crate::cluster::{find_cluster, ClusterMode, Clusterer};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::format::Report;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Cluster command arguments
#[derive(Args)]
pub struct ClusterArgs {
    /// Data snapshot (JSON with places and posts)
    #[arg(long, short = 'd')]
    pub data: Option<PathBuf>,

    /// Show the members of one cluster (e.g. "cluster-0")
    #[arg(long, short = 'e')]
    pub expand: Option<String>,

    /// Grouping distance in degrees
    #[arg(long, short = 't')]
    pub threshold: Option<f64>,

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

/// Run the cluster command
pub fn run(args: ClusterArgs) -> Result<()> {
    init_logging("warn");

    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;
    let dataset = Dataset::load_from(resolve_data_path(args.data, &config)?)?;

    let clusterer = match args.threshold {
        Some(threshold) => Clusterer::new(threshold)?,
        None => config.clusterer()?,
    };

    let overview = clusterer.cluster(&dataset.posts, ClusterMode::Overview);
    let items = match &args.expand {
        None => overview,
        Some(id) => {
            let cluster = find_cluster(&overview, id)
                .ok_or_else(|| Error::Config(format!("No cluster with id '{}'", id)))?;
            clusterer.cluster(&dataset.posts, ClusterMode::Expanded(cluster))
        }
    };

    info!(
        markers = items.len(),
        located = dataset.located_posts(),
        "Clustered posts"
    );

    let format = args.format.unwrap_or_else(|| config.defaults.format.clone());
    emit(&Report::Map { items: &items }, &format, args.output, &config)
}
