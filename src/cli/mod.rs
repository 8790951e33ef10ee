//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod cluster;
pub mod config;
pub mod rank;
pub mod serve;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, Report};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Map clustering and hot-spot ranking for geotagged venue posts
#[derive(Parser)]
#[command(name = "spotvibe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank places for the "Hot Spots Now" list
    Rank(rank::RankArgs),

    /// Group posts into map markers
    Cluster(cluster::ClusterArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => rank::run(args).await,
        Commands::Cluster(args) => cluster::run(args),
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Initialize logging to stderr, honoring RUST_LOG
pub fn init_logging(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init();
}

/// Resolve the dataset path from the argument or the configured default
pub(crate) fn resolve_data_path(arg: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    match arg {
        Some(path) => Ok(path),
        None if !config.defaults.data.is_empty() => Ok(PathBuf::from(&config.defaults.data)),
        None => Err(Error::Config(
            "No dataset given. Use --data or set defaults.data".to_string(),
        )),
    }
}

/// Render a report and write it to a file or stdout
pub(crate) fn emit(
    report: &Report<'_>,
    format: &str,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let formatter = get_formatter(format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;
    let rendered = formatter.format(report, config)?;

    if let Some(path) = output {
        std::fs::write(&path, &rendered)?;
        eprintln!("Output written to {}", path.display());
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

/// Print available output formats
pub(crate) fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rank_with_coordinates() {
        let cli = Cli::try_parse_from([
            "spotvibe", "rank", "--data", "snap.json", "--lat", "37.5", "--lng", "127.0",
        ])
        .unwrap();

        match cli.command {
            Commands::Rank(args) => {
                assert_eq!(args.lat, Some(37.5));
                assert_eq!(args.lng, Some(127.0));
                assert!(!args.here);
            }
            _ => panic!("expected rank"),
        }
    }

    #[test]
    fn test_here_conflicts_with_coordinates() {
        let result = Cli::try_parse_from(["spotvibe", "rank", "--here", "--lat", "37.5", "--lng", "127.0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_lat_requires_lng() {
        let result = Cli::try_parse_from(["spotvibe", "rank", "--lat", "37.5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_cluster_expand() {
        let cli = Cli::try_parse_from([
            "spotvibe", "cluster", "--data", "snap.json", "--expand", "cluster-3",
        ])
        .unwrap();

        match cli.command {
            Commands::Cluster(args) => assert_eq!(args.expand.as_deref(), Some("cluster-3")),
            _ => panic!("expected cluster"),
        }
    }

    #[test]
    fn test_resolve_data_path() {
        let mut config = Config::default();
        assert!(resolve_data_path(None, &config).is_err());

        config.defaults.data = "/tmp/snap.json".to_string();
        assert_eq!(
            resolve_data_path(None, &config).unwrap(),
            PathBuf::from("/tmp/snap.json")
        );
        assert_eq!(
            resolve_data_path(Some(PathBuf::from("other.json")), &config).unwrap(),
            PathBuf::from("other.json")
        );
    }
}
