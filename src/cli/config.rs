//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "cluster.threshold_deg")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        println!("{}", Config::config_path()?.display());
        return Ok(());
    }

    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (args.key, args.value) {
        (None, None) => {
            for (key, value) in entries(&config) {
                println!("{} = {}", key, value);
            }
        }
        (Some(key), None) => println!("{}", lookup(&config, &key)?),
        (Some(key), Some(value)) => {
            config.set(&key, &value)?;
            config.save()?;
            println!("{} = {}", key, lookup(&config, &key)?);
        }
        (None, Some(_)) => {
            return Err(Error::Config("Must specify a key to set a value".to_string()));
        }
    }

    Ok(())
}

/// Every concrete key with its current value, in `available_keys` order
///
/// The `url.providers.<name>` pattern expands to one entry per provider.
fn entries(config: &Config) -> Vec<(String, String)> {
    let mut entries = Vec::new();

    for key in Config::available_keys() {
        match key.strip_suffix("<name>") {
            Some(prefix) => {
                for name in config.url.providers.keys() {
                    let key = format!("{}{}", prefix, name);
                    if let Some(value) = config.get(&key) {
                        entries.push((key, value));
                    }
                }
            }
            None => {
                if let Some(value) = config.get(key) {
                    entries.push((key.to_string(), value));
                }
            }
        }
    }

    entries
}

fn lookup(config: &Config, key: &str) -> Result<String> {
    config.get(key).ok_or_else(|| {
        Error::Config(format!(
            "Unknown config key: {} (available: {})",
            key,
            Config::available_keys().join(", ")
        ))
    })
}
