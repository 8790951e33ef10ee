//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/spotvibe/config.toml

pub mod defaults;

use crate::cluster::Clusterer;
use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Defaults for CLI commands
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Map clustering settings
    #[serde(default)]
    pub cluster: ClusterConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Viewer location settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Map link settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Defaults for CLI commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,

    /// Default dataset snapshot path (empty = must be given on the command line)
    #[serde(default)]
    pub data: String,
}

/// Map clustering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Join radius in degrees
    #[serde(default = "default_threshold")]
    pub threshold_deg: f64,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Viewer location settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    /// If true, rank by IP location when no coordinates are given
    #[serde(default)]
    pub default_here: bool,
}

/// Map link settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL templates with {lat}, {lng} and {name} placeholders
    #[serde(default = "default_url_providers")]
    pub providers: BTreeMap<String, String>,
}

// Default value functions for serde
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_threshold() -> f64 {
    DEFAULT_CLUSTER_THRESHOLD_DEG
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> BTreeMap<String, String> {
    let mut providers = BTreeMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/search/?api=1&query={lat},{lng}".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map=18/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "kakao".to_string(),
        "https://map.kakao.com/link/map/{name},{lat},{lng}".to_string(),
    );
    providers.insert(
        "naver".to_string(),
        "https://map.naver.com/p/search/{name}?c={lng},{lat},17,0,0,0,dh".to_string(),
    );
    providers
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            data: String::new(),
        }
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            threshold_deg: default_threshold(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "format"] => Some(self.defaults.format.clone()),
            ["defaults", "data"] => Some(self.defaults.data.clone()),

            ["cluster", "threshold_deg"] => Some(self.cluster.threshold_deg.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["location", "default_here"] => Some(self.location.default_here.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),
            ["url", "providers", name] => self.url.providers.get(*name).cloned(),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "format"] => {
                if crate::format::get_formatter(value).is_none() {
                    return Err(Error::Config(format!("Unknown format: {}", value)));
                }
                self.defaults.format = value.to_string();
            }
            ["defaults", "data"] => {
                self.defaults.data = value.to_string();
            }

            ["cluster", "threshold_deg"] => {
                let threshold: f64 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid threshold value: {}", value))
                })?;
                Clusterer::new(threshold)?;
                self.cluster.threshold_deg = threshold;
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }

            ["location", "default_here"] => {
                self.location.default_here = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid boolean value: {}", value))
                })?;
            }

            ["url", "default"] => {
                if !self.url.providers.contains_key(value) {
                    return Err(Error::Config(format!("Unknown URL provider: {}", value)));
                }
                self.url.default = value.to_string();
            }
            ["url", "providers", name] => {
                self.url.providers.insert(name.to_string(), value.to_string());
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "defaults.format",
            "defaults.data",
            "cluster.threshold_deg",
            "server.host",
            "server.port",
            "location.default_here",
            "url.default",
            "url.providers.<name>",
        ]
    }

    /// Build a clusterer from the configured threshold
    pub fn clusterer(&self) -> Result<Clusterer> {
        Clusterer::new(self.cluster.threshold_deg)
    }

    /// Format a map URL using the specified provider
    ///
    /// Replaces {lat}, {lng} and {name} placeholders; the name is URL-encoded
    pub fn format_url(&self, provider: Option<&str>, point: GeoPoint, name: &str) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &point.lat.to_string())
            .replace("{lng}", &point.lng.to_string())
            .replace("{name}", &urlencoding::encode(name)))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
