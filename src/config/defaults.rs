//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default cluster join radius in degrees
pub const DEFAULT_CLUSTER_THRESHOLD_DEG: f64 = crate::constants::geo::CLUSTER_THRESHOLD_DEG;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Default map URL provider
pub const DEFAULT_URL_PROVIDER: &str = "google";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "spotvibe";
