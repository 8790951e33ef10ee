//! Error types for spotvibe

use thiserror::Error;

/// Main error type for spotvibe operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid geo point: {0}")]
    InvalidGeoPoint(String),

    #[error("Invalid cluster threshold: {0}")]
    InvalidThreshold(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Geo error: {0}")]
    Geo(String),
}

/// Result type alias for spotvibe operations
pub type Result<T> = std::result::Result<T, Error>;
