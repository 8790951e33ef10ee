//! Server shared state
//!
//! Holds configuration and the start instant for the HTTP server.

use crate::cluster::Clusterer;
use crate::config::Config;
use crate::error::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Arc<RwLock<Config>>,

    started_at: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            started_at: Instant::now(),
        }
    }

    /// Clusterer built from the configured threshold
    pub async fn clusterer(&self) -> Result<Clusterer> {
        self.config.read().await.clusterer()
    }

    /// Time since the server started
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
