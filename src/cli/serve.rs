//! Serve command handler

use crate::cli::init_logging;
use crate::config::Config;
use crate::error::Result;
use crate::server;
use clap::Args;
use tracing::info;

/// Serve command arguments
#[derive(Args)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Override the configured bind address
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

/// Run the server in the foreground until it shuts down
pub async fn run(args: ServeArgs) -> Result<()> {
    init_logging("info");

    let mut config = Config::load()?;
    args.apply(&mut config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        threshold_deg = config.cluster.threshold_deg,
        "Starting spotvibe server on {}",
        config.server_addr()
    );
    server::run(config).await
}
