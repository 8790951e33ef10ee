//! spotvibe CLI entry point
//!
//! Map clustering and hot-spot ranking - CLI + web app

use spotvibe::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
