//! Beacon Demo - Minimal host package embedding the usage reporter
//!
//! Registers itself once at startup and then idles; with
//! `BEACON_STATS_DEBUG=1` the fast first report fires after a few seconds
//! and each delivery is logged for inspection.

use anyhow::{Context, Result};
use beacon_reporter::ModuleDescriptor;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "beacon_reporter=debug,info".to_string()),
        )
        .init();

    info!("beacon demo host starting");

    beacon_reporter::setup(ModuleDescriptor {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    });

    info!("registered for usage reporting; press Ctrl-C to exit");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    info!("beacon demo host stopping");
    Ok(())
}
