//! HomeValue estimation service binary.
//!
//! Entry point for the HTTP API. Loads configuration, initializes tracing,
//! loads the model artifact once, and serves until interrupted.

mod routes;
mod service;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use hv_core::config::AppConfig;

/// HomeValue price estimation service
#[derive(Parser, Debug)]
#[command(name = "hv-server", about = "HomeValue price estimation service")]
struct Args {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(args.config)?;

    hv_core::logging::init_tracing(config.logging.json);

    tracing::info!(
        bind = %config.server.bind,
        port = config.server.port,
        artifact = %config.model.artifact.display(),
        "starting hv-server"
    );

    let state = Arc::new(service::AppState::from_config(config)?);
    service::serve(state).await
}
