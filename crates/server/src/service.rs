//! Service wiring — shared state and lifecycle.
//!
//! [`AppState`] owns everything a request handler needs: the configuration
//! and the loaded estimator. The model artifact is read once at startup
//! and held as an immutable shared resource; a missing artifact degrades
//! the service (every prediction returns a structured error) instead of
//! preventing startup.

use std::sync::Arc;

use anyhow::Result;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use hv_core::config::AppConfig;
use hv_model::PriceEstimator;

use crate::routes;

/// Shared, read-only state for all request handlers.
pub struct AppState {
    pub config: AppConfig,
    pub estimator: PriceEstimator,
}

impl AppState {
    /// Build the state from configuration, loading the model artifact.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let estimator = PriceEstimator::load(&config.model.artifact)?;
        if !estimator.is_ready() {
            tracing::warn!(
                artifact = %config.model.artifact.display(),
                "starting without a model; predictions will return errors"
            );
        }
        Ok(Self { config, estimator })
    }
}

/// Run the HTTP service until SIGINT or cancellation.
pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let cancel = CancellationToken::new();

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tracing::info!("received SIGINT, shutting down");
        }
        signal_cancel.cancel();
    });

    routes::run_server(state, cancel).await
}
