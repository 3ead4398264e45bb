//! HTTP API for the price estimation service.
//!
//! ## Endpoints
//!
//! - `POST /predict` — estimate a sale price from property attributes
//! - `GET /health` — simple liveness check
//! - `GET /status` — model readiness and artifact metadata
//! - `GET /locations` — location categories the model was trained on
//!
//! Request bodies are arbitrary JSON objects of caller-facing field names;
//! field-level garbage never fails a request (fail-soft coercion), only a
//! body that isn't a JSON object is rejected by the extractor.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use hv_core::types::RawRecord;
use hv_model::{FeatureSchema, InferenceError};

use crate::service::AppState;

/// JSON response for a successful prediction.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub status: String,
    pub predicted_price: f64,
    pub formatted_price: String,
}

/// JSON error envelope for any failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// JSON response for the `/status` endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub model_loaded: bool,
    pub artifact: String,
    pub features: usize,
    pub trees: usize,
    pub locations: usize,
}

/// JSON response for the `/health` endpoint.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(predict_handler))
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/locations", get(locations_handler))
        .with_state(state)
}

/// `POST /predict` — normalize the payload and run inference.
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Json(record): Json<RawRecord>,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    let row = FeatureSchema::canonical().normalize(&record);

    match state.estimator.infer(&row) {
        Ok(prediction) => {
            tracing::debug!(price = prediction.value, "prediction served");
            Ok(Json(PredictResponse {
                status: "success".to_string(),
                predicted_price: prediction.value,
                formatted_price: prediction.formatted,
            }))
        }
        Err(e) => {
            let code = match e {
                InferenceError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                InferenceError::ShapeMismatch { .. } | InferenceError::KindMismatch { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            tracing::error!(error = %e, "prediction failed");
            Err((code, Json(ErrorResponse::new(e.to_string()))))
        }
    }
}

/// `GET /health` — simple liveness check.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /status` — model readiness and artifact metadata.
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let schema = FeatureSchema::canonical();
    let trees = state
        .estimator
        .predictor()
        .map(|p| p.artifact().trees.len())
        .unwrap_or(0);
    Json(StatusResponse {
        model_loaded: state.estimator.is_ready(),
        artifact: state.config.model.artifact.display().to_string(),
        features: schema.len(),
        trees,
        locations: state.estimator.locations().len(),
    })
}

/// `GET /locations` — sorted location categories from the artifact.
async fn locations_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let mut locations = state.estimator.locations().to_vec();
    locations.sort();
    Json(locations)
}

/// Bind the listener and run the server until cancelled.
pub async fn run_server(state: Arc<AppState>, cancel: CancellationToken) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.server.bind, state.config.server.port);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    Ok(())
}
