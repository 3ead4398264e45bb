//! End-to-end integration test for the estimation service.
//!
//! Writes a real artifact to disk, builds the application state the way
//! the binary does (config → state → router), and drives the full request
//! cycle in memory.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use hv_core::config::AppConfig;
use hv_model::{FeatureSchema, ModelArtifact, ScalerStats, Tree, TreeNode};
use hv_server::routes::{router, ErrorResponse, PredictResponse, StatusResponse};
use hv_server::service::AppState;

/// Artifact whose estimate depends on area and location, so the test can
/// tell coerced inputs actually reached the model.
fn build_artifact() -> ModelArtifact {
    let schema = FeatureSchema::canonical();
    let mut mean = vec![0.0; schema.numeric_len()];
    let mut std = vec![1.0; schema.numeric_len()];
    mean[0] = 1200.0; // area
    std[0] = 400.0;

    let hyderabad_slot = schema.numeric_len() as i32;
    ModelArtifact {
        version: 1,
        scaler: ScalerStats { mean, std },
        locations: vec!["hyderabad".into(), "bangalore".into()],
        base_score: 3_000_000.0,
        trees: vec![
            Tree {
                nodes: vec![
                    TreeNode::split(0, 1.0, 1, 2),
                    TreeNode::leaf(100_000.0),
                    TreeNode::leaf(900_000.0),
                ],
            },
            Tree {
                nodes: vec![
                    TreeNode::split(hyderabad_slot, 0.5, 1, 2),
                    TreeNode::leaf(0.0),
                    TreeNode::leaf(500_000.0),
                ],
            },
        ],
    }
}

fn config_with_artifact(path: &std::path::Path) -> AppConfig {
    serde_json::from_value(serde_json::json!({
        "server": { "bind": "127.0.0.1", "port": 8080 },
        "model": { "artifact": path.to_str().unwrap() },
        "logging": { "json": false }
    }))
    .expect("test config")
}

fn post_predict(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_full_request_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let artifact_path = dir.path().join("pricing.json");
    build_artifact().save(&artifact_path).unwrap();

    let state = AppState::from_config(config_with_artifact(&artifact_path)).unwrap();
    let app = router(Arc::new(state));

    let resp = app
        .clone()
        .oneshot(post_predict(
            r#"{"location":"Hyderabad","area":"1600","bedrooms":3,"bathrooms":2}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json: PredictResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(json.status, "success");
    // 3,000,000 base + 900,000 (area branch) + 500,000 (hyderabad branch).
    assert_eq!(json.predicted_price, 4_400_000.0);
    assert_eq!(json.formatted_price, "₹4,400,000.00");

    // The same service reports itself ready.
    let resp = app
        .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let status: StatusResponse = serde_json::from_slice(&body).unwrap();
    assert!(status.model_loaded);
    assert_eq!(status.trees, 2);
}

#[tokio::test]
async fn test_unknown_location_still_estimates() {
    let dir = tempfile::tempdir().unwrap();
    let artifact_path = dir.path().join("pricing.json");
    build_artifact().save(&artifact_path).unwrap();

    let state = AppState::from_config(config_with_artifact(&artifact_path)).unwrap();
    let app = router(Arc::new(state));

    let resp = app
        .oneshot(post_predict(r#"{"location":"Atlantis","area":2000}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json: PredictResponse = serde_json::from_slice(&body).unwrap();
    // Unknown location encodes as all-zeros: area branch only.
    assert_eq!(json.predicted_price, 3_900_000.0);
}

#[tokio::test]
async fn test_missing_artifact_serves_degraded() {
    let dir = tempfile::tempdir().unwrap();
    let artifact_path = dir.path().join("does_not_exist.json");

    let state = AppState::from_config(config_with_artifact(&artifact_path)).unwrap();
    let app = router(Arc::new(state));

    let resp = app.clone().oneshot(post_predict("{}")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(json.status, "error");
    assert_eq!(json.message, "Model not loaded");

    // Liveness is unaffected by the degraded model.
    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_corrupt_artifact_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let artifact_path = dir.path().join("pricing.json");
    std::fs::write(&artifact_path, "{definitely not json").unwrap();

    assert!(AppState::from_config(config_with_artifact(&artifact_path)).is_err());
}
