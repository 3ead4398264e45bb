//! Inference executor: vectorization, ensemble evaluation, sanitization.
//!
//! [`PricePredictor`] wraps a validated [`ModelArtifact`] and turns
//! normalized feature rows into price estimates. [`PriceEstimator`] adds
//! the degraded "model unavailable" state: the service starts and answers
//! requests even when the artifact failed to appear, returning a
//! structured error instead of a number.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use thiserror::Error;

use hv_core::types::Price;

use crate::artifact::ModelArtifact;
use crate::normalize::FeatureRow;
use crate::schema::{FeatureSchema, FieldKind};

/// Substituted when the model emits NaN or ±Inf. A clearly-approximate
/// estimate beats propagating a garbage number to a user-facing quote.
pub const FALLBACK_PRICE: f64 = 5_700_000.0;

/// Structured inference failure. These are values, not panics; the HTTP
/// layer maps them straight to status codes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InferenceError {
    /// The artifact was never loaded; environmental, not transient.
    #[error("Model not loaded")]
    ModelUnavailable,
    /// The row does not match the schema the model was validated against.
    #[error("feature row has {got} fields, schema declares {want}")]
    ShapeMismatch { got: usize, want: usize },
    /// A row value has the wrong kind for its declared field.
    #[error("feature row field {field} has the wrong kind for the schema")]
    KindMismatch { field: &'static str },
}

/// A sanitized price estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Estimated price, non-negative, rounded to 2 decimals.
    pub value: f64,
    /// Currency display string, e.g. `₹5,700,000.00`.
    pub formatted: String,
}

/// The trained model, ready for inference. Immutable after construction;
/// concurrent predictions need no coordination.
pub struct PricePredictor {
    artifact: ModelArtifact,
}

impl PricePredictor {
    /// Wrap an in-memory artifact, validating it against the canonical
    /// schema.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        artifact.validate(FeatureSchema::canonical())?;
        Ok(Self { artifact })
    }

    /// Try to load the artifact from the given path.
    ///
    /// Returns `None` if the file doesn't exist (graceful degradation —
    /// the service runs without a model). Returns `Err` if the file
    /// exists but is malformed or fails validation.
    pub fn try_load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::info!(?path, "model artifact not found, running without model");
            return Ok(None);
        }

        tracing::info!(?path, "loading model artifact");
        let artifact = ModelArtifact::load(path)?;
        tracing::info!(
            trees = artifact.trees.len(),
            locations = artifact.locations.len(),
            "model artifact loaded"
        );
        Ok(Some(Self { artifact }))
    }

    /// The underlying artifact (for status reporting).
    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Predict a sanitized price for a normalized feature row.
    pub fn predict(&self, row: &FeatureRow) -> Result<Prediction, InferenceError> {
        let x = self.vectorize(row)?;
        let raw = self.artifact.evaluate(&x);

        let sanitized = if raw.is_finite() {
            raw
        } else {
            tracing::warn!(raw, "non-finite model output, substituting fallback");
            FALLBACK_PRICE
        };
        // The estimate is defined non-negative.
        let price = Price::from_f64(sanitized.max(0.0));

        Ok(Prediction {
            value: price.to_f64(),
            formatted: price.formatted(),
        })
    }

    /// Build the dense input vector: scaled numerics in schema order, then
    /// the one-hot location block. Unseen locations encode as all-zeros.
    fn vectorize(&self, row: &FeatureRow) -> Result<Vec<f64>, InferenceError> {
        let schema = FeatureSchema::canonical();
        if row.len() != schema.len() {
            return Err(InferenceError::ShapeMismatch {
                got: row.len(),
                want: schema.len(),
            });
        }

        let mut x = Vec::with_capacity(self.artifact.input_dim());
        let mut location: Option<&str> = None;
        let mut numeric_index = 0usize;

        for (field, value) in schema.fields().iter().zip(row.values()) {
            match field.kind {
                FieldKind::Categorical => {
                    location = Some(value.as_text().ok_or(InferenceError::KindMismatch {
                        field: field.name,
                    })?);
                }
                FieldKind::Continuous | FieldKind::Discrete | FieldKind::Amenity => {
                    let v = value.as_f64().ok_or(InferenceError::KindMismatch {
                        field: field.name,
                    })?;
                    x.push(self.artifact.scaler.transform(numeric_index, v));
                    numeric_index += 1;
                }
            }
        }

        let location = location.unwrap_or_default();
        for category in &self.artifact.locations {
            x.push(if category == location { 1.0 } else { 0.0 });
        }

        Ok(x)
    }
}

/// The estimator handed to the HTTP layer: a predictor when the artifact
/// loaded, or the degraded model-unavailable state otherwise.
pub struct PriceEstimator {
    predictor: Option<PricePredictor>,
}

impl PriceEstimator {
    pub fn new(predictor: Option<PricePredictor>) -> Self {
        Self { predictor }
    }

    /// Load the estimator from an artifact path; a missing artifact
    /// yields the degraded state rather than an error.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(PricePredictor::try_load(path)?))
    }

    /// Whether a model is loaded and predictions will succeed.
    pub fn is_ready(&self) -> bool {
        self.predictor.is_some()
    }

    /// The loaded predictor, if any.
    pub fn predictor(&self) -> Option<&PricePredictor> {
        self.predictor.as_ref()
    }

    /// Known location categories, empty when no model is loaded.
    pub fn locations(&self) -> &[String] {
        self.predictor
            .as_ref()
            .map(|p| p.artifact().locations.as_slice())
            .unwrap_or_default()
    }

    /// Run inference, surfacing the model-unavailable state as a value.
    pub fn infer(&self, row: &FeatureRow) -> Result<Prediction, InferenceError> {
        match &self.predictor {
            Some(predictor) => predictor.predict(row),
            None => Err(InferenceError::ModelUnavailable),
        }
    }
}
