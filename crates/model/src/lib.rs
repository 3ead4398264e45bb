//! # hv-model
//!
//! Feature alignment and inference for the HomeValue pricing model.
//!
//! The crate owns the canonical feature schema, the normalizer that maps
//! arbitrary caller payloads onto it, the persisted model artifact
//! (standard-scaler statistics, one-hot location encoder, boosted tree
//! ensemble), and the inference executor that turns a normalized row into
//! a sanitized, formatted price estimate.

pub mod artifact;
pub mod normalize;
pub mod predictor;
pub mod schema;

pub use artifact::{ModelArtifact, ScalerStats, Tree, TreeNode};
pub use normalize::{FeatureRow, FieldValue};
pub use predictor::{InferenceError, Prediction, PriceEstimator, PricePredictor, FALLBACK_PRICE};
pub use schema::{Field, FieldKind, FeatureSchema, UNKNOWN_LOCATION};
