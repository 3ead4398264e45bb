//! # hv-dataset
//!
//! Offline dataset preparation for the HomeValue training pipeline.
//! Merges heterogeneous public housing CSVs into a single training file
//! with normalized headers and a canonical `sale_price` target column.

pub mod merge;

pub use merge::{merge_directory, MergeSummary, TARGET_COLUMN};
