//! # hv-core
//!
//! Shared foundation for the HomeValue price estimation service.
//!
//! This crate provides the building blocks used across the workspace:
//! layered configuration, the logging framework, the loosely-typed request
//! payload model, and the fixed-point rupee price type used for rounding
//! and display of predictions.

pub mod config;
pub mod logging;
pub mod types;
