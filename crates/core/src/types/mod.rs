//! Core types for the HomeValue estimation service.

pub mod price;
pub mod record;

// Re-export primary types for convenient access via `hv_core::types::*`.
pub use price::Price;
pub use record::{RawRecord, RawValue};
