//! Loosely-typed request payloads.
//!
//! Callers send arbitrary JSON objects with no guarantee of completeness or
//! type-correctness. Each value is captured as a [`RawValue`] — a tagged
//! union of the primitive kinds the feature coercion layer knows how to
//! handle. Nulls, arrays, and nested objects land in [`RawValue::Other`]
//! and are treated as absent downstream: a garbage field must never block
//! a price estimate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single loosely-typed value from a caller payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// JSON boolean.
    Bool(bool),
    /// JSON number (integers and floats alike).
    Number(f64),
    /// JSON string.
    Text(String),
    /// Anything else: null, arrays, nested objects. Coercion treats this
    /// the same as an absent key.
    Other(serde_json::Value),
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

/// An arbitrary mapping of caller-supplied keys to loosely-typed values.
///
/// Deserialized directly from the JSON request body. Keys that match no
/// schema field or alias are carried along and silently ignored by
/// normalization — upstream callers evolve independently of the schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(HashMap<String, RawValue>);

impl RawRecord {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value by exact key.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0.get(key)
    }

    /// Insert a value, replacing any existing entry for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, RawValue)> for RawRecord {
    fn from_iter<T: IntoIterator<Item = (String, RawValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
