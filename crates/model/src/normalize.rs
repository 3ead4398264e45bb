//! Feature normalization: arbitrary caller payloads → schema-complete rows.
//!
//! [`FeatureSchema::normalize`] maps a [`RawRecord`] onto the fixed schema:
//! every field is looked up under its caller-facing alias first, then under
//! its verbatim schema name, and coerced per its declared kind. Coercion is
//! fail-soft — malformed input degrades to the field's default instead of
//! failing the request. The output row always contains exactly one value
//! per schema field, in declared order.

use hv_core::types::{RawRecord, RawValue};

use crate::schema::{FeatureSchema, FieldKind, UNKNOWN_LOCATION};

/// A single typed value in a normalized feature row.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Categorical text, trimmed and lower-cased.
    Text(String),
    /// Discrete count or amenity flag.
    Int(i64),
    /// Continuous measurement.
    Float(f64),
}

impl FieldValue {
    /// Numeric view of the value; `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::Int(n) => Some(*n as f64),
            FieldValue::Float(x) => Some(*x),
        }
    }

    /// Text view of the value; `None` for numbers.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Reinterpret as a raw payload value.
    fn to_raw(&self) -> RawValue {
        match self {
            FieldValue::Text(s) => RawValue::Text(s.clone()),
            FieldValue::Int(n) => RawValue::Number(*n as f64),
            FieldValue::Float(x) => RawValue::Number(*x),
        }
    }
}

/// A fully-populated feature row: one value per schema field, in the
/// schema's declared order. Produced only by normalization, so the
/// completeness invariant holds by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    values: Vec<FieldValue>,
}

impl FeatureRow {
    /// The row values, schema-ordered.
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look up a value by schema field name.
    pub fn get<'a>(&'a self, schema: &FeatureSchema, name: &str) -> Option<&'a FieldValue> {
        schema.index_of(name).and_then(|i| self.values.get(i))
    }

    /// Reinterpret the row as a raw record keyed by schema names.
    ///
    /// Normalizing the result yields this row again: normalization is a
    /// fixed point on its own output.
    pub fn to_record(&self, schema: &FeatureSchema) -> RawRecord {
        schema
            .fields()
            .iter()
            .zip(&self.values)
            .map(|(f, v)| (f.name.to_string(), v.to_raw()))
            .collect()
    }
}

impl FeatureSchema {
    /// Normalize a raw record onto the schema. Never fails; any input,
    /// including the empty record, yields a complete row.
    pub fn normalize(&self, record: &RawRecord) -> FeatureRow {
        let values = self
            .fields()
            .iter()
            .map(|field| {
                let supplied = self
                    .alias_of(field.name)
                    .and_then(|alias| record.get(alias))
                    .or_else(|| record.get(field.name));
                coerce(field.kind, supplied)
            })
            .collect();
        FeatureRow { values }
    }
}

/// Coerce a raw value (or its absence) per the target field's kind.
fn coerce(kind: FieldKind, value: Option<&RawValue>) -> FieldValue {
    match kind {
        FieldKind::Categorical => FieldValue::Text(coerce_category(value)),
        FieldKind::Continuous => FieldValue::Float(coerce_number(value)),
        FieldKind::Discrete => FieldValue::Int(coerce_number(value).trunc() as i64),
        FieldKind::Amenity => FieldValue::Int(coerce_flag(value)),
    }
}

fn coerce_category(value: Option<&RawValue>) -> String {
    match value {
        Some(RawValue::Text(s)) => {
            let normalized = s.trim().to_lowercase();
            if normalized.is_empty() {
                UNKNOWN_LOCATION.to_string()
            } else {
                normalized
            }
        }
        _ => UNKNOWN_LOCATION.to_string(),
    }
}

fn coerce_number(value: Option<&RawValue>) -> f64 {
    match value {
        Some(RawValue::Number(n)) if n.is_finite() => *n,
        Some(RawValue::Text(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(0.0),
        Some(RawValue::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

fn coerce_flag(value: Option<&RawValue>) -> i64 {
    match value {
        Some(RawValue::Bool(b)) => i64::from(*b),
        Some(RawValue::Text(s)) => i64::from(matches!(
            s.trim().to_lowercase().as_str(),
            "yes" | "y" | "true" | "1"
        )),
        Some(RawValue::Number(n)) => i64::from(*n == 1.0),
        _ => 0,
    }
}
