//! Canonical feature schema for the pricing model.
//!
//! The schema is the single source of truth for what the trained model
//! expects: 46 named fields in a fixed order, each with a declared kind.
//! Both the normalizer and the artifact vectorizer consult it; no other
//! feature list exists in the codebase.
//!
//! Field names are the raw column names the model was fit on (including
//! the quirky ones like `no._of_bedrooms` and `children'splayarea`); the
//! alias map translates the friendlier caller-facing names onto them.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Sentinel category for an absent or empty location.
pub const UNKNOWN_LOCATION: &str = "unknown";

/// Declared kind of a schema field, driving coercion and vectorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free-text category (location name), case-normalized.
    Categorical,
    /// Floating-point measurement (area, distances). Default 0.0.
    Continuous,
    /// Integer count (bedrooms, floors, nearby schools). Default 0.
    Discrete,
    /// Yes/no amenity flag, coerced to 0/1. Default 0.
    Amenity,
}

/// A single named, typed schema field.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> Field {
    Field { name, kind }
}

/// The fixed feature list, in the exact order the model was trained on.
const FIELDS: &[Field] = &[
    field("location", FieldKind::Categorical),
    field("area", FieldKind::Continuous),
    field("no._of_bedrooms", FieldKind::Discrete),
    field("bathrooms", FieldKind::Discrete),
    field("multipurposeroom", FieldKind::Amenity),
    field("golfcourse", FieldKind::Amenity),
    field("ac", FieldKind::Amenity),
    field("floors", FieldKind::Discrete),
    field("garage", FieldKind::Amenity),
    field("swimmingpool", FieldKind::Amenity),
    field("distance_mainroad", FieldKind::Continuous),
    field("distance_railway", FieldKind::Continuous),
    field("distance_busstop", FieldKind::Continuous),
    field("nearby_schools", FieldKind::Discrete),
    field("sofa", FieldKind::Amenity),
    field("bed", FieldKind::Amenity),
    field("landscapedgardens", FieldKind::Amenity),
    field("24x7security", FieldKind::Amenity),
    field("microwave", FieldKind::Amenity),
    field("powerbackup", FieldKind::Amenity),
    field("washingmachine", FieldKind::Amenity),
    field("wifi", FieldKind::Amenity),
    field("shoppingmall", FieldKind::Amenity),
    field("carparking", FieldKind::Amenity),
    field("gymnasium", FieldKind::Amenity),
    field("liftavailable", FieldKind::Amenity),
    field("school", FieldKind::Amenity),
    field("joggingtrack", FieldKind::Amenity),
    field("clubhouse", FieldKind::Amenity),
    field("vaastucompliant", FieldKind::Amenity),
    field("wardrobe", FieldKind::Amenity),
    field("rainwaterharvesting", FieldKind::Amenity),
    field("resale", FieldKind::Amenity),
    field("tv", FieldKind::Amenity),
    field("maintenancestaff", FieldKind::Amenity),
    field("atm", FieldKind::Amenity),
    field("refrigerator", FieldKind::Amenity),
    field("intercom", FieldKind::Amenity),
    field("hospital", FieldKind::Amenity),
    field("indoorgames", FieldKind::Amenity),
    field("sportsfacility", FieldKind::Amenity),
    field("diningtable", FieldKind::Amenity),
    field("gasconnection", FieldKind::Amenity),
    field("children'splayarea", FieldKind::Amenity),
    field("staffquarter", FieldKind::Amenity),
    field("cafeteria", FieldKind::Amenity),
];

/// Caller-facing field name → schema field name.
///
/// Most entries are identity mappings; the three renames exist because the
/// public API uses readable names for columns the training data spelled
/// differently.
const ALIASES: &[(&str, &str)] = &[
    ("location", "location"),
    ("area", "area"),
    ("bedrooms", "no._of_bedrooms"),
    ("bathrooms", "bathrooms"),
    ("multipurpose_room", "multipurposeroom"),
    ("golfcourse_view", "golfcourse"),
    ("ac", "ac"),
    ("floors", "floors"),
    ("garage", "garage"),
    ("swimmingpool", "swimmingpool"),
    ("distance_mainroad", "distance_mainroad"),
    ("distance_railway", "distance_railway"),
    ("distance_busstop", "distance_busstop"),
    ("nearby_schools", "nearby_schools"),
];

/// The ordered feature schema plus its alias map.
///
/// Process-wide and read-only: built once via [`FeatureSchema::canonical`]
/// and never mutated. Both the normalizer and the model vectorizer take it
/// by shared reference.
pub struct FeatureSchema {
    index: HashMap<&'static str, usize>,
    alias_of: HashMap<&'static str, &'static str>,
    numeric_len: usize,
}

static CANONICAL: LazyLock<FeatureSchema> = LazyLock::new(FeatureSchema::build);

impl FeatureSchema {
    /// The canonical schema the model was trained on.
    pub fn canonical() -> &'static FeatureSchema {
        &CANONICAL
    }

    fn build() -> Self {
        let index = FIELDS
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name, i))
            .collect();
        let alias_of = ALIASES.iter().map(|&(caller, schema)| (schema, caller)).collect();
        let numeric_len = FIELDS
            .iter()
            .filter(|f| f.kind != FieldKind::Categorical)
            .count();
        Self {
            index,
            alias_of,
            numeric_len,
        }
    }

    /// All fields, in declared order.
    pub fn fields(&self) -> &'static [Field] {
        FIELDS
    }

    /// Number of fields in the schema.
    pub fn len(&self) -> usize {
        FIELDS.len()
    }

    pub fn is_empty(&self) -> bool {
        FIELDS.is_empty()
    }

    /// Number of non-categorical fields (the scaled numeric block).
    pub fn numeric_len(&self) -> usize {
        self.numeric_len
    }

    /// Position of a field by schema name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// The caller-facing alias for a schema field, if one is declared.
    pub fn alias_of(&self, schema_name: &str) -> Option<&'static str> {
        self.alias_of.get(schema_name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_size() {
        let schema = FeatureSchema::canonical();
        assert_eq!(schema.len(), 46);
        assert_eq!(schema.numeric_len(), 45);
    }

    #[test]
    fn test_declared_order() {
        let schema = FeatureSchema::canonical();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name).collect();
        assert_eq!(names[0], "location");
        assert_eq!(names[1], "area");
        assert_eq!(names[2], "no._of_bedrooms");
        assert_eq!(names[45], "cafeteria");
    }

    #[test]
    fn test_index_of_quirky_names() {
        let schema = FeatureSchema::canonical();
        assert!(schema.index_of("children'splayarea").is_some());
        assert!(schema.index_of("24x7security").is_some());
        assert_eq!(schema.index_of("not_a_field"), None);
    }

    #[test]
    fn test_alias_renames() {
        let schema = FeatureSchema::canonical();
        assert_eq!(schema.alias_of("no._of_bedrooms"), Some("bedrooms"));
        assert_eq!(schema.alias_of("multipurposeroom"), Some("multipurpose_room"));
        assert_eq!(schema.alias_of("golfcourse"), Some("golfcourse_view"));
        // Identity aliases resolve to themselves.
        assert_eq!(schema.alias_of("area"), Some("area"));
        // Plain amenity flags have no alias; callers use the schema name.
        assert_eq!(schema.alias_of("wifi"), None);
    }

    #[test]
    fn test_alias_targets_exist() {
        let schema = FeatureSchema::canonical();
        for field in schema.fields() {
            if let Some(alias) = schema.alias_of(field.name) {
                assert!(!alias.is_empty());
            }
        }
    }

    #[test]
    fn test_exactly_one_categorical_field() {
        let schema = FeatureSchema::canonical();
        let categorical: Vec<_> = schema
            .fields()
            .iter()
            .filter(|f| f.kind == FieldKind::Categorical)
            .collect();
        assert_eq!(categorical.len(), 1);
        assert_eq!(categorical[0].name, "location");
    }
}
