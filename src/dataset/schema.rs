//! Column layout of the stunting dataset

use serde::{Deserialize, Serialize};

pub const SEX: &str = "Sex";
pub const AGE: &str = "Age";
pub const BIRTH_WEIGHT: &str = "Birth Weight";
pub const BIRTH_LENGTH: &str = "Birth Length";
pub const BODY_WEIGHT: &str = "Body Weight";
pub const BODY_LENGTH: &str = "Body Length";
pub const BREASTFEEDING: &str = "ASI Eksklusif";
pub const STUNTING: &str = "Stunting";

/// Target column name
pub const TARGET_COLUMN: &str = STUNTING;

/// Feature columns, in the order of the feature matrix
pub const FEATURE_COLUMNS: [&str; 7] = [
    SEX,
    AGE,
    BIRTH_WEIGHT,
    BIRTH_LENGTH,
    BODY_WEIGHT,
    BODY_LENGTH,
    BREASTFEEDING,
];

/// Category vocabulary for `Sex`; the index is the encoded value
pub const SEX_CLASSES: [&str; 2] = ["Male", "Female"];

/// Category vocabulary for `ASI Eksklusif`; the index is the encoded value
pub const BREASTFEEDING_CLASSES: [&str; 2] = ["No", "Yes"];

/// How a column is parsed and stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Text category, stored as `String`
    Categorical,
    /// Whole number, stored as `Int64`
    Integer,
    /// Continuous measurement, stored as `Float64`
    Measurement,
    /// Binary label, stored as `String` until encoded
    Target,
}

/// Every required column with its kind, in canonical frame order
pub const SCHEMA: [(&str, ColumnKind); 8] = [
    (SEX, ColumnKind::Categorical),
    (AGE, ColumnKind::Integer),
    (BIRTH_WEIGHT, ColumnKind::Measurement),
    (BIRTH_LENGTH, ColumnKind::Measurement),
    (BODY_WEIGHT, ColumnKind::Measurement),
    (BODY_LENGTH, ColumnKind::Measurement),
    (BREASTFEEDING, ColumnKind::Categorical),
    (STUNTING, ColumnKind::Target),
];
