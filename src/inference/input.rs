//! Prediction input record and its validation rules

use crate::dataset::schema::{
    AGE, BIRTH_LENGTH, BIRTH_WEIGHT, BODY_LENGTH, BODY_WEIGHT, BREASTFEEDING, SEX,
};
use crate::error::{Result, StuntingError};
use serde::{Deserialize, Serialize};

/// Largest accepted age
pub const MAX_AGE: u32 = 100;
/// Largest accepted value of a weight or length measurement
pub const MAX_MEASUREMENT: f64 = 100.0;

/// One child's measurements, as entered on the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    pub sex: String,
    pub age: u32,
    pub birth_weight: f64,
    pub birth_length: f64,
    pub body_weight: f64,
    pub body_length: f64,
    pub breastfeeding: String,
}

impl PredictionInput {
    /// Check completeness and ranges.
    ///
    /// Zero is the unset value of every numeric field; any zero makes the
    /// input incomplete and the model must not be called.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.sex.trim().is_empty() {
            missing.push(SEX);
        }
        if self.age == 0 {
            missing.push(AGE);
        }
        for (name, value) in self.measurements() {
            if value == 0.0 {
                missing.push(name);
            }
        }
        if self.breastfeeding.trim().is_empty() {
            missing.push(BREASTFEEDING);
        }
        if !missing.is_empty() {
            return Err(StuntingError::IncompleteInput {
                fields: missing.into_iter().map(String::from).collect(),
            });
        }

        if self.age > MAX_AGE {
            return Err(StuntingError::InvalidInput(format!(
                "{} must be between 0 and {}, got {}",
                AGE, MAX_AGE, self.age
            )));
        }
        for (name, value) in self.measurements() {
            if !value.is_finite() || !(0.0..=MAX_MEASUREMENT).contains(&value) {
                return Err(StuntingError::InvalidInput(format!(
                    "{} must be between 0.0 and {:.1}, got {}",
                    name, MAX_MEASUREMENT, value
                )));
            }
        }

        Ok(())
    }

    fn measurements(&self) -> [(&'static str, f64); 4] {
        [
            (BIRTH_WEIGHT, self.birth_weight),
            (BIRTH_LENGTH, self.birth_length),
            (BODY_WEIGHT, self.body_weight),
            (BODY_LENGTH, self.body_length),
        ]
    }
}
