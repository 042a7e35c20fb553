//! Label encoding for the categorical feature columns

use crate::dataset::schema::{
    BREASTFEEDING, BREASTFEEDING_CLASSES, FEATURE_COLUMNS, SEX, SEX_CLASSES, TARGET_COLUMN,
};
use crate::error::{Result, StuntingError};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Label encoder bound to a single column.
///
/// Codes are the positions in the vocabulary, so the mapping does not depend
/// on row order or on which categories happen to appear in the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    column: String,
    classes: Vec<String>,
    observed: Vec<bool>,
    is_fitted: bool,
}

impl LabelEncoder {
    /// Create an encoder for `column` with an ordered class list
    pub fn with_vocabulary(column: impl Into<String>, classes: &[&str]) -> Self {
        Self {
            column: column.into(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            observed: vec![false; classes.len()],
            is_fitted: false,
        }
    }

    /// Check every category in `series` against the vocabulary
    pub fn fit(&mut self, series: &Series) -> Result<&mut Self> {
        let values = series.str()?;
        let mut observed = vec![false; self.classes.len()];

        for value in values.into_iter().flatten() {
            let code = self.lookup(value)?;
            observed[code] = true;
        }

        self.observed = observed;
        self.is_fitted = true;
        Ok(self)
    }

    /// Code of a single category
    pub fn encode(&self, value: &str) -> Result<usize> {
        if !self.is_fitted {
            return Err(StuntingError::ModelNotFitted);
        }
        self.lookup(value)
    }

    /// Encode a text column into `Int64` codes; nulls stay null
    pub fn transform(&self, series: &Series) -> Result<Series> {
        if !self.is_fitted {
            return Err(StuntingError::ModelNotFitted);
        }

        let values = series.str()?;
        let codes = values
            .into_iter()
            .map(|v| v.map(|s| self.lookup(s).map(|c| c as i64)).transpose())
            .collect::<Result<Vec<Option<i64>>>>()?;

        Ok(Series::new(series.name().clone(), codes))
    }

    /// Vocabulary in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Classes seen while fitting
    pub fn observed(&self) -> Vec<&str> {
        self.classes
            .iter()
            .zip(&self.observed)
            .filter(|(_, seen)| **seen)
            .map(|(c, _)| c.as_str())
            .collect()
    }

    fn lookup(&self, value: &str) -> Result<usize> {
        let needle = value.trim();
        self.classes
            .iter()
            .position(|c| c.eq_ignore_ascii_case(needle))
            .ok_or_else(|| StuntingError::UnknownCategory {
                column: self.column.clone(),
                value: value.to_string(),
            })
    }
}

/// One encoder per categorical feature column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureEncoders {
    pub sex: LabelEncoder,
    pub breastfeeding: LabelEncoder,
}

impl Default for FeatureEncoders {
    fn default() -> Self {
        Self {
            sex: LabelEncoder::with_vocabulary(SEX, &SEX_CLASSES),
            breastfeeding: LabelEncoder::with_vocabulary(BREASTFEEDING, &BREASTFEEDING_CLASSES),
        }
    }
}

impl FeatureEncoders {
    /// Fit both encoders on the full dataset frame
    pub fn fit(df: &DataFrame) -> Result<Self> {
        let mut encoders = Self::default();
        encoders
            .sex
            .fit(df.column(SEX)?.as_materialized_series())?;
        encoders
            .breastfeeding
            .fit(df.column(BREASTFEEDING)?.as_materialized_series())?;

        for encoder in [&encoders.sex, &encoders.breastfeeding] {
            let observed = encoder.observed();
            if observed.len() < encoder.classes.len() {
                warn!(
                    column = %encoder.column,
                    observed = ?observed,
                    "Not every category appears in the dataset"
                );
            }
        }
        Ok(encoders)
    }

    /// Replace the categorical columns and the target with `Int64` codes
    pub fn encode_frame(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut encoded = df.clone();

        let sex = self.sex.transform(df.column(SEX)?.as_materialized_series())?;
        let breastfeeding = self
            .breastfeeding
            .transform(df.column(BREASTFEEDING)?.as_materialized_series())?;
        let target = encode_target(df.column(TARGET_COLUMN)?.as_materialized_series())?;

        encoded.replace(SEX, sex)?;
        encoded.replace(BREASTFEEDING, breastfeeding)?;
        encoded.replace(TARGET_COLUMN, target)?;
        Ok(encoded)
    }

    pub fn encode_sex(&self, value: &str) -> Result<f64> {
        self.sex.encode(value).map(|c| c as f64)
    }

    pub fn encode_breastfeeding(&self, value: &str) -> Result<f64> {
        self.breastfeeding.encode(value).map(|c| c as f64)
    }
}

/// Parse a binary label: Yes/True/1 → 1, No/False/0 → 0
pub fn parse_binary_label(value: &str) -> Option<f64> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" | "1.0" => Some(1.0),
        "no" | "false" | "0" | "0.0" => Some(0.0),
        _ => None,
    }
}

fn encode_target(series: &Series) -> Result<Series> {
    let values = series.str()?;
    let codes = values
        .into_iter()
        .map(|v| match v {
            None => Ok(None),
            Some(s) => parse_binary_label(s).map(|l| Some(l as i64)).ok_or_else(|| {
                StuntingError::DataError(format!(
                    "Column '{}' has a value that is not a binary label: '{}'",
                    TARGET_COLUMN, s
                ))
            }),
        })
        .collect::<Result<Vec<Option<i64>>>>()?;
    Ok(Series::new(series.name().clone(), codes))
}

/// Build the feature matrix and target vector from an encoded frame.
///
/// Fails on the first column that still holds missing values.
pub fn feature_matrix(encoded: &DataFrame) -> Result<(Array2<f64>, Array1<f64>)> {
    let n_rows = encoded.height();
    let mut x = Array2::<f64>::zeros((n_rows, FEATURE_COLUMNS.len()));

    for (j, name) in FEATURE_COLUMNS.iter().enumerate() {
        let values = numeric_values(encoded, name)?;
        for (i, v) in values.into_iter().enumerate() {
            x[[i, j]] = v;
        }
    }

    let y = Array1::from_vec(numeric_values(encoded, TARGET_COLUMN)?);
    Ok((x, y))
}

fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| StuntingError::FeatureNotFound(name.to_string()))?;
    let floats = column.as_materialized_series().cast(&DataType::Float64)?;
    let ca = floats.f64()?;

    if ca.null_count() > 0 {
        return Err(StuntingError::DataError(format!(
            "Column '{}' has {} missing value(s); fill or remove them before training",
            name,
            ca.null_count()
        )));
    }

    Ok(ca.into_no_null_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("Sex".into(), &["Female", "Male", "female"]).into(),
            Series::new("Age".into(), &[12i64, 24, 36]).into(),
            Series::new("Birth Weight".into(), &[3.1, 2.8, 3.0]).into(),
            Series::new("Birth Length".into(), &[49.0, 48.5, 50.0]).into(),
            Series::new("Body Weight".into(), &[9.5, 10.2, 12.0]).into(),
            Series::new("Body Length".into(), &[74.0, 80.5, 88.0]).into(),
            Series::new("ASI Eksklusif".into(), &["Yes", "No", "Yes"]).into(),
            Series::new("Stunting".into(), &["No", "Yes", "No"]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_fixed_mapping() {
        let encoders = FeatureEncoders::fit(&raw_frame()).unwrap();
        assert_eq!(encoders.encode_sex("Male").unwrap(), 0.0);
        assert_eq!(encoders.encode_sex("Female").unwrap(), 1.0);
        assert_eq!(encoders.encode_breastfeeding("No").unwrap(), 0.0);
        assert_eq!(encoders.encode_breastfeeding("Yes").unwrap(), 1.0);
    }

    #[test]
    fn test_encoding_is_order_independent() {
        let mut forward = LabelEncoder::with_vocabulary("Sex", &SEX_CLASSES);
        forward
            .fit(&Series::new("Sex".into(), &["Male", "Female"]))
            .unwrap();
        let mut reverse = LabelEncoder::with_vocabulary("Sex", &SEX_CLASSES);
        reverse
            .fit(&Series::new("Sex".into(), &["Female", "Female", "Male"]))
            .unwrap();

        for value in ["Female", "Male", "Female"] {
            assert_eq!(forward.encode(value).unwrap(), reverse.encode(value).unwrap());
        }
    }

    #[test]
    fn test_columns_do_not_share_a_mapping() {
        let encoders = FeatureEncoders::fit(&raw_frame()).unwrap();
        assert!(encoders.encode_sex("Yes").is_err());
        assert!(encoders.encode_breastfeeding("Female").is_err());
    }

    #[test]
    fn test_unknown_category_fails_fit() {
        let mut encoder = LabelEncoder::with_vocabulary("Sex", &SEX_CLASSES);
        let err = encoder
            .fit(&Series::new("Sex".into(), &["Male", "Unknown"]))
            .unwrap_err();
        assert!(matches!(err, StuntingError::UnknownCategory { .. }));
    }

    #[test]
    fn test_encode_before_fit() {
        let encoder = LabelEncoder::with_vocabulary("Sex", &SEX_CLASSES);
        assert!(matches!(encoder.encode("Male"), Err(StuntingError::ModelNotFitted)));
    }

    #[test]
    fn test_observed_classes() {
        let mut encoder = LabelEncoder::with_vocabulary("ASI Eksklusif", &BREASTFEEDING_CLASSES);
        encoder
            .fit(&Series::new("ASI Eksklusif".into(), &["Yes", "Yes"]))
            .unwrap();
        assert_eq!(encoder.observed(), vec!["Yes"]);
        assert_eq!(encoder.classes().len(), 2);
    }

    #[test]
    fn test_parse_binary_label() {
        assert_eq!(parse_binary_label("Yes"), Some(1.0));
        assert_eq!(parse_binary_label(" true "), Some(1.0));
        assert_eq!(parse_binary_label("0"), Some(0.0));
        assert_eq!(parse_binary_label("NO"), Some(0.0));
        assert_eq!(parse_binary_label("maybe"), None);
    }

    #[test]
    fn test_feature_matrix() {
        let df = raw_frame();
        let encoders = FeatureEncoders::fit(&df).unwrap();
        let encoded = encoders.encode_frame(&df).unwrap();
        let (x, y) = feature_matrix(&encoded).unwrap();

        assert_eq!(x.dim(), (3, 7));
        assert_eq!(x.row(0).to_vec(), vec![1.0, 12.0, 3.1, 49.0, 9.5, 74.0, 1.0]);
        assert_eq!(y.to_vec(), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_feature_matrix_rejects_nulls() {
        let mut df = raw_frame();
        df.replace(
            "Body Weight",
            Series::new("Body Weight".into(), &[Some(9.5), None, Some(12.0)]),
        )
        .unwrap();
        let encoded = FeatureEncoders::fit(&df).unwrap().encode_frame(&df).unwrap();
        let err = feature_matrix(&encoded).unwrap_err();
        assert!(err.to_string().contains("Body Weight"));
    }
}
