//! Stunting dataset: schema validation, missing-value report and summaries
//!
//! The dataset is loaded once at startup and never mutated afterwards.
//! Columns are normalised to canonical types: categorical and target columns
//! as `String`, `Age` as `Int64`, measurements as `Float64`.

pub mod schema;
pub mod summary;

pub use schema::{ColumnKind, FEATURE_COLUMNS, SCHEMA, TARGET_COLUMN};
pub use summary::{describe, preview, ColumnSummary, TablePreview};

use crate::error::{Result, StuntingError};
use crate::utils::DataLoader;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Number of missing entries in one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingCount {
    pub column: String,
    pub count: usize,
}

/// The loaded, schema-checked dataset
#[derive(Debug, Clone)]
pub struct StuntingDataset {
    frame: DataFrame,
    source: Option<PathBuf>,
}

impl StuntingDataset {
    /// Load and validate a dataset file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = DataLoader::new().load(path)?;
        let mut dataset = Self::from_frame(raw)?;
        dataset.source = Some(path.to_path_buf());

        info!(
            path = %path.display(),
            rows = dataset.len(),
            columns = dataset.frame.width(),
            "Dataset loaded"
        );
        for missing in dataset.missing_values() {
            if missing.count > 0 {
                warn!(column = %missing.column, count = missing.count, "Column has missing values");
            } else {
                info!(column = %missing.column, count = missing.count, "Missing values");
            }
        }

        Ok(dataset)
    }

    /// Validate an in-memory frame against the schema.
    ///
    /// Extra columns are dropped; required columns are reordered and cast
    /// to their canonical types.
    pub fn from_frame(df: DataFrame) -> Result<Self> {
        let mut columns: Vec<Column> = Vec::with_capacity(SCHEMA.len());

        for (name, kind) in SCHEMA.iter() {
            let column = find_column(&df, name)?;
            let series = column.as_materialized_series();
            let normalized = match kind {
                ColumnKind::Categorical | ColumnKind::Target => text_series(name, series)?,
                ColumnKind::Measurement => float_series(name, series)?,
                ColumnKind::Integer => integer_series(name, series)?,
            };
            columns.push(normalized.into());
        }

        let frame = DataFrame::new(columns)?;
        if frame.height() == 0 {
            return Err(StuntingError::DataError("Dataset has no rows".to_string()));
        }

        Ok(Self { frame, source: None })
    }

    /// Canonical frame (categorical columns still as text)
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// File the dataset was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Per-column count of missing entries, in schema order
    pub fn missing_values(&self) -> Vec<MissingCount> {
        self.frame
            .get_columns()
            .iter()
            .map(|col| MissingCount {
                column: col.name().to_string(),
                count: col.null_count(),
            })
            .collect()
    }

    /// Total number of missing entries
    pub fn total_missing(&self) -> usize {
        self.missing_values().iter().map(|m| m.count).sum()
    }
}

fn find_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.get_columns()
        .iter()
        .find(|col| col.name().trim() == name)
        .ok_or_else(|| {
            let found: Vec<String> = df
                .get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect();
            StuntingError::SchemaError(format!(
                "Missing required column '{}' (found: {})",
                name,
                found.join(", ")
            ))
        })
}

/// Text column with surrounding whitespace removed; blanks become nulls
fn text_series(name: &str, series: &Series) -> Result<Series> {
    let as_text = series
        .cast(&DataType::String)
        .map_err(|e| StuntingError::SchemaError(format!("Column '{}': {}", name, e)))?;
    let trimmed: StringChunked = as_text
        .str()?
        .into_iter()
        .map(|v| v.map(str::trim).filter(|s| !s.is_empty()))
        .collect();
    Ok(trimmed.with_name(name.into()).into_series())
}

fn float_series(name: &str, series: &Series) -> Result<Series> {
    let source = if series.dtype() == &DataType::String {
        text_series(name, series)?
    } else {
        series.clone()
    };
    let cast = source.strict_cast(&DataType::Float64).map_err(|_| {
        StuntingError::SchemaError(format!("Column '{}' must contain only numbers", name))
    })?;
    Ok(cast.with_name(name.into()))
}

fn integer_series(name: &str, series: &Series) -> Result<Series> {
    let floats = float_series(name, series)?;
    let ca = floats.f64()?;
    let mut values: Vec<Option<i64>> = Vec::with_capacity(ca.len());
    for (row, value) in ca.into_iter().enumerate() {
        match value {
            Some(v) if v.fract() != 0.0 || !v.is_finite() => {
                return Err(StuntingError::SchemaError(format!(
                    "Column '{}' row {}: expected a whole number, got {}",
                    name,
                    row + 1,
                    v
                )));
            }
            Some(v) => values.push(Some(v as i64)),
            None => values.push(None),
        }
    }
    Ok(Series::new(name.into(), values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new(" Sex ".into(), &["Male", "Female", " Female "]).into(),
            Series::new("Age".into(), &[12.0, 24.0, 36.0]).into(),
            Series::new("Birth Weight".into(), &["3.1", "2.8", ""]).into(),
            Series::new("Birth Length".into(), &[49.0, 48.5, 50.0]).into(),
            Series::new("Body Weight".into(), &[9.5, 10.2, 12.0]).into(),
            Series::new("Body Length".into(), &[74.0, 80.5, 88.0]).into(),
            Series::new("ASI Eksklusif".into(), &["Yes", "No", "Yes"]).into(),
            Series::new("Stunting".into(), &["No", "Yes", "No"]).into(),
            Series::new("Notes".into(), &["a", "b", "c"]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_frame_normalizes_schema() {
        let dataset = StuntingDataset::from_frame(raw_frame()).unwrap();
        let frame = dataset.frame();

        assert_eq!(frame.width(), SCHEMA.len());
        assert_eq!(frame.column("Age").unwrap().dtype(), &DataType::Int64);
        assert_eq!(frame.column("Birth Weight").unwrap().dtype(), &DataType::Float64);
        assert_eq!(frame.column("Sex").unwrap().dtype(), &DataType::String);
        assert!(frame.column("Notes").is_err());

        let sex_column = frame.column("Sex").unwrap().as_materialized_series();
        let sex = sex_column.str().unwrap();
        assert_eq!(sex.get(2), Some("Female"));
    }

    #[test]
    fn test_missing_values_are_counted_not_dropped() {
        let dataset = StuntingDataset::from_frame(raw_frame()).unwrap();
        assert_eq!(dataset.len(), 3);

        let missing = dataset.missing_values();
        let birth_weight = missing.iter().find(|m| m.column == "Birth Weight").unwrap();
        assert_eq!(birth_weight.count, 1);
        assert_eq!(dataset.total_missing(), 1);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let df = raw_frame().drop("Body Length").unwrap();
        let err = StuntingDataset::from_frame(df).unwrap_err();
        assert!(matches!(err, StuntingError::SchemaError(_)));
        assert!(err.to_string().contains("Body Length"));
    }

    #[test]
    fn test_non_numeric_measurement_is_schema_error() {
        let mut df = raw_frame();
        df.replace("Body Weight", Series::new("Body Weight".into(), &["9.5", "heavy", "12"]))
            .unwrap();
        let err = StuntingDataset::from_frame(df).unwrap_err();
        assert!(err.to_string().contains("Body Weight"));
    }

    #[test]
    fn test_fractional_age_is_schema_error() {
        let mut df = raw_frame();
        df.replace("Age", Series::new("Age".into(), &[12.0, 24.5, 36.0])).unwrap();
        assert!(StuntingDataset::from_frame(df).is_err());
    }
}
