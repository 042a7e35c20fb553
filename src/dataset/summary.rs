//! Summary statistics and table previews for the Tentang Data view

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Describe-style statistics of one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    /// Compute statistics from a numeric series; nulls are skipped
    pub fn from_series(series: &Series) -> Result<Self> {
        let floats = series.cast(&DataType::Float64)?;
        let ca = floats.f64()?;

        Ok(Self {
            name: series.name().to_string(),
            count: ca.len() - ca.null_count(),
            mean: ca.mean(),
            std: ca.std(1),
            min: ca.min(),
            q25: ca.quantile(0.25, QuantileMethod::Linear)?,
            median: ca.quantile(0.5, QuantileMethod::Linear)?,
            q75: ca.quantile(0.75, QuantileMethod::Linear)?,
            max: ca.max(),
        })
    }

    /// Row labels and values in display order
    pub fn rows(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("count", Some(self.count as f64)),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Statistics for every numeric column of a frame, in frame order
pub fn describe(df: &DataFrame) -> Result<Vec<ColumnSummary>> {
    df.get_columns()
        .iter()
        .filter(|col| {
            matches!(
                col.dtype(),
                DataType::Int32 | DataType::Int64 | DataType::Float32 | DataType::Float64
            )
        })
        .map(|col| ColumnSummary::from_series(col.as_materialized_series()))
        .collect()
}

/// First rows of a frame rendered as text cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Preview the first `n` rows of a frame
pub fn preview(df: &DataFrame, n: usize) -> Result<TablePreview> {
    let head = df.head(Some(n));
    let columns = head
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::with_capacity(head.height());
    for i in 0..head.height() {
        let row = head
            .get_columns()
            .iter()
            .map(|col| col.get(i).map(|v| cell_text(&v)))
            .collect::<PolarsResult<Vec<String>>>()?;
        rows.push(row);
    }

    Ok(TablePreview { columns, rows })
}

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(v) => format_number(*v),
        AnyValue::Float32(v) => format_number(*v as f64),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Boolean(v) => v.to_string(),
        other => other.to_string(),
    }
}

/// Format a statistic the way the tables show it
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{:.1}", v)
    } else {
        format!("{:.4}", v)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
