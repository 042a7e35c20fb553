//! Data loading utilities

use crate::error::{Result, StuntingError};
use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// File formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Excel,
    Unknown,
}

impl FileFormat {
    /// Detect file format from extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => FileFormat::Csv,
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => FileFormat::Excel,
            _ => FileFormat::Unknown,
        }
    }
}

/// Data loader for spreadsheet and CSV files
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Rows used for CSV schema inference
    infer_schema_length: Option<usize>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            infer_schema_length: Some(1000),
        }
    }

    /// Detect file format from extension and load
    pub fn load(&self, path: &Path) -> Result<DataFrame> {
        if !path.exists() {
            return Err(StuntingError::DataError(format!(
                "Dataset file not found: {}",
                path.display()
            )));
        }

        match FileFormat::from_path(path) {
            FileFormat::Csv => self.load_csv(path),
            FileFormat::Excel => self.load_workbook(path),
            FileFormat::Unknown => Err(StuntingError::ConfigError(format!(
                "Unsupported dataset format: {} (expected .xlsx, .xls, .ods or .csv)",
                path.display()
            ))),
        }
    }

    /// Load a CSV file
    pub fn load_csv(&self, path: &Path) -> Result<DataFrame> {
        let file = File::open(path)?;

        let reader = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .into_reader_with_file_handle(file);

        reader
            .finish()
            .map_err(|e| StuntingError::DataError(e.to_string()))
    }

    /// Load the first worksheet of a workbook.
    ///
    /// The first row is the header. Every column is read as text; typing
    /// happens when the frame is validated against the dataset schema.
    pub fn load_workbook(&self, path: &Path) -> Result<DataFrame> {
        let mut workbook = open_workbook_auto(path)?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| StuntingError::DataError("Workbook has no worksheets".to_string()))??;

        let mut rows = range.rows();
        let header: Vec<String> = rows
            .next()
            .ok_or_else(|| StuntingError::DataError("Worksheet is empty".to_string()))?
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell_text(cell) {
                Some(name) => name,
                None => format!("column_{}", i),
            })
            .collect();

        let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); header.len()];
        for row in rows {
            if row.iter().all(|cell| cell_text(cell).is_none()) {
                continue;
            }
            for (col_idx, column) in values.iter_mut().enumerate() {
                column.push(row.get(col_idx).and_then(cell_text));
            }
        }

        debug!(
            path = %path.display(),
            columns = header.len(),
            rows = values.first().map(|c| c.len()).unwrap_or(0),
            "Read worksheet"
        );

        let columns: Vec<Column> = header
            .iter()
            .zip(values)
            .map(|(name, column)| Series::new(name.as_str().into(), column).into())
            .collect();

        DataFrame::new(columns).map_err(|e| StuntingError::DataError(e.to_string()))
    }
}

/// Text of a worksheet cell; `None` for blank and error cells.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Int(v) => Some(v.to_string()),
        Data::Float(v) => Some(v.to_string()),
        Data::Bool(v) => Some(v.to_string()),
        other => Some(other.to_string()),
    }
}
