//! Error types for the stunting predictor

use thiserror::Error;

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, StuntingError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum StuntingError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Plot error: {0}")]
    PlotError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Unknown category '{value}' in column '{column}'")]
    UnknownCategory { column: String, value: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Incomplete input: {}", .fields.join(", "))]
    IncompleteInput { fields: Vec<String> },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<polars::error::PolarsError> for StuntingError {
    fn from(err: polars::error::PolarsError) -> Self {
        StuntingError::DataError(err.to_string())
    }
}

impl From<calamine::Error> for StuntingError {
    fn from(err: calamine::Error) -> Self {
        StuntingError::DataError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for StuntingError {
    fn from(err: ndarray::ShapeError) -> Self {
        StuntingError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StuntingError::DataError("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StuntingError = io_err.into();
        assert!(matches!(err, StuntingError::IoError(_)));
    }

    #[test]
    fn test_incomplete_input_lists_fields() {
        let err = StuntingError::IncompleteInput {
            fields: vec!["Age".to_string(), "Body Weight".to_string()],
        };
        assert_eq!(err.to_string(), "Incomplete input: Age, Body Weight");
    }
}
