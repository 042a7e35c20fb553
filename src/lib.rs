//! Stunting Predictor - child stunting risk from birth and growth measurements
//!
//! At startup the crate loads the stunting dataset, encodes its categorical
//! columns, splits and scales it, trains three candidate classifiers and
//! keeps the one with the best held-out accuracy. A small web app then serves
//! predictions and dataset views from that single trained pipeline.
//!
//! # Modules
//!
//! - [`dataset`] - Schema validation, missing-value report, summaries
//! - [`preprocessing`] - Label encoders, feature matrix, standard scaler
//! - [`training`] - Logistic regression, random forest, gradient boosting,
//!   split and model selection
//! - [`inference`] - Input validation and single-row prediction
//! - [`visualization`] - SVG histogram and pairplot
//! - [`server`] - HTML views and JSON API
//! - [`utils`] - Spreadsheet and CSV loading

pub mod error;

pub mod dataset;
pub mod inference;
pub mod preprocessing;
pub mod training;
pub mod visualization;

pub mod server;
pub mod utils;

pub use error::{Result, StuntingError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Result, StuntingError};

    pub use crate::dataset::{describe, preview, ColumnSummary, StuntingDataset, FEATURE_COLUMNS};

    pub use crate::preprocessing::{FeatureEncoders, LabelEncoder, StandardScaler};

    pub use crate::training::{
        ModelKind, ModelMetrics, ModelScore, TrainEngine, TrainedModel, TrainedPipeline,
        TrainingConfig,
    };

    pub use crate::inference::{PredictionInput, Predictor, StuntingPrediction};

    pub use crate::visualization::{render_histogram, render_pairplot};

    pub use crate::server::{create_router, run_server, AppState, ServerConfig};
}
