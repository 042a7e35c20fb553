//! Application state management

use super::ServerConfig;
use crate::dataset::StuntingDataset;
use crate::error::Result;
use crate::training::{TrainEngine, TrainedPipeline, TrainingConfig};
use chrono::{DateTime, Utc};
use tracing::info;

/// Application state shared across handlers.
///
/// Built once before the listener binds; handlers only read it.
pub struct AppState {
    pub config: ServerConfig,
    pub dataset: StuntingDataset,
    pub pipeline: TrainedPipeline,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Load the configured dataset and run the training pipeline
    pub fn bootstrap(config: ServerConfig) -> Result<Self> {
        info!(path = %config.data_path.display(), "Loading dataset");
        let dataset = StuntingDataset::load(&config.data_path)?;
        Self::from_dataset(config, dataset)
    }

    /// Train on an already loaded dataset
    pub fn from_dataset(config: ServerConfig, dataset: StuntingDataset) -> Result<Self> {
        let engine = TrainEngine::new(TrainingConfig::default());
        let pipeline = engine.fit(&dataset)?;
        Ok(Self {
            config,
            dataset,
            pipeline,
            started_at: Utc::now(),
        })
    }
}
