//! Training engine implementation
//!
//! Runs the startup pipeline: encode, split, scale, fit the three candidate
//! classifiers, score them on the held-out rows and keep the best.

use super::gradient_boosting::{GradientBoostingClassifier, GradientBoostingConfig};
use super::linear_models::LogisticRegression;
use super::models::{Classifier, ModelMetrics};
use super::random_forest::RandomForest;
use super::split::{class_balance, train_test_split};
use super::{ModelKind, TrainingConfig};
use crate::dataset::StuntingDataset;
use crate::error::{Result, StuntingError};
use crate::inference::Predictor;
use crate::preprocessing::{feature_matrix, FeatureEncoders, StandardScaler};
use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Enum to hold trained model variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TrainedModel {
    LogisticRegression(LogisticRegression),
    RandomForest(RandomForest),
    GradientBoosting(GradientBoostingClassifier),
}

impl TrainedModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            TrainedModel::LogisticRegression(_) => ModelKind::LogisticRegression,
            TrainedModel::RandomForest(_) => ModelKind::RandomForest,
            TrainedModel::GradientBoosting(_) => ModelKind::GradientBoosting,
        }
    }

    fn as_classifier(&self) -> &dyn Classifier {
        match self {
            TrainedModel::LogisticRegression(m) => m,
            TrainedModel::RandomForest(m) => m,
            TrainedModel::GradientBoosting(m) => m,
        }
    }

    /// Probability of the positive class for every (scaled) row
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.as_classifier().predict_proba(x)
    }

    /// Per-feature importances, in feature-matrix column order
    pub fn feature_importances(&self) -> Option<Array1<f64>> {
        self.as_classifier().feature_importances()
    }
}

/// Held-out evaluation of one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    pub kind: ModelKind,
    pub metrics: ModelMetrics,
}

/// Sizes and class balance of the train/test split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub n_train: usize,
    pub n_test: usize,
    pub train_positive_rate: f64,
    pub test_positive_rate: f64,
    pub test_indices: Vec<usize>,
}

/// Highest accuracy wins; equal accuracy keeps the kind that comes first in
/// [`ModelKind::PRIORITY`].
pub fn select_best(scores: &[ModelScore]) -> Option<ModelKind> {
    let mut ordered: Vec<&ModelScore> = scores.iter().collect();
    ordered.sort_by_key(|s| s.kind.priority());

    ordered
        .into_iter()
        .fold(None, |best: Option<&ModelScore>, candidate| match best {
            Some(b) if candidate.metrics.accuracy <= b.metrics.accuracy => Some(b),
            _ => Some(candidate),
        })
        .map(|s| s.kind)
}

/// Everything the startup training run produces
#[derive(Debug, Clone)]
pub struct TrainedPipeline {
    /// Encoders, scaler and the selected model
    pub predictor: Predictor,
    /// One entry per candidate, in priority order
    pub scores: Vec<ModelScore>,
    /// Dataset with categorical columns and target as integer codes
    pub encoded_frame: DataFrame,
    pub split: SplitSummary,
    /// Fitted scaler means and stds, for reproducibility checks
    pub scaler: StandardScaler,
    pub trained_at: DateTime<Utc>,
}

impl TrainedPipeline {
    pub fn selected(&self) -> ModelKind {
        self.predictor.model_kind()
    }

    pub fn score(&self, kind: ModelKind) -> Option<&ModelScore> {
        self.scores.iter().find(|s| s.kind == kind)
    }
}

/// Main training engine
#[derive(Debug, Clone, Default)]
pub struct TrainEngine {
    config: TrainingConfig,
}

impl TrainEngine {
    /// Create a new training engine
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Run the full pipeline on a loaded dataset
    pub fn fit(&self, dataset: &StuntingDataset) -> Result<TrainedPipeline> {
        let start = Instant::now();

        let encoders = FeatureEncoders::fit(dataset.frame())?;
        let encoded_frame = encoders.encode_frame(dataset.frame())?;
        let (x, y) = feature_matrix(&encoded_frame)?;

        let split = train_test_split(&x, &y, self.config.test_size, self.config.random_seed)?;
        let summary = SplitSummary {
            n_train: split.y_train.len(),
            n_test: split.y_test.len(),
            train_positive_rate: class_balance(&split.y_train),
            test_positive_rate: class_balance(&split.y_test),
            test_indices: split.test_indices.clone(),
        };
        info!(
            n_train = summary.n_train,
            n_test = summary.n_test,
            train_positive_rate = summary.train_positive_rate,
            test_positive_rate = summary.test_positive_rate,
            "Split dataset"
        );

        let scaler = StandardScaler::fit(&split.x_train)?;
        let x_train = scaler.transform(&split.x_train)?;
        let x_test = scaler.transform(&split.x_test)?;

        let mut candidates = Vec::with_capacity(ModelKind::PRIORITY.len());
        for kind in ModelKind::PRIORITY {
            let fit_start = Instant::now();
            let model = self.train_model(kind, &x_train, &split.y_train)?;
            let training_time = fit_start.elapsed().as_secs_f64();

            let y_prob = model.predict_proba(&x_test)?;
            let y_pred = y_prob.mapv(|p| if p > 0.5 { 1.0 } else { 0.0 });
            let mut metrics =
                ModelMetrics::compute_classification(&split.y_test, &y_pred, Some(&y_prob));
            metrics.training_time_secs = training_time;

            info!(
                model = kind.name(),
                accuracy = metrics.accuracy,
                f1 = metrics.f1_score,
                training_time_secs = training_time,
                "Evaluated candidate"
            );
            candidates.push((model, ModelScore { kind, metrics }));
        }

        let scores: Vec<ModelScore> = candidates.iter().map(|(_, s)| s.clone()).collect();
        let best = select_best(&scores)
            .ok_or_else(|| StuntingError::TrainingError("No model was trained".to_string()))?;
        let model = candidates
            .into_iter()
            .map(|(m, _)| m)
            .find(|m| m.kind() == best)
            .ok_or_else(|| StuntingError::TrainingError("Selected model missing".to_string()))?;

        info!(
            model = best.name(),
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Selected model"
        );

        Ok(TrainedPipeline {
            predictor: Predictor::new(encoders, scaler.clone(), model),
            scores,
            encoded_frame,
            split: summary,
            scaler,
            trained_at: Utc::now(),
        })
    }

    fn train_model(
        &self,
        kind: ModelKind,
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> Result<TrainedModel> {
        debug!(model = kind.name(), rows = x.nrows(), "Fitting");
        let model = match kind {
            ModelKind::LogisticRegression => {
                let mut model = LogisticRegression::new()
                    .with_max_iter(self.config.logistic_max_iter)
                    .with_learning_rate(self.config.logistic_learning_rate)
                    .with_alpha(self.config.logistic_alpha);
                model.fit(x, y)?;
                TrainedModel::LogisticRegression(model)
            }
            ModelKind::RandomForest => {
                let mut model = RandomForest::new_classifier(self.config.n_estimators)
                    .with_random_state(self.config.random_seed);
                model.fit(x, y)?;
                TrainedModel::RandomForest(model)
            }
            ModelKind::GradientBoosting => {
                let config = GradientBoostingConfig {
                    n_estimators: self.config.n_estimators,
                    learning_rate: self.config.boosting_learning_rate,
                    max_depth: self.config.boosting_max_depth,
                    random_state: Some(self.config.random_seed),
                    ..Default::default()
                };
                let mut model = GradientBoostingClassifier::new(config);
                model.fit(x, y)?;
                TrainedModel::GradientBoosting(model)
            }
        };
        Ok(model)
    }
}
