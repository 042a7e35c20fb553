//! Single-row stunting prediction
//!
//! The predictor owns the fitted encoders, the fitted scaler and the selected
//! model. It is built once by the training run and then shared read-only.

use super::PredictionInput;
use crate::error::{Result, StuntingError};
use crate::preprocessing::{FeatureEncoders, StandardScaler};
use crate::training::{ModelKind, TrainedModel};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Probability above which a child is classified as stunted
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Result of one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StuntingPrediction {
    pub probability_stunting: f64,
    pub probability_not_stunting: f64,
    pub is_stunting: bool,
    pub model: ModelKind,
}

/// Counter snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceStats {
    /// Calls that reached the model
    pub total_predictions: u64,
    /// Calls stopped by validation or encoding
    pub rejected_inputs: u64,
}

#[derive(Debug, Default)]
struct Counters {
    predictions: AtomicU64,
    rejected: AtomicU64,
}

/// Encoders, scaler and the active model
#[derive(Debug, Clone)]
pub struct Predictor {
    encoders: FeatureEncoders,
    scaler: StandardScaler,
    model: TrainedModel,
    counters: Arc<Counters>,
}

impl Predictor {
    pub fn new(encoders: FeatureEncoders, scaler: StandardScaler, model: TrainedModel) -> Self {
        Self {
            encoders,
            scaler,
            model,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Validate, encode, scale and score one input
    pub fn predict(&self, input: &PredictionInput) -> Result<StuntingPrediction> {
        let row = match input.validate().and_then(|_| self.encode(input)) {
            Ok(row) => row,
            Err(e) => {
                self.counters.rejected.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        let scaled = self.scaler.transform_row(row.view())?;
        let x: Array2<f64> = scaled.insert_axis(Axis(0));
        let proba = self.model.predict_proba(&x)?;
        self.counters.predictions.fetch_add(1, Ordering::Relaxed);

        let p = probability(proba[0])?;
        debug!(model = self.model.kind().name(), probability = p, "Prediction");

        Ok(StuntingPrediction {
            probability_stunting: p,
            probability_not_stunting: 1.0 - p,
            is_stunting: p > DECISION_THRESHOLD,
            model: self.model.kind(),
        })
    }

    /// Raw feature vector in matrix column order
    pub fn encode(&self, input: &PredictionInput) -> Result<Array1<f64>> {
        Ok(Array1::from_vec(vec![
            self.encoders.encode_sex(&input.sex)?,
            input.age as f64,
            input.birth_weight,
            input.birth_length,
            input.body_weight,
            input.body_length,
            self.encoders.encode_breastfeeding(&input.breastfeeding)?,
        ]))
    }

    pub fn model_kind(&self) -> ModelKind {
        self.model.kind()
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    pub fn stats(&self) -> InferenceStats {
        InferenceStats {
            total_predictions: self.counters.predictions.load(Ordering::Relaxed),
            rejected_inputs: self.counters.rejected.load(Ordering::Relaxed),
        }
    }
}

/// Model output as a probability; NaN and infinities are rejected
fn probability(raw: f64) -> Result<f64> {
    if !raw.is_finite() {
        return Err(StuntingError::InferenceError(format!(
            "Model returned a non-finite probability ({})",
            raw
        )));
    }
    Ok(raw.clamp(0.0, 1.0))
}
