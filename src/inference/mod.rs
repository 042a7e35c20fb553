//! Inference module
//!
//! Validates a single prediction input, encodes it with the fitted encoders,
//! scales it with the fitted scaler and returns the active model's
//! probability of stunting.

mod engine;
mod input;

pub use engine::{InferenceStats, Predictor, StuntingPrediction, DECISION_THRESHOLD};
pub use input::{PredictionInput, MAX_AGE, MAX_MEASUREMENT};
