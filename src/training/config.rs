//! Training configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three candidate classifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    LogisticRegression,
    RandomForest,
    GradientBoosting,
}

impl ModelKind {
    /// Selection order; on equal accuracy the earlier kind is kept
    pub const PRIORITY: [ModelKind; 3] = [
        ModelKind::LogisticRegression,
        ModelKind::RandomForest,
        ModelKind::GradientBoosting,
    ];

    /// Machine-readable name
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::LogisticRegression => "logistic_regression",
            ModelKind::RandomForest => "random_forest",
            ModelKind::GradientBoosting => "gradient_boosting",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::LogisticRegression => "Logistic Regression",
            ModelKind::RandomForest => "Random Forest",
            ModelKind::GradientBoosting => "Gradient Boosting",
        }
    }

    /// Position in [`ModelKind::PRIORITY`]
    pub fn priority(&self) -> usize {
        match self {
            ModelKind::LogisticRegression => 0,
            ModelKind::RandomForest => 1,
            ModelKind::GradientBoosting => 2,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Split and hyperparameter settings for the startup training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Fraction of rows held out for evaluation
    pub test_size: f64,
    /// Seed for the split and the randomized models
    pub random_seed: u64,
    /// Trees in the forest and rounds of boosting
    pub n_estimators: usize,
    /// Gradient descent iterations for logistic regression
    pub logistic_max_iter: usize,
    /// Gradient descent step for logistic regression
    pub logistic_learning_rate: f64,
    /// L2 penalty for logistic regression
    pub logistic_alpha: f64,
    /// Shrinkage for gradient boosting
    pub boosting_learning_rate: f64,
    /// Tree depth for gradient boosting
    pub boosting_max_depth: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_seed: 42,
            n_estimators: 100,
            logistic_max_iter: 1000,
            logistic_learning_rate: 0.1,
            logistic_alpha: 0.01,
            boosting_learning_rate: 0.1,
            boosting_max_depth: 3,
        }
    }
}

impl TrainingConfig {
    /// Builder method to set the random seed
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }
}
