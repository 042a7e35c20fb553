//! Evaluation metrics and the common classifier interface

use crate::error::Result;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Metrics for a binary classifier on a held-out split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// Fraction of correct predictions
    pub accuracy: f64,
    /// Precision of the positive class
    pub precision: f64,
    /// Recall of the positive class
    pub recall: f64,
    /// F1 score of the positive class
    pub f1_score: f64,
    /// Mean log loss, when probabilities were supplied
    pub log_loss: Option<f64>,
    /// Confusion matrix counts
    pub confusion: ConfusionCounts,
    /// Training time in seconds
    pub training_time_secs: f64,
    /// Number of evaluated samples
    pub n_samples: usize,
}

/// Confusion matrix of a binary classifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionCounts {
    pub fn from_labels(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let mut counts = Self::default();
        for (t, p) in y_true.iter().zip(y_pred.iter()) {
            match (*t > 0.5, *p > 0.5) {
                (true, true) => counts.true_positive += 1,
                (false, true) => counts.false_positive += 1,
                (false, false) => counts.true_negative += 1,
                (true, false) => counts.false_negative += 1,
            }
        }
        counts
    }
}

impl ModelMetrics {
    /// Compute classification metrics
    pub fn compute_classification(
        y_true: &Array1<f64>,
        y_pred: &Array1<f64>,
        y_prob: Option<&Array1<f64>>,
    ) -> Self {
        let confusion = ConfusionCounts::from_labels(y_true, y_pred);
        let n_samples = y_true.len();

        let correct = confusion.true_positive + confusion.true_negative;
        let accuracy = if n_samples > 0 {
            correct as f64 / n_samples as f64
        } else {
            0.0
        };

        let tp = confusion.true_positive as f64;
        let predicted_pos = (confusion.true_positive + confusion.false_positive) as f64;
        let actual_pos = (confusion.true_positive + confusion.false_negative) as f64;

        let precision = if predicted_pos > 0.0 { tp / predicted_pos } else { 0.0 };
        let recall = if actual_pos > 0.0 { tp / actual_pos } else { 0.0 };
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        let log_loss = y_prob.filter(|_| n_samples > 0).map(|prob| {
            let eps = 1e-15;
            -y_true
                .iter()
                .zip(prob.iter())
                .map(|(t, p)| {
                    let p = p.clamp(eps, 1.0 - eps);
                    t * p.ln() + (1.0 - t) * (1.0 - p).ln()
                })
                .sum::<f64>()
                / n_samples as f64
        });

        Self {
            accuracy,
            precision,
            recall,
            f1_score,
            log_loss,
            confusion,
            training_time_secs: 0.0,
            n_samples,
        }
    }
}

/// Common interface of the fitted candidate classifiers
pub trait Classifier: Send + Sync {
    /// Probability of the positive class for every row
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Relative importance of each feature column, summing to one
    fn feature_importances(&self) -> Option<Array1<f64>>;
}

impl Classifier for super::LogisticRegression {
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        super::LogisticRegression::predict_proba(self, x)
    }

    fn feature_importances(&self) -> Option<Array1<f64>> {
        super::LogisticRegression::feature_importances(self)
    }
}

impl Classifier for super::RandomForest {
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        super::RandomForest::predict_proba(self, x)
    }

    fn feature_importances(&self) -> Option<Array1<f64>> {
        super::RandomForest::feature_importances(self).cloned()
    }
}

impl Classifier for super::GradientBoostingClassifier {
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        super::GradientBoostingClassifier::predict_proba(self, x)
    }

    fn feature_importances(&self) -> Option<Array1<f64>> {
        let importances = super::GradientBoostingClassifier::feature_importances(self);
        (!importances.is_empty()).then(|| Array1::from_vec(importances.to_vec()))
    }
}
