//! Model training module
//!
//! Provides the three candidate classifiers and the startup training run:
//! - Logistic regression (gradient descent)
//! - Random forest of Gini trees
//! - Gradient boosting on the log-loss
//! - Seeded train/test split and model selection by held-out accuracy

mod config;
mod engine;
mod models;
pub mod decision_tree;
pub mod gradient_boosting;
pub mod linear_models;
pub mod random_forest;
pub mod split;

pub use config::{ModelKind, TrainingConfig};
pub use decision_tree::{Criterion, DecisionTree, TreeNode};
pub use engine::{select_best, ModelScore, SplitSummary, TrainEngine, TrainedModel, TrainedPipeline};
pub use gradient_boosting::{GradientBoostingClassifier, GradientBoostingConfig};
pub use linear_models::LogisticRegression;
pub use models::{Classifier, ConfusionCounts, ModelMetrics};
pub use random_forest::RandomForest;
pub use split::{class_balance, train_test_split, TrainTestSplit};
