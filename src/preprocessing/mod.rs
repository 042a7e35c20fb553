//! Data preprocessing module
//!
//! Label encoding of the categorical columns, feature-matrix construction
//! and standard scaling.

mod encoder;
mod scaler;

pub use encoder::{feature_matrix, parse_binary_label, FeatureEncoders, LabelEncoder};
pub use scaler::StandardScaler;
