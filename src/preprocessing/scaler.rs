//! Standard scaling of the feature matrix

use crate::error::{Result, StuntingError};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Per-feature standard scaler: `(x - mean) / std`.
///
/// Fitting constructs the scaler; there is no way to refit an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Array1<f64>,
    stds: Array1<f64>,
}

impl StandardScaler {
    /// Fit on the training rows. Population standard deviation; constant
    /// columns get a scale of 1.
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(StuntingError::PreprocessingError(
                "Cannot fit scaler on an empty matrix".to_string(),
            ));
        }

        let means = x
            .mean_axis(Axis(0))
            .ok_or_else(|| StuntingError::PreprocessingError("Empty matrix".to_string()))?;
        let stds = x
            .std_axis(Axis(0), 0.0)
            .iter()
            .zip(means.iter())
            .map(|(&std, &mean)| {
                let tol = 10.0 * f64::EPSILON * mean.abs().max(1.0);
                if std.is_finite() && std > tol {
                    std
                } else {
                    1.0
                }
            })
            .collect::<Array1<f64>>();

        Ok(Self { means, stds })
    }

    /// Scale every row of `x`
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(x.ncols())?;
        Ok((x - &self.means) / &self.stds)
    }

    /// Scale a single row
    pub fn transform_row(&self, row: ArrayView1<f64>) -> Result<Array1<f64>> {
        self.check_width(row.len())?;
        Ok((&row - &self.means) / &self.stds)
    }

    pub fn means(&self) -> &Array1<f64> {
        &self.means
    }

    pub fn stds(&self) -> &Array1<f64> {
        &self.stds
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    fn check_width(&self, n: usize) -> Result<()> {
        if n != self.means.len() {
            return Err(StuntingError::ShapeError {
                expected: format!("{} features", self.means.len()),
                actual: format!("{} features", n),
            });
        }
        Ok(())
    }
}
