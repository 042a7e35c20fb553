//! Visualization module: SVG charts for the Tentang Data view.
//!
//! Charts are rendered to in-memory SVG strings with plotters and embedded
//! directly in the page.

pub mod histogram;
pub mod pairplot;

pub use histogram::{histogram_bins, render_histogram, HistogramBin};
pub use pairplot::render_pairplot;

use crate::dataset::schema::FEATURE_COLUMNS;
use crate::error::{Result, StuntingError};
use plotters::style::RGBColor;
use polars::prelude::*;

/// Bar and curve colour
pub const CADET_BLUE: RGBColor = RGBColor(95, 158, 160);

type DrawResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn plot_error(err: Box<dyn std::error::Error>) -> StuntingError {
    StuntingError::PlotError(err.to_string())
}

/// Resolve a user-supplied feature name against the feature columns
pub fn resolve_feature(name: &str) -> Result<&'static str> {
    FEATURE_COLUMNS
        .iter()
        .find(|col| **col == name.trim())
        .copied()
        .ok_or_else(|| StuntingError::FeatureNotFound(name.to_string()))
}

/// Non-null values of a numeric column
pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| StuntingError::FeatureNotFound(name.to_string()))?;
    let floats = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(floats.f64()?.into_iter().flatten().collect())
}

/// Linear-interpolated quantile of sorted data
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Automatic bin count: the larger of the Sturges and Freedman-Diaconis
/// estimates (the smaller bin width wins). Constant data gets one bin.
pub fn auto_bin_count(values: &[f64]) -> usize {
    let n = values.len();
    if n < 2 {
        return 1;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let range = sorted[n - 1] - sorted[0];
    if range <= 0.0 {
        return 1;
    }

    let sturges_width = range / ((n as f64).log2() + 1.0);
    let iqr = quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25);
    let fd_width = 2.0 * iqr / (n as f64).cbrt();

    let width = if fd_width > 0.0 {
        sturges_width.min(fd_width)
    } else {
        sturges_width
    };
    ((range / width).ceil() as usize).max(1)
}

/// Gaussian kernel density estimate with Scott's bandwidth, evaluated on
/// `points` evenly spaced positions extending three bandwidths past the
/// data. `None` when the data has no spread.
pub fn gaussian_kde(values: &[f64], points: usize) -> Option<Vec<(f64, f64)>> {
    let n = values.len();
    if n < 2 || points < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let bandwidth = var.sqrt() * (n as f64).powf(-0.2);
    if !(bandwidth > 0.0) {
        return None;
    }

    let (min, max) = min_max(values);
    let lo = min - 3.0 * bandwidth;
    let hi = max + 3.0 * bandwidth;
    let step = (hi - lo) / (points - 1) as f64;
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    Some(
        (0..points)
            .map(|i| {
                let x = lo + step * i as f64;
                let density = values
                    .iter()
                    .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                    .sum::<f64>()
                    * norm;
                (x, density)
            })
            .collect(),
    )
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Axis range around the data; zero-width ranges are widened by 0.5 each side
fn padded_range(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 1.0);
    }
    let (lo, hi) = min_max(values);
    if hi - lo <= f64::EPSILON * lo.abs().max(1.0) {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}
