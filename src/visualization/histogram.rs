//! Histogram of one feature

use super::{auto_bin_count, plot_error, DrawResult, CADET_BLUE};
use crate::error::{Result, StuntingError};
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 500;
/// Bar width relative to the bin width
const RWIDTH: f64 = 0.85;

/// One histogram bin over `[start, end)`; the last bin includes `end`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Bin `values` into equal-width bins with the automatic bin count
pub fn histogram_bins(values: &[f64]) -> Vec<HistogramBin> {
    if values.is_empty() {
        return Vec::new();
    }
    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if hi <= lo {
        lo -= 0.5;
        hi += 0.5;
    }

    let n_bins = auto_bin_count(values);
    let width = (hi - lo) / n_bins as f64;
    let mut counts = vec![0usize; n_bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(n_bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == n_bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

/// Render the histogram of `feature` as an SVG document
pub fn render_histogram(feature: &str, values: &[f64]) -> Result<String> {
    if values.is_empty() {
        return Err(StuntingError::PlotError(format!(
            "Column '{}' has no values to plot",
            feature
        )));
    }

    let bins = histogram_bins(values);
    let mut svg = String::new();
    draw_histogram(&mut svg, feature, &bins).map_err(plot_error)?;
    Ok(svg)
}

fn draw_histogram(svg: &mut String, feature: &str, bins: &[HistogramBin]) -> DrawResult<()> {
    let root = SVGBackend::with_string(svg, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_lo = bins.first().map_or(0.0, |b| b.start);
    let x_hi = bins.last().map_or(1.0, |b| b.end);
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Histogram of {}", feature), ("sans-serif", 22).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x_lo..x_hi, 0f64..max_count * 1.05)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Value")
        .y_desc("Frequency")
        .draw()?;

    let style = CADET_BLUE.mix(0.7).filled();
    chart.draw_series(bins.iter().map(|bin| {
        let pad = (bin.end - bin.start) * (1.0 - RWIDTH) / 2.0;
        Rectangle::new(
            [(bin.start + pad, 0.0), (bin.end - pad, bin.count as f64)],
            style,
        )
    }))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bins_cover_every_value() {
        let values: Vec<f64> = (1..=8).map(|v| v as f64).collect();
        let bins = histogram_bins(&values);

        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 8);
        assert_eq!(bins[0].start, 1.0);
        assert_eq!(bins[3].end, 8.0);
        assert_eq!(bins[3].count, 2);
    }

    #[test]
    fn test_constant_values_single_bin() {
        let bins = histogram_bins(&[5.0, 5.0, 5.0]);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
        assert_eq!((bins[0].start, bins[0].end), (4.5, 5.5));
    }

    #[test]
    fn test_render_histogram_svg() {
        let svg = render_histogram("Body Weight", &[8.0, 9.5, 10.0, 12.5, 13.0]).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Histogram of Body Weight"));
        assert!(svg.contains("Frequency"));
        assert!(svg.contains("Value"));
    }

    #[test]
    fn test_render_empty_is_error() {
        assert!(render_histogram("Age", &[]).is_err());
    }
}
