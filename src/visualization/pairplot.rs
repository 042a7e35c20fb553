//! Pairwise relationship grid over selected features
//!
//! Off-diagonal cells scatter one feature against another; diagonal cells
//! show the kernel density of the feature.

use super::{column_values, gaussian_kde, padded_range, plot_error, resolve_feature, DrawResult, CADET_BLUE};
use crate::error::{Result, StuntingError};
use plotters::prelude::*;
use polars::prelude::*;

const CELL: u32 = 220;
const KDE_POINTS: usize = 200;

/// Render the grid for `features`, in the given order.
///
/// No features selected means no plot: the result is `None`, not an error.
pub fn render_pairplot(frame: &DataFrame, features: &[String]) -> Result<Option<String>> {
    if features.is_empty() {
        return Ok(None);
    }

    let mut names = Vec::with_capacity(features.len());
    for feature in features {
        let name = resolve_feature(feature)?;
        if !names.contains(&name) {
            names.push(name);
        }
    }

    let columns = complete_rows(frame, &names)?;
    if columns.iter().any(|c| c.is_empty()) {
        return Err(StuntingError::PlotError(
            "No complete rows for the selected features".to_string(),
        ));
    }

    let mut svg = String::new();
    draw_grid(&mut svg, &names, &columns).map_err(plot_error)?;
    Ok(Some(svg))
}

/// Values of each column restricted to rows where every selected column is
/// present
fn complete_rows(frame: &DataFrame, names: &[&str]) -> Result<Vec<Vec<f64>>> {
    let selected = frame.select(names.iter().copied())?;
    let complete = selected.drop_nulls::<String>(None)?;
    names
        .iter()
        .map(|name| column_values(&complete, name))
        .collect()
}

fn draw_grid(svg: &mut String, names: &[&str], columns: &[Vec<f64>]) -> DrawResult<()> {
    let k = names.len();
    let side = CELL * k as u32;
    let root = SVGBackend::with_string(svg, (side, side)).into_drawing_area();
    root.fill(&WHITE)?;

    let ranges: Vec<(f64, f64)> = columns.iter().map(|c| padded_range(c)).collect();
    let cells = root.split_evenly((k, k));

    for (idx, cell) in cells.iter().enumerate() {
        let (row, col) = (idx / k, idx % k);

        let mut builder = ChartBuilder::on(cell);
        builder
            .margin(6)
            .x_label_area_size(if row + 1 == k { 36 } else { 16 })
            .y_label_area_size(if col == 0 { 48 } else { 28 });

        let (x_lo, x_hi) = ranges[col];

        if row == col {
            let curve = gaussian_kde(&columns[col], KDE_POINTS);
            let (x_lo, x_hi) = match &curve {
                Some(points) => (points[0].0, points[points.len() - 1].0),
                None => (x_lo, x_hi),
            };
            let y_hi = curve
                .as_ref()
                .and_then(|points| points.iter().map(|p| p.1).reduce(f64::max))
                .unwrap_or(1.0)
                * 1.1;

            let mut chart = builder.build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)?;
            let mut mesh = chart.configure_mesh();
            mesh.disable_mesh()
                .x_labels(4)
                .y_labels(4)
                .label_style(("sans-serif", 10).into_font());
            if row + 1 == k {
                mesh.x_desc(names[col]);
            }
            if col == 0 {
                mesh.y_desc(names[row]);
            }
            mesh.draw()?;

            if let Some(points) = curve {
                chart.draw_series(LineSeries::new(points, CADET_BLUE.stroke_width(2)))?;
            }
        } else {
            let (y_lo, y_hi) = ranges[row];
            let mut chart = builder.build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
            let mut mesh = chart.configure_mesh();
            mesh.disable_mesh()
                .x_labels(4)
                .y_labels(4)
                .label_style(("sans-serif", 10).into_font());
            if row + 1 == k {
                mesh.x_desc(names[col]);
            }
            if col == 0 {
                mesh.y_desc(names[row]);
            }
            mesh.draw()?;

            let style = CADET_BLUE.mix(0.6).filled();
            chart.draw_series(
                columns[col]
                    .iter()
                    .zip(columns[row].iter())
                    .map(|(&x, &y)| Circle::new((x, y), 2, style)),
            )?;
        }
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("Age".into(), &[12i64, 24, 36, 48, 60]).into(),
            Series::new("Body Weight".into(), &[Some(8.0), Some(10.5), None, Some(14.0), Some(16.5)])
                .into(),
            Series::new("Sex".into(), &[0i64, 1, 1, 0, 1]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_no_features_no_plot() {
        assert_eq!(render_pairplot(&frame(), &[]).unwrap(), None);
    }

    #[test]
    fn test_renders_grid() {
        let features = vec!["Age".to_string(), "Body Weight".to_string()];
        let svg = render_pairplot(&frame(), &features).unwrap().unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Body Weight"));
    }

    #[test]
    fn test_constant_feature_still_renders() {
        let df = DataFrame::new(vec![Series::new("Sex".into(), &[1i64, 1, 1]).into()]).unwrap();
        let svg = render_pairplot(&df, &["Sex".to_string()]).unwrap();
        assert!(svg.is_some());
    }

    #[test]
    fn test_unknown_feature() {
        let err = render_pairplot(&frame(), &["Stunting".to_string()]).unwrap_err();
        assert!(matches!(err, StuntingError::FeatureNotFound(_)));
    }

    #[test]
    fn test_complete_rows_drop_nulls() {
        let columns = complete_rows(&frame(), &["Age", "Body Weight"]).unwrap();
        assert_eq!(columns[0], vec![12.0, 24.0, 48.0, 60.0]);
        assert_eq!(columns[1].len(), 4);
    }
}
