//! jcg-plot: comparative latency distribution charts.
//!
//! Renders the empirical CDFs of four analysis-latency series on one fixed
//! set of axes. Each input file holds one observation per line in
//! milliseconds; series are sorted ascending, converted to seconds, and
//! plotted against uniform fractional ranks, so curves further left and
//! higher are faster.

use std::io;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use thiserror::Error;

/// Line colors for the four series, in argument order: batch, incremental,
/// demand-driven, demand-driven + incremental.
pub const SERIES_COLORS: [RGBColor; 4] = [
  RGBColor(0x1f, 0x77, 0xb4),
  RGBColor(0xff, 0x7f, 0x0e),
  RGBColor(0x2c, 0xa0, 0x2c),
  RGBColor(0xd6, 0x27, 0x28),
];

/// Chart dimensions in pixels.
const CHART_SIZE: (u32, u32) = (800, 600);

#[derive(Debug, Error)]
pub enum PlotError {
  /// An input file could not be read.
  #[error("failed to read {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// A line of an input file is not a number.
  #[error("{} line {line}: not a number: {text:?}", .path.display())]
  Parse { path: PathBuf, line: usize, text: String },

  /// A series does not hold the declared number of observations.
  #[error("{}: expected {expected} observations, found {actual}", .path.display())]
  ObservationCount { path: PathBuf, expected: usize, actual: usize },

  /// The chart backend failed while drawing or writing the output.
  #[error("failed to render chart: {message}")]
  Render { message: String },
}

/// Load one latency series: one observation per line in milliseconds,
/// returned in seconds, sorted ascending.
///
/// The series must hold exactly `observations` values; a mismatch means
/// the inputs are not comparable and is an error, not a truncation.
pub fn load_series(path: &Path, observations: usize) -> Result<Vec<f64>, PlotError> {
  let content = std::fs::read_to_string(path)
    .map_err(|source| PlotError::Read { path: path.to_path_buf(), source })?;

  let mut series = Vec::new();
  for (index, line) in content.lines().enumerate() {
    let value: f64 = line.trim().parse().map_err(|_| PlotError::Parse {
      path: path.to_path_buf(),
      line: index + 1,
      text: line.to_string(),
    })?;
    series.push(value / 1000.0);
  }

  if series.len() != observations {
    return Err(PlotError::ObservationCount {
      path: path.to_path_buf(),
      expected: observations,
      actual: series.len(),
    });
  }

  series.sort_by(f64::total_cmp);
  Ok(series)
}

/// Uniform fractional ranks `i/n` for `i` in `0..n`: the y values of an
/// empirical CDF with n observations.
pub fn fractional_ranks(observations: usize) -> Vec<f64> {
  (0..observations).map(|i| i as f64 / observations as f64).collect()
}

/// Render the four series as CDF curves and write the chart as SVG.
///
/// Axes are fixed at `[0, 1]` seconds by `[0.5, 1]` rank so charts from
/// different runs are directly comparable. Only the endpoints of the
/// latency axis carry tick labels.
pub fn render(output: &Path, series: &[Vec<f64>; 4]) -> Result<(), PlotError> {
  let ranks = fractional_ranks(series[0].len());

  let root = SVGBackend::new(output, CHART_SIZE).into_drawing_area();
  root.fill(&WHITE).map_err(render_error)?;

  let mut chart = ChartBuilder::on(&root)
    .margin(10)
    .x_label_area_size(44)
    .y_label_area_size(48)
    .build_cartesian_2d(0f64..1f64, 0.5f64..1f64)
    .map_err(render_error)?;

  chart
    .configure_mesh()
    .disable_x_mesh()
    .disable_y_mesh()
    .x_desc("Analysis Latency (sec)")
    .x_labels(5)
    .x_label_formatter(&|x| endpoint_label(*x))
    .y_labels(6)
    .y_label_formatter(&|y| format!("{y:.1}"))
    .draw()
    .map_err(render_error)?;

  for (values, color) in series.iter().zip(SERIES_COLORS) {
    chart
      .draw_series(LineSeries::new(
        values.iter().copied().zip(ranks.iter().copied()),
        &color,
      ))
      .map_err(render_error)?;
  }

  root.present().map_err(render_error)?;
  Ok(())
}

/// Tick label for the latency axis: only the endpoints are labeled.
fn endpoint_label(x: f64) -> String {
  if x.abs() < 1e-9 {
    "0".to_string()
  } else if (x - 1.0).abs() < 1e-9 {
    "1".to_string()
  } else {
    String::new()
  }
}

fn render_error(err: impl std::fmt::Display) -> PlotError {
  PlotError::Render { message: err.to_string() }
}
