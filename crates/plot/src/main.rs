use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use jcg_plot::{load_series, render};

/// jcg-plot - render a comparative analysis-latency CDF chart
///
/// Each input file holds one latency observation per line, in milliseconds,
/// and all four must hold exactly OBSERVATIONS lines. The chart is written
/// to OUTPUT as SVG.
#[derive(Parser)]
#[command(name = "jcg-plot")]
#[command(version, about)]
struct Cli {
  /// Output image path.
  output: PathBuf,

  /// Number of observations in each input file.
  observations: usize,

  /// Batch analysis latencies.
  batch: PathBuf,

  /// Incremental analysis latencies.
  incremental: PathBuf,

  /// Demand-driven analysis latencies.
  demand_driven: PathBuf,

  /// Combined demand-driven and incremental latencies.
  demand_driven_incremental: PathBuf,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let series = [
    load_series(&cli.batch, cli.observations)?,
    load_series(&cli.incremental, cli.observations)?,
    load_series(&cli.demand_driven, cli.observations)?,
    load_series(&cli.demand_driven_incremental, cli.observations)?,
  ];

  render(&cli.output, &series)
    .with_context(|| format!("failed to write {}", cli.output.display()))?;

  Ok(())
}
