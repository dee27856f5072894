use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use jcg_lib::exec::EchoMode;
use jcg_lib::pipeline::{self, OnFailure, PipelineOptions};
use jcg_lib::source::SourceSet;
use jcg_lib::toolchain::Toolchain;

mod output;

/// jcg - build a static call graph for a set of Java sources
///
/// Compiles the sources, packages the compiled classes into a flat jar next
/// to the entry point, then builds and runs the WALA-callgraph toolchain,
/// which writes its report next to the jar. Set RUST_LOG=debug to see every
/// command line and the tools' own output.
#[derive(Parser)]
#[command(name = "jcg")]
#[command(version, about)]
struct Cli {
  /// Java source files; the first one is the entry point.
  #[arg(required = true)]
  sources: Vec<PathBuf>,

  /// Run the remaining steps even when an earlier one fails.
  #[arg(long)]
  keep_going: bool,

  /// Directory containing the analyzer toolchain checkout.
  #[arg(long)]
  analyzer_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
  // Initialize logging; default to info so step progress is visible.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .without_time()
    .init();

  let cli = Cli::parse();

  // Debug logging also routes the tools' own output to the terminal.
  let echo =
    if tracing::enabled!(Level::DEBUG) { EchoMode::Inherit } else { EchoMode::Discard };

  let sources = SourceSet::new(cli.sources)?;

  let mut toolchain = Toolchain::from_env();
  if let Some(dir) = cli.analyzer_dir {
    toolchain.analyzer_dir = dir;
  }

  let options = PipelineOptions {
    echo,
    on_failure: if cli.keep_going { OnFailure::Continue } else { OnFailure::Halt },
    toolchain,
  };

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let started = Instant::now();
  let outcome = rt.block_on(pipeline::build_callgraph(&sources, &options))?;

  // Print summary
  println!();
  if outcome.is_success() {
    output::print_success("Callgraph complete!");
  } else {
    for failure in &outcome.failures {
      output::print_warning(&format!("{} step failed: {}", failure.stage, failure.status));
    }
    output::print_warning("Finished with failures; artifacts may be incomplete");
  }
  output::print_stat("Classes", &outcome.artifacts.classes.len().to_string());
  output::print_stat("Archive", &outcome.artifacts.archive.display().to_string());
  output::print_stat("Report", &outcome.artifacts.report.display().to_string());
  output::print_stat("Elapsed", &output::format_duration(started.elapsed()));

  Ok(())
}
