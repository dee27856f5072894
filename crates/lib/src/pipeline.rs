//! The build-and-analyze pipeline.
//!
//! Four steps in a fixed order: compile, package, analyzer build, analyze.
//! No branching, no retry, no cleanup on failure; partially produced
//! artifacts stay wherever the tools left them. Artifact paths are settled
//! up front by [`plan_artifacts`], so no step depends on where the process
//! happens to be running.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;
use tracing::{info, warn};

use crate::analyzer;
use crate::archive::{self, ArchiveError};
use crate::compile;
use crate::exec::{EchoMode, RunError, Runner};
use crate::paths;
use crate::source::SourceSet;
use crate::toolchain::Toolchain;

/// The pipeline's steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  Compile,
  Package,
  AnalyzerBuild,
  Analyze,
}

impl std::fmt::Display for Stage {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      Stage::Compile => "compile",
      Stage::Package => "package",
      Stage::AnalyzerBuild => "analyzer build",
      Stage::Analyze => "analyze",
    };
    f.write_str(name)
  }
}

/// What a nonzero exit status from a step means for the rest of the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnFailure {
  /// Stop at the first failing step.
  #[default]
  Halt,
  /// Record the failure and run the remaining steps anyway; whatever an
  /// earlier failure broke surfaces as a later step's own failure.
  Continue,
}

/// Options for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
  /// Whether subprocess output reaches the terminal.
  pub echo: EchoMode,
  /// Policy applied to each step's exit status.
  pub on_failure: OnFailure,
  /// External tool locations.
  pub toolchain: Toolchain,
}

/// A step that exited nonzero under [`OnFailure::Continue`].
#[derive(Debug, Clone, Copy)]
pub struct StepFailure {
  pub stage: Stage,
  pub status: ExitStatus,
}

/// Artifact paths fixed before anything runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPlan {
  /// One compiled unit per source, in source order.
  pub classes: Vec<PathBuf>,
  /// The archive holding every compiled unit, named after the entry point.
  pub archive: PathBuf,
  /// Where the analyzer is asked to write its report.
  pub report: PathBuf,
}

/// Derive every artifact path from the source set.
///
/// Each source maps to a sibling `.class` unit; the archive and the report
/// sit next to the entry point's unit as `.jar` and `.callgraph`. Pure:
/// the same sources always name the same artifacts.
pub fn plan_artifacts(sources: &SourceSet) -> ArtifactPlan {
  let classes: Vec<PathBuf> =
    sources.iter().map(|source| paths::with_extension(source, "class")).collect();
  let archive = paths::with_extension(&classes[0], "jar");
  let report = paths::with_extension(&classes[0], "callgraph");
  ArtifactPlan { classes, archive, report }
}

/// Errors that stop a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
  /// The working directory could not be read while resolving sources.
  #[error("failed to resolve source paths: {0}")]
  Resolve(#[from] io::Error),

  /// A compiled unit could not be mapped to an archive entry.
  #[error(transparent)]
  Archive(#[from] ArchiveError),

  /// A tool could not be launched at all.
  #[error(transparent)]
  Run(#[from] RunError),

  /// A step exited nonzero under [`OnFailure::Halt`].
  #[error("{stage} step failed: {status}")]
  Step { stage: Stage, status: ExitStatus },
}

/// What a completed run produced.
#[derive(Debug)]
pub struct PipelineOutcome {
  /// The executed plan, with every path absolute.
  pub artifacts: ArtifactPlan,
  /// Steps that exited nonzero under [`OnFailure::Continue`]. Always empty
  /// under [`OnFailure::Halt`], where the first failure is an error.
  pub failures: Vec<StepFailure>,
}

impl PipelineOutcome {
  pub fn is_success(&self) -> bool {
    self.failures.is_empty()
  }
}

/// Run the whole pipeline over a source set.
///
/// Strictly sequential: each step starts only after the previous subprocess
/// has terminated. Sources are resolved to absolute paths first, so the
/// analyzer steps can run from their own working directory.
pub async fn build_callgraph(
  sources: &SourceSet,
  options: &PipelineOptions,
) -> Result<PipelineOutcome, PipelineError> {
  let sources = sources.absolutized()?;
  let artifacts = plan_artifacts(&sources);
  let runner = Runner::new(options.echo);
  let mut failures = Vec::new();

  info!(count = sources.len(), entry = %sources.entry_point().display(), "compiling sources");
  let status = runner.run(&compile::invocation(&options.toolchain, &sources)).await?;
  note_step(Stage::Compile, status, options.on_failure, &mut failures)?;

  let entries = archive::entries_for(&artifacts.classes)?;
  info!(archive = %artifacts.archive.display(), units = entries.len(), "packaging compiled units");
  let status =
    runner.run(&archive::invocation(&options.toolchain, &artifacts.archive, &entries)).await?;
  note_step(Stage::Package, status, options.on_failure, &mut failures)?;

  info!(dir = %options.toolchain.analyzer_dir.display(), "building analyzer toolchain");
  let status = runner.run(&analyzer::build_invocation(&options.toolchain.analyzer_dir)).await?;
  note_step(Stage::AnalyzerBuild, status, options.on_failure, &mut failures)?;

  info!(
    archive = %artifacts.archive.display(),
    report = %artifacts.report.display(),
    "building callgraph"
  );
  let status = runner
    .run(&analyzer::run_invocation(
      &options.toolchain.analyzer_dir,
      &artifacts.report,
      &artifacts.archive,
    ))
    .await?;
  note_step(Stage::Analyze, status, options.on_failure, &mut failures)?;

  Ok(PipelineOutcome { artifacts, failures })
}

/// Apply the failure policy to one step's exit status.
fn note_step(
  stage: Stage,
  status: ExitStatus,
  policy: OnFailure,
  failures: &mut Vec<StepFailure>,
) -> Result<(), PipelineError> {
  if status.success() {
    return Ok(());
  }
  match policy {
    OnFailure::Halt => Err(PipelineError::Step { stage, status }),
    OnFailure::Continue => {
      warn!(stage = %stage, status = %status, "step failed, continuing");
      failures.push(StepFailure { stage, status });
      Ok(())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn single_source_plan_derives_sibling_artifacts() {
    let sources = SourceSet::new(vec![PathBuf::from("app/Main.java")]).unwrap();
    let plan = plan_artifacts(&sources);
    assert_eq!(plan.classes, vec![PathBuf::from("app/Main.class")]);
    assert_eq!(plan.archive, PathBuf::from("app/Main.jar"));
    assert_eq!(plan.report, PathBuf::from("app/Main.callgraph"));
  }

  #[test]
  fn archive_and_report_are_named_after_the_entry_point() {
    let sources =
      SourceSet::new(vec![PathBuf::from("src/A.java"), PathBuf::from("lib/B.java")]).unwrap();
    let plan = plan_artifacts(&sources);
    assert_eq!(plan.classes, vec![PathBuf::from("src/A.class"), PathBuf::from("lib/B.class")]);
    assert_eq!(plan.archive, PathBuf::from("src/A.jar"));
    assert_eq!(plan.report, PathBuf::from("src/A.callgraph"));
  }

  #[test]
  fn planning_is_deterministic() {
    let sources =
      SourceSet::new(vec![PathBuf::from("src/A.java"), PathBuf::from("lib/B.java")]).unwrap();
    assert_eq!(plan_artifacts(&sources), plan_artifacts(&sources));
  }

  #[test]
  fn stage_names_read_naturally() {
    assert_eq!(Stage::Compile.to_string(), "compile");
    assert_eq!(Stage::AnalyzerBuild.to_string(), "analyzer build");
  }

  #[cfg(unix)]
  mod pipeline_runs {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;

    fn write_script(path: &Path, body: &str) {
      fs::write(path, body).unwrap();
      fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    struct FakeTools {
      temp: TempDir,
      toolchain: Toolchain,
    }

    /// A toolchain of shell stubs: the compiler drops a `.class` next to
    /// each source (then exits as told), the packager creates its archive
    /// argument, the analyzer's run step creates its report argument.
    fn fake_tools(compiler_exit: i32) -> FakeTools {
      let temp = TempDir::new().unwrap();
      let bin = temp.path().join("bin");
      fs::create_dir_all(&bin).unwrap();

      let javac = bin.join("javac");
      write_script(
        &javac,
        &format!(
          "#!/bin/sh\nfor src in \"$@\"; do : > \"${{src%.java}}.class\"; done\nexit {compiler_exit}\n"
        ),
      );

      let jar = bin.join("jar");
      write_script(&jar, "#!/bin/sh\n[ \"$1\" = cf ] || exit 2\n: > \"$2\"\n");

      let analyzer_dir = temp.path().join("analyzer");
      fs::create_dir_all(&analyzer_dir).unwrap();
      write_script(&analyzer_dir.join("gradlew"), "#!/bin/sh\nexit 0\n");
      write_script(&analyzer_dir.join("run.py"), "#!/bin/sh\n: > \"$1\"\n");

      let toolchain = Toolchain { javac, jar, analyzer_dir };
      FakeTools { temp, toolchain }
    }

    fn java_source(temp: &TempDir, rel: &str) -> PathBuf {
      let path = temp.path().join(rel);
      fs::create_dir_all(path.parent().unwrap()).unwrap();
      fs::write(&path, "class Placeholder {}\n").unwrap();
      path
    }

    #[tokio::test]
    async fn full_run_produces_every_artifact() {
      let tools = fake_tools(0);
      let main = java_source(&tools.temp, "app/Main.java");
      let helper = java_source(&tools.temp, "app/util/Helper.java");
      let sources = SourceSet::new(vec![main.clone(), helper.clone()]).unwrap();
      let options =
        PipelineOptions { toolchain: tools.toolchain.clone(), ..Default::default() };

      let outcome = build_callgraph(&sources, &options).await.unwrap();

      assert!(outcome.is_success());
      assert!(main.with_extension("class").exists());
      assert!(helper.with_extension("class").exists());
      assert_eq!(outcome.artifacts.archive, tools.temp.path().join("app/Main.jar"));
      assert!(outcome.artifacts.archive.exists());
      assert_eq!(outcome.artifacts.report, tools.temp.path().join("app/Main.callgraph"));
      assert!(outcome.artifacts.report.exists());
    }

    #[tokio::test]
    async fn compiler_failure_halts_by_default() {
      let tools = fake_tools(1);
      let main = java_source(&tools.temp, "app/Main.java");
      let sources = SourceSet::new(vec![main]).unwrap();
      let options =
        PipelineOptions { toolchain: tools.toolchain.clone(), ..Default::default() };

      let result = build_callgraph(&sources, &options).await;

      match result {
        Err(PipelineError::Step { stage: Stage::Compile, status }) => {
          assert_eq!(status.code(), Some(1));
        }
        other => panic!("expected a compile step failure, got {other:?}"),
      }
      assert!(!tools.temp.path().join("app/Main.jar").exists());
      assert!(!tools.temp.path().join("app/Main.callgraph").exists());
    }

    #[tokio::test]
    async fn keep_going_records_the_failure_and_runs_every_step() {
      let tools = fake_tools(1);
      let main = java_source(&tools.temp, "app/Main.java");
      let sources = SourceSet::new(vec![main]).unwrap();
      let options = PipelineOptions {
        on_failure: OnFailure::Continue,
        toolchain: tools.toolchain.clone(),
        ..Default::default()
      };

      let outcome = build_callgraph(&sources, &options).await.unwrap();

      assert!(!outcome.is_success());
      assert_eq!(outcome.failures.len(), 1);
      assert_eq!(outcome.failures[0].stage, Stage::Compile);
      assert!(outcome.artifacts.archive.exists());
      assert!(outcome.artifacts.report.exists());
    }

    #[tokio::test]
    async fn missing_tool_is_an_error_even_when_continuing() {
      let tools = fake_tools(0);
      let mut toolchain = tools.toolchain.clone();
      toolchain.javac = tools.temp.path().join("bin/no-such-javac");
      let main = java_source(&tools.temp, "app/Main.java");
      let sources = SourceSet::new(vec![main]).unwrap();
      let options =
        PipelineOptions { on_failure: OnFailure::Continue, toolchain, ..Default::default() };

      let result = build_callgraph(&sources, &options).await;
      assert!(matches!(result, Err(PipelineError::Run(_))));
    }
  }
}
