//! The external call-graph analyzer toolchain.
//!
//! The analyzer is an opaque checkout with its own build system. Both of
//! its entry points are relative to the checkout, so every invocation runs
//! with the checkout as its working directory; the paths handed to the run
//! step must already be absolute for the same reason.

use std::ffi::OsString;
use std::path::Path;

use crate::exec::Invocation;

/// The analyzer's build step, run verbatim inside the checkout.
pub const BUILD_COMMAND: &str = "./gradlew compileJava";
/// The analyzer's run entry point, relative to the checkout.
pub const RUN_PROGRAM: &str = "./run.py";

/// Compose the analyzer's build step.
pub fn build_invocation(analyzer_dir: &Path) -> Invocation {
  Invocation::shell(BUILD_COMMAND).current_dir(analyzer_dir)
}

/// Compose the analysis run: report destination first, then the archive to
/// analyze, both absolute.
pub fn run_invocation(analyzer_dir: &Path, report: &Path, archive: &Path) -> Invocation {
  let args: Vec<OsString> =
    vec![report.as_os_str().to_os_string(), archive.as_os_str().to_os_string()];
  Invocation::argv(RUN_PROGRAM, args).current_dir(analyzer_dir)
}
