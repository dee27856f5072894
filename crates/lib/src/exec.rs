//! The single chokepoint for launching external tools.
//!
//! Every compiler, packager, and analyzer call goes through [`Runner::run`].
//! The runner owns exactly two concerns: whether child output reaches the
//! terminal, and turning spawn failures into typed errors. It never
//! interprets exit statuses; callers decide what a nonzero status means.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Where a child process's stdout and stderr go.
///
/// Picked once per run from the logging verbosity and passed in explicitly;
/// the runner carries no ambient state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EchoMode {
  /// Let the child write straight to the terminal.
  Inherit,
  /// Send both streams to the null device.
  #[default]
  Discard,
}

/// One external command, either as an explicit argument vector or as a
/// string handed to the platform shell, with an optional working directory.
#[derive(Debug, Clone)]
pub struct Invocation {
  kind: InvocationKind,
  cwd: Option<PathBuf>,
}

#[derive(Debug, Clone)]
enum InvocationKind {
  Argv { program: PathBuf, args: Vec<OsString> },
  Shell { script: String },
}

impl Invocation {
  /// A direct program-plus-arguments invocation. Arguments reach the child
  /// exactly as given; no shell is involved.
  pub fn argv<P, A, S>(program: P, args: A) -> Self
  where
    P: Into<PathBuf>,
    A: IntoIterator<Item = S>,
    S: Into<OsString>,
  {
    Self {
      kind: InvocationKind::Argv {
        program: program.into(),
        args: args.into_iter().map(Into::into).collect(),
      },
      cwd: None,
    }
  }

  /// A single command line interpreted by the platform shell.
  pub fn shell(script: impl Into<String>) -> Self {
    Self { kind: InvocationKind::Shell { script: script.into() }, cwd: None }
  }

  /// Run in the given directory instead of the caller's.
  pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  pub fn cwd(&self) -> Option<&Path> {
    self.cwd.as_deref()
  }

  fn to_command(&self) -> Command {
    let mut command = match &self.kind {
      InvocationKind::Argv { program, args } => {
        let mut command = Command::new(program);
        command.args(args);
        command
      }
      InvocationKind::Shell { script } => {
        let (shell, flag) = shell_command();
        let mut command = Command::new(shell);
        command.arg(flag).arg(script);
        command
      }
    };
    if let Some(cwd) = &self.cwd {
      command.current_dir(cwd);
    }
    command
  }

  /// What to blame when the spawn itself fails.
  fn launched_program(&self) -> String {
    match &self.kind {
      InvocationKind::Argv { program, .. } => program.display().to_string(),
      InvocationKind::Shell { script } => script.clone(),
    }
  }
}

/// The composed command line, for logs and diagnostics.
impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.kind {
      InvocationKind::Argv { program, args } => {
        write!(f, "{}", program.display())?;
        for arg in args {
          write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
      }
      InvocationKind::Shell { script } => f.write_str(script),
    }
  }
}

/// Platform shell used for shell-form invocations.
fn shell_command() -> (&'static str, &'static str) {
  #[cfg(unix)]
  {
    ("/bin/sh", "-c")
  }
  #[cfg(windows)]
  {
    ("cmd", "/C")
  }
}

/// Errors from launching an external tool.
#[derive(Debug, Error)]
pub enum RunError {
  /// The program could not be started at all (missing, not executable).
  #[error("failed to launch {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },
}

/// Executes invocations with a fixed output-visibility mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Runner {
  echo: EchoMode,
}

impl Runner {
  pub fn new(echo: EchoMode) -> Self {
    Self { echo }
  }

  pub fn echo(&self) -> EchoMode {
    self.echo
  }

  /// Run one invocation to completion and hand back its exit status.
  ///
  /// The status comes back untranslated: a nonzero exit is data here, not
  /// an error. Only a failure to spawn is an [`RunError`].
  pub async fn run(&self, invocation: &Invocation) -> Result<ExitStatus, RunError> {
    debug!(command = %invocation, cwd = ?invocation.cwd(), "launching");

    let mut command = invocation.to_command();
    match self.echo {
      EchoMode::Inherit => {
        command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
      }
      EchoMode::Discard => {
        command.stdout(Stdio::null()).stderr(Stdio::null());
      }
    }

    let status = command.status().await.map_err(|source| RunError::Spawn {
      program: invocation.launched_program(),
      source,
    })?;

    debug!(command = %invocation, code = ?status.code(), "finished");
    Ok(status)
  }
}
