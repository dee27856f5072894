//! Locations of the external tools the pipeline drives.

use std::path::PathBuf;

/// Overrides the Java compiler executable.
pub const JAVAC_ENV: &str = "JCG_JAVAC";
/// Overrides the archive packaging tool.
pub const JAR_ENV: &str = "JCG_JAR";
/// Overrides the analyzer toolchain checkout directory.
pub const ANALYZER_DIR_ENV: &str = "JCG_ANALYZER_DIR";

/// External tool configuration.
///
/// Defaults assume `javac` and `jar` on `PATH` and the analyzer checkout in
/// `WALA-callgraph` under the invoking directory. Each location can be
/// overridden through its environment variable; the analyzer directory can
/// also be set per run on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  /// Java compiler executable.
  pub javac: PathBuf,
  /// Archive packaging tool.
  pub jar: PathBuf,
  /// Directory containing the analyzer toolchain checkout.
  pub analyzer_dir: PathBuf,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self {
      javac: PathBuf::from("javac"),
      jar: PathBuf::from("jar"),
      analyzer_dir: PathBuf::from("WALA-callgraph"),
    }
  }
}

impl Toolchain {
  /// Build a toolchain from the environment, falling back to the defaults
  /// for anything unset.
  pub fn from_env() -> Self {
    let mut toolchain = Self::default();
    if let Ok(javac) = std::env::var(JAVAC_ENV) {
      toolchain.javac = PathBuf::from(javac);
    }
    if let Ok(jar) = std::env::var(JAR_ENV) {
      toolchain.jar = PathBuf::from(jar);
    }
    if let Ok(dir) = std::env::var(ANALYZER_DIR_ENV) {
      toolchain.analyzer_dir = PathBuf::from(dir);
    }
    toolchain
  }
}

#[cfg(test)]
mod tests {
  use serial_test::serial;

  use super::*;

  #[test]
  #[serial]
  fn defaults_apply_without_overrides() {
    temp_env::with_vars_unset([JAVAC_ENV, JAR_ENV, ANALYZER_DIR_ENV], || {
      let toolchain = Toolchain::from_env();
      assert_eq!(toolchain, Toolchain::default());
      assert_eq!(toolchain.javac, PathBuf::from("javac"));
      assert_eq!(toolchain.analyzer_dir, PathBuf::from("WALA-callgraph"));
    });
  }

  #[test]
  #[serial]
  fn environment_overrides_each_tool() {
    temp_env::with_vars(
      [
        (JAVAC_ENV, Some("/opt/jdk/bin/javac")),
        (JAR_ENV, Some("/opt/jdk/bin/jar")),
        (ANALYZER_DIR_ENV, Some("/srv/analyzer")),
      ],
      || {
        let toolchain = Toolchain::from_env();
        assert_eq!(toolchain.javac, PathBuf::from("/opt/jdk/bin/javac"));
        assert_eq!(toolchain.jar, PathBuf::from("/opt/jdk/bin/jar"));
        assert_eq!(toolchain.analyzer_dir, PathBuf::from("/srv/analyzer"));
      },
    );
  }

  #[test]
  #[serial]
  fn unset_variables_keep_their_defaults() {
    temp_env::with_vars(
      [
        (JAVAC_ENV, Some("/opt/jdk/bin/javac")),
        (JAR_ENV, None),
        (ANALYZER_DIR_ENV, None),
      ],
      || {
        let toolchain = Toolchain::from_env();
        assert_eq!(toolchain.javac, PathBuf::from("/opt/jdk/bin/javac"));
        assert_eq!(toolchain.jar, PathBuf::from("jar"));
        assert_eq!(toolchain.analyzer_dir, PathBuf::from("WALA-callgraph"));
      },
    );
  }
}
