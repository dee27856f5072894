//! Lexical path resolution and artifact-path derivation.
//!
//! Later pipeline steps run with working directories of their own, so every
//! path they receive is made absolute up front. Resolution is purely
//! lexical: the report path is resolved before the report exists, so nothing
//! here may require the target to be present on disk.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Convert a path to its absolute form.
///
/// Relative paths are joined onto the current working directory, then `.`
/// and `..` components are folded away without consulting the filesystem.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
  let joined = if path.is_absolute() {
    path.to_path_buf()
  } else {
    std::env::current_dir()?.join(path)
  };
  Ok(normalize(&joined))
}

/// Fold `.` and `..` components out of an already-absolute path.
fn normalize(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        normalized.pop();
      }
      _ => normalized.push(component),
    }
  }
  normalized
}

/// Derive a sibling artifact path by replacing the final extension.
///
/// The directory and base name are preserved; a path without an extension
/// simply gains one, and only the last extension of a multi-dot name is
/// replaced. The result is a name, not a file: nothing is created.
pub fn with_extension(path: &Path, extension: &str) -> PathBuf {
  let mut derived = path.to_path_buf();
  derived.set_extension(extension);
  derived
}
