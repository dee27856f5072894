//! The ordered set of Java sources handed to the pipeline.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::paths;

/// Returned when a source set is constructed from no paths at all.
#[derive(Debug, Error)]
#[error("at least one source file is required")]
pub struct EmptySourceSet;

/// An ordered, non-empty list of source files.
///
/// Order is the caller's order and is preserved everywhere downstream. The
/// first element is the entry point: the archive and the report are both
/// named after it. Membership never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSet(Vec<PathBuf>);

impl SourceSet {
  /// Build a source set, rejecting an empty list before any external tool
  /// can be launched.
  pub fn new(sources: Vec<PathBuf>) -> Result<Self, EmptySourceSet> {
    if sources.is_empty() {
      return Err(EmptySourceSet);
    }
    Ok(Self(sources))
  }

  /// The designated entry point: the first source.
  pub fn entry_point(&self) -> &Path {
    &self.0[0]
  }

  /// All sources, in their original order.
  pub fn iter(&self) -> impl Iterator<Item = &Path> {
    self.0.iter().map(PathBuf::as_path)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Resolve every source against the current working directory.
  pub fn absolutized(&self) -> io::Result<SourceSet> {
    let resolved = self
      .0
      .iter()
      .map(|source| paths::absolutize(source))
      .collect::<io::Result<Vec<_>>>()?;
    Ok(Self(resolved))
  }
}
