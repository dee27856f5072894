//! Flat archive packaging of compiled units.
//!
//! Handing the packager a nested path records that path's directories
//! inside the archive. Every unit is therefore added as a (directory, bare
//! name) pair, emitted as a `-C <dir> <name>` switch: the packager changes
//! into the unit's directory and adds the unit by name alone, so entries
//! are flat regardless of how deep the source tree is.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::exec::Invocation;
use crate::toolchain::Toolchain;

/// Errors composing archive entries.
#[derive(Debug, Error)]
pub enum ArchiveError {
  /// The unit path has no final file-name component (e.g. `/` or `..`).
  #[error("compiled unit path has no file name: {}", .path.display())]
  NoFileName { path: PathBuf },
}

/// One compiled unit to add: the directory to add it from and its bare
/// file name.
///
/// The name comes from [`Path::file_name`], so it can never contain a
/// separator; flatness is a property of the type, not a string convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
  pub dir: PathBuf,
  pub name: OsString,
}

impl ArchiveEntry {
  /// Split a compiled-unit path into its directory context and bare name.
  ///
  /// A bare file name has an empty parent, which becomes `.` so the
  /// directory switch stays well-formed.
  pub fn for_unit(unit: &Path) -> Result<Self, ArchiveError> {
    let name = unit
      .file_name()
      .ok_or_else(|| ArchiveError::NoFileName { path: unit.to_path_buf() })?
      .to_os_string();
    let dir = match unit.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
      _ => PathBuf::from("."),
    };
    Ok(Self { dir, name })
  }
}

/// Map each compiled unit to its archive entry, preserving unit order.
pub fn entries_for(units: &[PathBuf]) -> Result<Vec<ArchiveEntry>, ArchiveError> {
  units.iter().map(|unit| ArchiveEntry::for_unit(unit)).collect()
}

/// Compose the packaging command: one `cf` call with a directory-context
/// switch per entry, in entry order.
pub fn invocation(toolchain: &Toolchain, archive: &Path, entries: &[ArchiveEntry]) -> Invocation {
  let mut args: Vec<OsString> = vec!["cf".into(), archive.as_os_str().to_os_string()];
  for entry in entries {
    args.push("-C".into());
    args.push(entry.dir.as_os_str().to_os_string());
    args.push(entry.name.clone());
  }
  Invocation::argv(&toolchain.jar, args)
}
