//! Compiler invocation: one pass over the whole source set.

use std::ffi::OsString;

use crate::exec::Invocation;
use crate::source::SourceSet;
use crate::toolchain::Toolchain;

/// Compose the compiler command: every source in one call, in set order.
///
/// Compiled units are expected to appear next to their sources with a
/// `.class` extension; verifying that is left to the tools that consume
/// them.
pub fn invocation(toolchain: &Toolchain, sources: &SourceSet) -> Invocation {
  let args: Vec<OsString> =
    sources.iter().map(|source| source.as_os_str().to_os_string()).collect();
  Invocation::argv(&toolchain.javac, args)
}
