//! jcg-lib: Core types and logic for the callgraph build pipeline
//!
//! Turns an ordered set of Java sources into a static call graph:
//! - `source`: the ordered, non-empty set of input sources
//! - `paths`: lexical path resolution and artifact-path derivation
//! - `compile`: one compiler pass over the whole source set
//! - `archive`: flat packaging of the compiled units
//! - `analyzer`: the external analyzer toolchain (build + run)
//! - `exec`: the single chokepoint every subprocess goes through
//! - `pipeline`: the linear step sequence and its failure policy

pub mod analyzer;
pub mod archive;
pub mod compile;
pub mod exec;
pub mod paths;
pub mod pipeline;
pub mod source;
pub mod toolchain;
