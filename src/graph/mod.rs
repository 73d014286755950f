// src/graph/mod.rs
//! Import graph construction and cycle analysis.

pub mod builder;
pub mod categorize;
pub mod cycles;
pub mod imports;
pub mod origins;
pub mod resolver;
pub mod scc;
pub mod types;

pub use categorize::CategorizeOptions;
pub use cycles::{Cycle, Severity};
pub use origins::OriginCandidate;
pub use types::{DependencyGraph, EdgeScope, ImportEdge, Module};
