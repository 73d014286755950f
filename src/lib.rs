//! Static detection of circular imports in Python projects.
//!
//! [`checker::Checker`] runs the whole pipeline: [`discovery`] finds the
//! source files, [`graph`] extracts and resolves imports, enumerates cycles,
//! grades them, and ranks likely origins.

pub mod checker;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod exit;
pub mod graph;
pub mod reporting;

pub use checker::Checker;
pub use config::Config;
pub use error::{Diagnostic, OuroError, Result};
