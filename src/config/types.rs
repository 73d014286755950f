use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Per-component cap on enumerated cycles.
pub const DEFAULT_MAX_CYCLES: usize = 1000;

/// Options accepted by the checker.
///
/// File values come from `ouro.toml` or `[tool.ouro]` in `pyproject.toml`;
/// command-line flags are layered on top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project root. Never read from a config file.
    #[serde(skip)]
    pub path: PathBuf,
    /// Report cycles that need a function-local import (marked benign).
    pub strict: bool,
    /// Compute severity; when off every cycle is critical.
    pub categorize: bool,
    /// Files, directories, or glob patterns to skip.
    pub ignore: Vec<String>,
    /// Stop enumerating a component after this many cycles.
    pub max_cycles: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            strict: false,
            categorize: true,
            ignore: Vec::new(),
            max_cycles: DEFAULT_MAX_CYCLES,
        }
    }
}

/// The slice of `pyproject.toml` we care about.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PyProject {
    #[serde(default)]
    pub tool: PyProjectTools,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PyProjectTools {
    pub ouro: Option<Config>,
}
