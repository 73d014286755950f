// src/config/mod.rs
pub mod io;
pub mod types;

pub use self::types::{Config, DEFAULT_MAX_CYCLES};
use crate::error::Result;
use std::path::{Path, PathBuf};

impl Config {
    /// Default settings rooted at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Default settings for `path`, overlaid with its `ouro.toml` or
    /// `[tool.ouro]` table when present.
    ///
    /// # Errors
    /// Returns error if a config file exists but is unreadable or malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = io::load_file_config(path)?.unwrap_or_default();
        config.path = path.to_path_buf();
        Ok(config)
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_categorize(mut self, categorize: bool) -> Self {
        self.categorize = categorize;
        self
    }

    #[must_use]
    pub fn with_ignore<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(patterns.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_max_cycles(mut self, max_cycles: usize) -> Self {
        self.max_cycles = max_cycles.max(1);
        self
    }
}
