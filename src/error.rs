// src/error.rs
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures. Anything listed here aborts the run.
#[derive(Debug, Error)]
pub enum OuroError {
    #[error("Project root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Project root is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Invalid config in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Invalid ignore pattern `{pattern}`: {source}")]
    IgnorePattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("Could not serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OuroError>;

// Allow `?` on std::io::Error by converting to OuroError::Io with unknown path.
impl From<std::io::Error> for OuroError {
    fn from(source: std::io::Error) -> Self {
        OuroError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

/// Non-fatal problems recorded while the run keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The file could not be read or parsed and contributed no edges.
    FileParse {
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },
    /// An import that looked project-internal but matched no scanned module.
    UnresolvedImport {
        module: String,
        reference: String,
        line: usize,
    },
    /// Cycle enumeration for one strongly connected component hit the cap.
    EnumerationLimit { modules: Vec<String>, limit: usize },
    /// Two files mapped to the same module id; `shadowed` was left out.
    DuplicateModule {
        module: String,
        kept: PathBuf,
        shadowed: PathBuf,
    },
}

impl Diagnostic {
    #[must_use]
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::FileParse { .. })
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileParse {
                path,
                line: Some(line),
                message,
            } => write!(f, "{}:{line}: {message}", path.display()),
            Self::FileParse {
                path,
                line: None,
                message,
            } => write!(f, "{}: {message}", path.display()),
            Self::UnresolvedImport {
                module,
                reference,
                line,
            } => write!(f, "{module}:{line}: unresolved import `{reference}`"),
            Self::EnumerationLimit { modules, limit } => write!(
                f,
                "cycle enumeration stopped at {limit} cycles in a component of {} modules",
                modules.len()
            ),
            Self::DuplicateModule {
                module,
                kept,
                shadowed,
            } => write!(
                f,
                "{}: shadowed by {} (both define `{module}`)",
                shadowed.display(),
                kept.display()
            ),
        }
    }
}
