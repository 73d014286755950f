// src/config/io.rs
//! Loading `ouro.toml` / `pyproject.toml`.

use std::fs;
use std::path::Path;

use super::types::{Config, PyProject};
use crate::error::{OuroError, Result};

pub const CONFIG_FILE: &str = "ouro.toml";
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Reads file-level settings from `root`. `ouro.toml` wins over `pyproject.toml`.
///
/// # Errors
/// Returns error if a config file exists but cannot be read or parsed.
pub fn load_file_config(root: &Path) -> Result<Option<Config>> {
    let dedicated = root.join(CONFIG_FILE);
    if dedicated.is_file() {
        let content = read(&dedicated)?;
        return parse_ouro_toml(&content)
            .map(Some)
            .map_err(|message| OuroError::Config {
                path: dedicated,
                message,
            });
    }

    let pyproject = root.join(PYPROJECT_FILE);
    if pyproject.is_file() {
        let content = read(&pyproject)?;
        return parse_pyproject(&content).map_err(|message| OuroError::Config {
            path: pyproject,
            message,
        });
    }

    Ok(None)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| OuroError::Io {
        source,
        path: path.to_path_buf(),
    })
}

pub(crate) fn parse_ouro_toml(content: &str) -> std::result::Result<Config, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}

pub(crate) fn parse_pyproject(content: &str) -> std::result::Result<Option<Config>, String> {
    let parsed: PyProject = toml::from_str(content).map_err(|e| e.to_string())?;
    Ok(parsed.tool.ouro)
}
