// src/reporting/json.rs
//! JSON report: `{"0": ["a", "b"], "1": [...], ...}` in cycle order.
//!
//! The exported file only carries module lists. Severity and the importing
//! lines are kept for the verbose console dump.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{OuroError, Result};
use crate::graph::cycles::Cycle;

pub const REPORT_FILE: &str = "ouro-report.json";

/// Borrowing view that serializes cycles keyed by their index.
pub struct CycleReport<'a> {
    pub cycles: &'a [Cycle],
    /// Full cycle records instead of bare module lists.
    pub detailed: bool,
}

impl Serialize for CycleReport<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cycles.len()))?;
        for (i, cycle) in self.cycles.iter().enumerate() {
            if self.detailed {
                map.serialize_entry(&i.to_string(), cycle)?;
            } else {
                map.serialize_entry(&i.to_string(), &cycle.modules)?;
            }
        }
        map.end()
    }
}

fn to_pretty(cycles: &[Cycle], detailed: bool) -> Result<String> {
    Ok(serde_json::to_string_pretty(&CycleReport { cycles, detailed })?)
}

/// Pretty-printed report text, as written by [`export`].
///
/// # Errors
/// Returns error if serialization fails.
pub fn render(cycles: &[Cycle]) -> Result<String> {
    to_pretty(cycles, false)
}

/// Like [`render`], with severity and import lines for each cycle.
///
/// # Errors
/// Returns error if serialization fails.
pub fn render_detailed(cycles: &[Cycle]) -> Result<String> {
    to_pretty(cycles, true)
}

/// Writes the report to [`REPORT_FILE`] inside `dir` and returns its path.
///
/// # Errors
/// Returns error if serialization or the write fails.
pub fn export(cycles: &[Cycle], dir: &Path) -> Result<PathBuf> {
    let path = dir.join(REPORT_FILE);
    let mut body = render(cycles)?;
    body.push('\n');
    fs::write(&path, body).map_err(|source| OuroError::Io {
        source,
        path: path.clone(),
    })?;
    Ok(path)
}
