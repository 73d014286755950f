// src/reporting/mod.rs
//! Console and JSON output for a finished run.

pub mod console;
pub mod json;

pub use console::{print_banner, print_cycles, print_diagnostics, print_elapsed, print_results, OutputOptions};
pub use json::{export, render, render_detailed, REPORT_FILE};
