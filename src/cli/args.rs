// src/cli/args.rs
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "ouro",
    version,
    disable_version_flag = true,
    about = "ouro checks your Python code for circular (cyclic) imports."
)]
pub struct Cli {
    /// Path to the Python project to be checked
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Show version number and exit
    #[arg(short = 'v', long, action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Increase output verbosity (print report to console, debug logs)
    #[arg(long)]
    pub verbose: bool,

    /// Analyse function-local imports (normally skipped because they cause no errors)
    #[arg(short = 't', long)]
    pub strict: bool,

    /// Don't categorize cycles (mark all cycles as critical)
    #[arg(long)]
    pub no_categorize: bool,

    /// Export the report to ouro-report.json in the current directory
    #[arg(short = 'e', long)]
    pub export: bool,

    /// Files, directories, or glob patterns to ignore
    #[arg(short = 'i', long, value_name = "PATTERN", num_args = 1..)]
    pub ignore: Vec<String>,
}
