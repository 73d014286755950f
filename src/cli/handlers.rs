// src/cli/handlers.rs
use anyhow::{Context, Result};
use colored::Colorize;
use std::time::Instant;

use crate::checker::Checker;
use crate::cli::args::Cli;
use crate::config::Config;
use crate::exit::OuroExit;
use crate::reporting::{self, OutputOptions};

/// File config for `cli.path` with the command-line flags layered on top.
///
/// # Errors
/// Returns error if a config file exists but is malformed.
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(&cli.path)?;
    if cli.strict {
        config = config.with_strict(true);
    }
    if cli.no_categorize {
        config = config.with_categorize(false);
    }
    Ok(config.with_ignore(cli.ignore.iter().cloned()))
}

/// Runs one check and prints the report.
///
/// # Errors
/// Returns error if the project cannot be scanned or the export fails.
pub fn run(cli: &Cli) -> Result<OuroExit> {
    let start = Instant::now();
    let config = resolve_config(cli)?;
    let output = OutputOptions {
        export: cli.export,
        verbose: cli.verbose,
    };
    reporting::print_banner(&config, output);

    let checker = Checker::new(config)
        .with_context(|| format!("Failed to check {}", cli.path.display()))?;
    reporting::print_diagnostics(checker.diagnostics());

    let cycles = checker.cycles();
    let origins = checker.origin_candidates(cycles);
    reporting::print_results(cycles, &origins);

    if !cycles.is_empty() {
        if output.verbose {
            println!("{}", "PRINTING REPORT TO CONSOLE".cyan());
            reporting::print_cycles(cycles);
            println!("{}", reporting::render_detailed(cycles)?);
        }
        if output.export {
            let cwd = std::env::current_dir().context("Cannot determine current directory")?;
            let path = reporting::export(cycles, &cwd)?;
            println!(
                "{}",
                format!("REPORT EXPORTED TO: {}", path.display())
                    .green()
                    .bold()
            );
        }
    }

    reporting::print_elapsed(start.elapsed());
    Ok(OuroExit::from_cycle_count(cycles.len()))
}
