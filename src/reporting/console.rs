// src/reporting/console.rs
use colored::Colorize;
use std::time::Duration;

use crate::config::Config;
use crate::error::Diagnostic;
use crate::graph::cycles::{Cycle, Severity};
use crate::graph::origins::OriginCandidate;

/// Command-line switches that only affect output, echoed in the banner.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub export: bool,
    pub verbose: bool,
}

pub fn print_banner(config: &Config, output: OutputOptions) {
    println!("{}", "OURO IS STARTING...".cyan().bold());
    println!("{}", "SCANNING FILES...".cyan().bold());
    println!("{}", "OPTIONS:".cyan().bold());
    println!(" ==> PATH       : {}", config.path.display());
    println!(" ==> EXPORT     : {}", output.export);
    println!(" ==> VERBOSE    : {}", output.verbose);
    println!(" ==> STRICT     : {}", config.strict);
    println!(" ==> IGNORING   : {}", ignoring_label(&config.ignore));
    println!(" ==> CATEGORIZE : {}", config.categorize);
}

fn ignoring_label(patterns: &[String]) -> String {
    if patterns.is_empty() {
        "-".to_string()
    } else {
        patterns.join(", ")
    }
}

/// Prints the verdict and, when there are cycles, the ranked origins.
pub fn print_results(cycles: &[Cycle], origins: &[OriginCandidate]) {
    if cycles.is_empty() {
        println!("{}", "WHOA! NO CIRCULAR IMPORT(S) FOUND!".green().bold());
        return;
    }

    let critical = cycles.iter().filter(|c| c.is_critical()).count();
    println!("{}", "FOUND CIRCULAR IMPORT(S)!".red().bold());
    println!(
        "   {} {} ({critical} critical, {} benign)",
        cycles.len(),
        pluralize("cycle", cycles.len()),
        cycles.len() - critical
    );

    println!(
        "{}",
        "PROBABLY ONE OF THE FOLLOWING IS THE ORIGIN".yellow().bold()
    );
    for candidate in origins {
        println!(" ==> {}", candidate.module.yellow());
    }
}

/// One line per cycle: `[critical] a -> b -> a`.
pub fn print_cycles(cycles: &[Cycle]) {
    for cycle in cycles {
        let chain = cycle.closed_path().join(" -> ");
        match cycle.severity {
            Some(Severity::Critical) => println!("  {} {chain}", "[critical]".red()),
            Some(Severity::Benign) => println!("  {} {chain}", "[benign]".yellow()),
            None => println!("  {chain}"),
        }
    }
}

/// Parse failures and truncations are listed; unresolved imports are only
/// counted, they show up individually at debug log level.
pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    let mut unresolved = 0usize;
    for diag in diagnostics {
        match diag {
            Diagnostic::UnresolvedImport { .. } => unresolved += 1,
            Diagnostic::FileParse { .. } => {
                println!("{} skipped {diag}", "warning:".yellow());
            }
            Diagnostic::EnumerationLimit { .. } | Diagnostic::DuplicateModule { .. } => {
                println!("{} {diag}", "warning:".yellow());
            }
        }
    }
    if unresolved > 0 {
        println!(
            "{} {unresolved} unresolved project {} ignored",
            "note:".dimmed(),
            pluralize("import", unresolved)
        );
    }
}

pub fn print_elapsed(elapsed: Duration) {
    println!(
        "{}",
        format!("ELAPSED TIME: {:.2} seconds", elapsed.as_secs_f64())
            .cyan()
            .bold()
    );
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
