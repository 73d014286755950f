// src/checker.rs
//! The end-to-end pipeline: scan, extract, build, detect, categorize.

use crate::config::Config;
use crate::discovery::{self, SourceFile};
use crate::error::{Diagnostic, Result};
use crate::graph::builder::{self, BuildStats};
use crate::graph::categorize::{categorize, CategorizeOptions};
use crate::graph::cycles::{self, Cycle};
use crate::graph::origins::{self, OriginCandidate};
use crate::graph::types::{DependencyGraph, EdgeScope};

/// Cycles plus the diagnostics produced while finding them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    pub cycles: Vec<Cycle>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs detection and categorization over an already-built graph.
#[must_use]
pub fn analyze(graph: &DependencyGraph, config: &Config) -> Analysis {
    let scope = EdgeScope::for_strict(config.strict);
    let detection = cycles::detect(graph, scope, config.max_cycles);
    let cycles = categorize(
        graph,
        detection.cycles,
        CategorizeOptions {
            strict: config.strict,
            categorize: config.categorize,
        },
    );
    Analysis {
        cycles,
        diagnostics: detection.diagnostics,
    }
}

/// One completed run over a project.
#[derive(Debug)]
pub struct Checker {
    config: Config,
    graph: DependencyGraph,
    cycles: Vec<Cycle>,
    diagnostics: Vec<Diagnostic>,
    stats: BuildStats,
}

impl Checker {
    /// Scans `config.path` and analyses it.
    ///
    /// # Errors
    /// Returns error if the project root is missing or unreadable, or an
    /// ignore pattern is invalid. Per-file problems end up in
    /// [`Checker::diagnostics`] instead.
    pub fn new(config: Config) -> Result<Self> {
        let scan = discovery::scan(&config)?;
        tracing::info!(files = scan.files.len(), root = %config.path.display(), "scanning project");
        let mut checker = Self::from_sources(config, &scan.files);
        let mut diagnostics = scan.diagnostics;
        diagnostics.append(&mut checker.diagnostics);
        checker.diagnostics = diagnostics;
        Ok(checker)
    }

    /// Analyses an explicit file list.
    #[must_use]
    pub fn from_sources(config: Config, files: &[SourceFile]) -> Self {
        let built = builder::build(files);
        let mut checker = Self::from_graph(config, built.graph);
        checker.stats = built.stats;
        let mut diagnostics = built.diagnostics;
        diagnostics.append(&mut checker.diagnostics);
        checker.diagnostics = diagnostics;
        checker
    }

    /// Analyses a graph built elsewhere.
    #[must_use]
    pub fn from_graph(config: Config, graph: DependencyGraph) -> Self {
        let Analysis {
            cycles,
            diagnostics,
        } = analyze(&graph, &config);
        tracing::info!(
            cycles = cycles.len(),
            critical = cycles.iter().filter(|c| c.is_critical()).count(),
            "analysis finished"
        );
        Self {
            config,
            graph,
            cycles,
            diagnostics,
            stats: BuildStats::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Final cycles, sorted by length then ids.
    #[must_use]
    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Ranked candidates for `cycles`, with the numbers behind each rank.
    /// In-degrees come from the same edge view the cycles were found in.
    #[must_use]
    pub fn origin_candidates(&self, cycles: &[Cycle]) -> Vec<OriginCandidate> {
        let in_degrees = self
            .graph
            .in_degrees(EdgeScope::for_strict(self.config.strict));
        origins::rank(cycles, &in_degrees)
    }

    /// Module ids most likely responsible for `cycles`, best guess first.
    #[must_use]
    pub fn possible_origins(&self, cycles: &[Cycle]) -> Vec<String> {
        self.origin_candidates(cycles)
            .into_iter()
            .map(|c| c.module)
            .collect()
    }
}
