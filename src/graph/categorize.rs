// src/graph/categorize.rs
//! Attaches provenance and severity to detected cycles.

use super::cycles::{Cycle, Severity};
use super::types::{DependencyGraph, ImportEdge};

/// Options that shape the final cycle list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorizeOptions {
    /// Keep cycles that need a function-local import (marked benign).
    pub strict: bool,
    /// Attach a severity tag at all.
    pub categorize: bool,
}

/// Turns raw id cycles into [`Cycle`]s, preserving input order.
///
/// Cycles that rely on a function-local import are dropped unless
/// `opts.strict` is set.
#[must_use]
pub fn categorize(
    graph: &DependencyGraph,
    raw: Vec<Vec<String>>,
    opts: CategorizeOptions,
) -> Vec<Cycle> {
    let mut out = Vec::with_capacity(raw.len());
    let mut suppressed = 0usize;

    for modules in raw {
        let mut cycle = Cycle::new(modules);
        let Some(edges) = realizing_edges(graph, &cycle) else {
            tracing::debug!(cycle = ?cycle.modules, "cycle hop has no recorded edge, dropping");
            continue;
        };
        let needs_nested = edges.iter().any(|e| !e.is_top_level);
        if needs_nested && !opts.strict {
            suppressed += 1;
            continue;
        }

        cycle.edges = edges;
        cycle.severity = opts.categorize.then_some(if needs_nested {
            Severity::Benign
        } else {
            Severity::Critical
        });
        out.push(cycle);
    }

    if suppressed > 0 {
        tracing::debug!(suppressed, "dropped cycles that only close through function-local imports");
    }
    out
}

/// One edge per hop: the earliest top-level import, else the earliest one.
fn realizing_edges(graph: &DependencyGraph, cycle: &Cycle) -> Option<Vec<ImportEdge>> {
    cycle
        .hops()
        .map(|(from, to)| realizing_edge(graph, from, to))
        .collect()
}

/// Earliest top-level `from -> to` edge, or the earliest edge of any kind.
#[must_use]
pub fn realizing_edge(graph: &DependencyGraph, from: &str, to: &str) -> Option<ImportEdge> {
    let candidates = graph.edges_between(from, to);
    candidates
        .iter()
        .find(|e| e.is_top_level)
        .or_else(|| candidates.first())
        .map(|e| (*e).clone())
}
