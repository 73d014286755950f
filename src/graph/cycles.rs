// src/graph/cycles.rs
//! Elementary cycle enumeration.
//!
//! Components come from [`super::scc`]; inside each one the search is
//! Johnson's algorithm with an explicit frame stack. Start vertices are taken
//! in id order and a search from `s` only walks vertices ordered after `s`,
//! so every cycle is found exactly once and already starts at its smallest
//! id.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::scc;
use super::types::{Adjacency, DependencyGraph, EdgeScope, ImportEdge};
use crate::error::Diagnostic;

/// How bad a cycle is at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Every hop runs at module load time.
    Critical,
    /// At least one hop only runs when a function is called.
    Benign,
}

/// A closed import chain `modules[0] -> .. -> modules[k-1] -> modules[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    pub modules: Vec<String>,
    /// `None` when categorization is off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// One realizing edge per hop, in hop order.
    #[serde(rename = "imports")]
    pub edges: Vec<ImportEdge>,
}

impl Cycle {
    /// Builds an uncategorized cycle, rotated to start at its smallest id.
    #[must_use]
    pub fn new(mut modules: Vec<String>) -> Self {
        let start = modules
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.cmp(b.1))
            .map_or(0, |(i, _)| i);
        modules.rotate_left(start);
        Self {
            modules,
            severity: None,
            edges: Vec::new(),
        }
    }

    /// `[m0, .., mk-1, m0]`.
    #[must_use]
    pub fn closed_path(&self) -> Vec<&str> {
        let mut path: Vec<&str> = self.modules.iter().map(String::as_str).collect();
        if let Some(first) = self.modules.first() {
            path.push(first);
        }
        path
    }

    /// `(from, to)` for every hop, including the closing one.
    pub fn hops(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        let n = self.modules.len();
        (0..n).map(move |i| {
            (
                self.modules[i].as_str(),
                self.modules[(i + 1) % n].as_str(),
            )
        })
    }

    /// Uncategorized cycles count as critical.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity.unwrap_or(Severity::Critical)
    }

    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.severity() == Severity::Critical
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.modules.iter().any(|m| m == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Raw detector output: cycles as id lists plus truncation diagnostics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Sorted by `(length, ids)`.
    pub cycles: Vec<Vec<String>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Finds every elementary cycle of the `scope` view of `graph`, at most
/// `max_cycles` per strongly connected component.
#[must_use]
pub fn detect(graph: &DependencyGraph, scope: EdgeScope, max_cycles: usize) -> Detection {
    let adj = graph.adjacency(scope);
    let limit = max_cycles.max(1);
    let mut member = vec![false; adj.len()];
    let mut out = Detection::default();

    for comp in scc::nontrivial(&adj) {
        for &v in &comp {
            member[v] = true;
        }
        let found = enumerate_component(&adj, &comp, &member, limit);
        for &v in &comp {
            member[v] = false;
        }

        if found.truncated {
            let modules: Vec<String> = comp.iter().map(|&v| adj.nodes[v].clone()).collect();
            tracing::warn!(
                modules = modules.len(),
                limit,
                "cycle enumeration stopped early for one component"
            );
            out.diagnostics
                .push(Diagnostic::EnumerationLimit { modules, limit });
        }
        out.cycles.extend(
            found
                .cycles
                .into_iter()
                .map(|c| c.into_iter().map(|v| adj.nodes[v].clone()).collect()),
        );
    }

    out.cycles
        .sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    tracing::debug!(cycles = out.cycles.len(), "cycle enumeration finished");
    out
}

struct ComponentCycles {
    cycles: Vec<Vec<usize>>,
    truncated: bool,
}

fn enumerate_component(
    adj: &Adjacency,
    comp: &[usize],
    member: &[bool],
    limit: usize,
) -> ComponentCycles {
    let mut found = ComponentCycles {
        cycles: Vec::new(),
        truncated: false,
    };
    for &s in comp {
        if !circuits_from(adj, member, s, limit, &mut found) {
            found.truncated = true;
            break;
        }
    }
    found
}

/// Johnson's CIRCUIT search rooted at `s`. Returns false once `limit` cycles
/// have been collected and another one turns up.
fn circuits_from(
    adj: &Adjacency,
    member: &[bool],
    s: usize,
    limit: usize,
    found: &mut ComponentCycles,
) -> bool {
    let allowed = |w: usize| member[w] && w >= s;

    let mut path = vec![s];
    let mut blocked: HashSet<usize> = HashSet::from([s]);
    let mut closed: HashSet<usize> = HashSet::new();
    let mut waiting: HashMap<usize, HashSet<usize>> = HashMap::new();
    let mut frames: Vec<(usize, usize)> = vec![(s, 0)];

    while let Some(frame) = frames.last_mut() {
        let v = frame.0;
        let succ = &adj.successors[v];
        let mut next = None;
        while let Some(&w) = succ.get(frame.1) {
            frame.1 += 1;
            if allowed(w) {
                next = Some(w);
                break;
            }
        }

        if let Some(w) = next {
            if w == s {
                if found.cycles.len() >= limit {
                    return false;
                }
                found.cycles.push(path.clone());
                closed.extend(path.iter().copied());
            } else if !blocked.contains(&w) {
                path.push(w);
                frames.push((w, 0));
                closed.remove(&w);
                blocked.insert(w);
            }
            continue;
        }

        if closed.contains(&v) {
            unblock(v, &mut blocked, &mut waiting);
        } else {
            for &w in succ.iter().filter(|&&w| allowed(w)) {
                waiting.entry(w).or_default().insert(v);
            }
        }
        frames.pop();
        path.pop();
    }
    true
}

fn unblock(node: usize, blocked: &mut HashSet<usize>, waiting: &mut HashMap<usize, HashSet<usize>>) {
    let mut stack = vec![node];
    while let Some(v) = stack.pop() {
        if blocked.remove(&v) {
            if let Some(dependents) = waiting.remove(&v) {
                stack.extend(dependents);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::Module;
    use std::path::PathBuf;

    fn graph(edges: &[(&str, &str)]) -> DependencyGraph {
        let mut g = DependencyGraph::new();
        for (a, b) in edges {
            for id in [a, b] {
                g.add_module(Module {
                    id: (*id).to_string(),
                    path: PathBuf::from(format!("{id}.py")),
                    is_package: false,
                });
            }
        }
        for (line, (a, b)) in edges.iter().enumerate() {
            g.add_edge(ImportEdge {
                from: (*a).to_string(),
                to: (*b).to_string(),
                line: line + 1,
                is_top_level: true,
            });
        }
        g
    }

    fn cycles_of(edges: &[(&str, &str)]) -> Vec<Vec<String>> {
        detect(&graph(edges), EdgeScope::All, 1000).cycles
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_cycle_detection_logic() {
        let cases: Vec<(Vec<(&str, &str)>, usize, &str)> = vec![
            (vec![("a", "b"), ("b", "c")], 0, "No cycles"),
            (vec![("a", "b"), ("b", "a")], 1, "Simple cycle"),
            (
                vec![("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
                0,
                "Diamond DAG (no cycle)",
            ),
            (vec![("a", "a")], 1, "Self loop"),
            (vec![("a", "b"), ("b", "c"), ("c", "a")], 1, "Three node cycle"),
            (
                vec![("a", "b"), ("b", "a"), ("c", "d"), ("d", "c")],
                2,
                "Disjoint cycles",
            ),
            (
                vec![("a", "b"), ("b", "a"), ("b", "c"), ("c", "b")],
                2,
                "Figure-8 (shared node)",
            ),
            (
                vec![("a", "b"), ("b", "c"), ("c", "d"), ("d", "e"), ("e", "a")],
                1,
                "Long cycle (5 nodes)",
            ),
            (vec![], 0, "Empty graph"),
            (vec![("a", "b")], 0, "Single edge"),
            (
                vec![("a", "b"), ("b", "c"), ("c", "a"), ("a", "c"), ("c", "b"), ("b", "a")],
                5,
                "Complete digraph on three nodes",
            ),
        ];

        for (edges, expected, desc) in cases {
            assert_eq!(cycles_of(&edges).len(), expected, "Failed: {desc}");
        }
    }

    #[test]
    fn test_canonical_rotation_and_order() {
        let found = cycles_of(&[("c", "a"), ("a", "b"), ("b", "c"), ("x", "x"), ("b", "a")]);
        assert_eq!(
            found,
            vec![ids(&["x"]), ids(&["a", "b"]), ids(&["a", "b", "c"])]
        );
    }

    #[test]
    fn test_scope_hides_nested_edges() {
        let mut g = graph(&[("a", "b")]);
        g.add_edge(ImportEdge {
            from: "b".into(),
            to: "a".into(),
            line: 9,
            is_top_level: false,
        });
        assert!(detect(&g, EdgeScope::TopLevelOnly, 10).cycles.is_empty());
        assert_eq!(detect(&g, EdgeScope::All, 10).cycles, vec![ids(&["a", "b"])]);
    }

    #[test]
    fn test_limit_truncates_with_diagnostic() {
        let edges = [("a", "b"), ("b", "c"), ("c", "a"), ("a", "c"), ("c", "b"), ("b", "a")];
        let g = graph(&edges);

        let capped = detect(&g, EdgeScope::All, 2);
        assert_eq!(capped.cycles.len(), 2);
        assert_eq!(
            capped.diagnostics,
            vec![Diagnostic::EnumerationLimit {
                modules: ids(&["a", "b", "c"]),
                limit: 2,
            }]
        );
        assert_eq!(detect(&g, EdgeScope::All, 2), capped, "truncation is deterministic");

        let exact = detect(&g, EdgeScope::All, 5);
        assert_eq!(exact.cycles.len(), 5);
        assert!(exact.diagnostics.is_empty(), "hitting the cap exactly is not truncation");
    }

    #[test]
    fn test_cycle_rotation_and_hops() {
        let cycle = Cycle::new(ids(&["b", "c", "a"]));
        assert_eq!(cycle.modules, ids(&["a", "b", "c"]));
        assert_eq!(cycle.closed_path(), vec!["a", "b", "c", "a"]);
        let hops: Vec<(&str, &str)> = cycle.hops().collect();
        assert_eq!(hops, vec![("a", "b"), ("b", "c"), ("c", "a")]);
        assert!(cycle.is_critical(), "uncategorized counts as critical");

        let selfloop = Cycle::new(ids(&["solo"]));
        assert_eq!(selfloop.hops().collect::<Vec<_>>(), vec![("solo", "solo")]);
    }

    #[test]
    fn test_severity_omitted_when_unset() {
        let mut cycle = Cycle::new(ids(&["a", "b"]));
        let json = serde_json::to_value(&cycle).unwrap();
        assert!(json.get("severity").is_none());
        cycle.severity = Some(Severity::Benign);
        let json = serde_json::to_value(&cycle).unwrap();
        assert_eq!(json["severity"], "benign");
        assert_eq!(json["modules"], serde_json::json!(["a", "b"]));
    }
}
