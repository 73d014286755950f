// src/graph/types.rs
//! Core types for import-cycle analysis.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// A scanned, project-internal Python module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub id: String,
    pub path: PathBuf,
    /// True for a package `__init__.py`.
    pub is_package: bool,
}

impl Module {
    /// The package relative imports in this module resolve against.
    #[must_use]
    pub fn package(&self) -> &str {
        if self.is_package {
            return &self.id;
        }
        self.id.rsplit_once('.').map_or("", |(parent, _)| parent)
    }
}

/// `from` imports `to` at `line`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ImportEdge {
    pub from: String,
    pub to: String,
    pub line: usize,
    /// False when the import sits inside a function or method body.
    #[serde(rename = "top_level")]
    pub is_top_level: bool,
}

/// Which edges an adjacency view is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeScope {
    All,
    /// Only imports that run at module load time.
    TopLevelOnly,
}

impl EdgeScope {
    #[must_use]
    pub fn for_strict(strict: bool) -> Self {
        if strict {
            Self::All
        } else {
            Self::TopLevelOnly
        }
    }

    #[must_use]
    pub fn admits(self, edge: &ImportEdge) -> bool {
        match self {
            Self::All => true,
            Self::TopLevelOnly => edge.is_top_level,
        }
    }
}

/// Index-based adjacency view used by the graph algorithms.
///
/// `nodes` is sorted by module id, so index order is id order. Every
/// successor list is sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency {
    pub nodes: Vec<String>,
    pub successors: Vec<Vec<usize>>,
}

impl Adjacency {
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn has_self_loop(&self, node: usize) -> bool {
        self.successors
            .get(node)
            .is_some_and(|succ| succ.binary_search(&node).is_ok())
    }
}

/// Modules plus the full multiset of import edges between them.
///
/// Built fresh for every run and handed through the pipeline by reference.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    modules: BTreeMap<String, Module>,
    edges: Vec<ImportEdge>,
}

impl DependencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module. Returns false if the id was already taken.
    pub fn add_module(&mut self, module: Module) -> bool {
        if self.modules.contains_key(&module.id) {
            return false;
        }
        self.modules.insert(module.id.clone(), module);
        true
    }

    /// Records an edge. Edges touching unknown modules are refused.
    pub fn add_edge(&mut self, edge: ImportEdge) -> bool {
        if !self.modules.contains_key(&edge.from) || !self.modules.contains_key(&edge.to) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    #[must_use]
    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    /// Modules in id order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    #[must_use]
    pub fn edges(&self) -> &[ImportEdge] {
        &self.edges
    }

    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All recorded edges `from -> to`, in line order.
    #[must_use]
    pub fn edges_between(&self, from: &str, to: &str) -> Vec<&ImportEdge> {
        let mut found: Vec<&ImportEdge> = self
            .edges
            .iter()
            .filter(|e| e.from == from && e.to == to)
            .collect();
        found.sort_by_key(|e| e.line);
        found
    }

    /// Deduplicated `from -> {to}` view over the edges `scope` admits.
    /// Every module appears as a key.
    #[must_use]
    pub fn targets(&self, scope: EdgeScope) -> BTreeMap<&str, BTreeSet<&str>> {
        let mut view: BTreeMap<&str, BTreeSet<&str>> = self
            .modules
            .keys()
            .map(|id| (id.as_str(), BTreeSet::new()))
            .collect();
        for edge in self.edges.iter().filter(|e| scope.admits(e)) {
            view.entry(edge.from.as_str())
                .or_default()
                .insert(edge.to.as_str());
        }
        view
    }

    /// Index-based form of [`Self::targets`].
    #[must_use]
    pub fn adjacency(&self, scope: EdgeScope) -> Adjacency {
        let nodes: Vec<String> = self.modules.keys().cloned().collect();
        let index: BTreeMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let successors = self
            .targets(scope)
            .values()
            .map(|targets| {
                targets
                    .iter()
                    .filter_map(|t| index.get(t).copied())
                    .collect()
            })
            .collect();

        Adjacency { nodes, successors }
    }

    /// Number of distinct other modules importing each module.
    #[must_use]
    pub fn in_degrees(&self, scope: EdgeScope) -> BTreeMap<String, usize> {
        let mut importers: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for edge in self.edges.iter().filter(|e| scope.admits(e)) {
            if edge.from != edge.to {
                importers
                    .entry(edge.to.as_str())
                    .or_default()
                    .insert(edge.from.as_str());
            }
        }
        importers
            .into_iter()
            .map(|(id, set)| (id.to_string(), set.len()))
            .collect()
    }
}
