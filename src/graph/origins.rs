// src/graph/origins.rs
//! Ranks the modules most likely to be the root cause of the reported cycles.

use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;

use super::cycles::{Cycle, Severity};

/// A module seen in at least one cycle, with the numbers behind its rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OriginCandidate {
    pub module: String,
    pub critical_cycles: usize,
    pub benign_cycles: usize,
    /// Distinct importers in the analysed view of the graph.
    pub in_degree: usize,
    pub score: usize,
}

impl OriginCandidate {
    fn new(module: String, critical: usize, benign: usize, in_degree: usize) -> Self {
        Self {
            module,
            critical_cycles: critical,
            benign_cycles: benign,
            in_degree,
            score: 2 * critical + benign + in_degree,
        }
    }

    #[must_use]
    pub fn in_critical_cycle(&self) -> bool {
        self.critical_cycles > 0
    }
}

/// Orders every cycle member: critical participants first, then by score,
/// then by id.
///
/// `in_degrees` maps module ids to their importer counts; missing ids count
/// as zero.
#[must_use]
pub fn rank(cycles: &[Cycle], in_degrees: &BTreeMap<String, usize>) -> Vec<OriginCandidate> {
    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for cycle in cycles {
        // A cycle lists each module once, so per-cycle counting is distinct.
        for module in &cycle.modules {
            let entry = counts.entry(module.as_str()).or_default();
            match cycle.severity() {
                Severity::Critical => entry.0 += 1,
                Severity::Benign => entry.1 += 1,
            }
        }
    }

    let mut ranked: Vec<OriginCandidate> = counts
        .into_iter()
        .map(|(id, (critical, benign))| {
            let in_degree = in_degrees.get(id).copied().unwrap_or(0);
            OriginCandidate::new(id.to_string(), critical, benign, in_degree)
        })
        .collect();

    ranked.sort_by(|a, b| {
        (Reverse(a.in_critical_cycle()), Reverse(a.score), &a.module).cmp(&(
            Reverse(b.in_critical_cycle()),
            Reverse(b.score),
            &b.module,
        ))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(ids: &[&str], severity: Severity) -> Cycle {
        let mut c = Cycle::new(ids.iter().map(ToString::to_string).collect());
        c.severity = Some(severity);
        c
    }

    fn degrees(list: &[(&str, usize)]) -> BTreeMap<String, usize> {
        list.iter().map(|(id, n)| ((*id).to_string(), *n)).collect()
    }

    fn order(ranked: &[OriginCandidate]) -> Vec<&str> {
        ranked.iter().map(|c| c.module.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(&[], &BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_in_degree_breaks_ties_then_id() {
        let cycles = [cycle(&["a", "b", "c"], Severity::Critical)];
        let ranked = rank(&cycles, &degrees(&[("a", 1), ("b", 3), ("c", 1)]));
        assert_eq!(order(&ranked), vec!["b", "a", "c"]);
        assert_eq!(ranked[0].score, 2 + 3);
    }

    #[test]
    fn test_critical_members_rank_before_benign_only() {
        let cycles = [
            cycle(&["a", "b"], Severity::Critical),
            cycle(&["hub", "x"], Severity::Benign),
        ];
        let ranked = rank(&cycles, &degrees(&[("hub", 40), ("x", 1), ("a", 1), ("b", 1)]));
        assert_eq!(order(&ranked), vec!["a", "b", "hub", "x"]);
        assert!(ranked[0].in_critical_cycle());
        assert!(!ranked[2].in_critical_cycle());
    }

    #[test]
    fn test_shared_member_accumulates() {
        let cycles = [
            cycle(&["a", "b"], Severity::Critical),
            cycle(&["b", "c"], Severity::Critical),
            cycle(&["b", "d"], Severity::Benign),
        ];
        let ranked = rank(&cycles, &BTreeMap::new());
        assert_eq!(ranked[0].module, "b");
        assert_eq!((ranked[0].critical_cycles, ranked[0].benign_cycles), (2, 1));
        assert_eq!(ranked[0].score, 5);
    }
}
