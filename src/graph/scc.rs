// src/graph/scc.rs
//! Strongly connected components (Tarjan, explicit stack).

use super::types::Adjacency;

/// Returns the components of `adj` as sorted index lists, ordered by their
/// smallest member.
#[must_use]
pub fn strongly_connected(adj: &Adjacency) -> Vec<Vec<usize>> {
    let mut state = TarjanState::new(adj.len());
    for start in 0..adj.len() {
        if state.index[start].is_none() {
            state.run_from(adj, start);
        }
    }
    let mut components = state.components;
    for comp in &mut components {
        comp.sort_unstable();
    }
    components.sort_by_key(|c| c.first().copied());
    components
}

/// Components that can hold a cycle: more than one node, or one node
/// importing itself.
#[must_use]
pub fn nontrivial(adj: &Adjacency) -> Vec<Vec<usize>> {
    strongly_connected(adj)
        .into_iter()
        .filter(|comp| is_nontrivial(adj, comp))
        .collect()
}

#[must_use]
pub fn is_nontrivial(adj: &Adjacency, comp: &[usize]) -> bool {
    match comp {
        [] => false,
        [only] => adj.has_self_loop(*only),
        _ => true,
    }
}

struct TarjanState {
    next_index: usize,
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    components: Vec<Vec<usize>>,
}

impl TarjanState {
    fn new(n: usize) -> Self {
        Self {
            next_index: 0,
            index: vec![None; n],
            lowlink: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            components: Vec::new(),
        }
    }

    fn visit(&mut self, v: usize) {
        self.index[v] = Some(self.next_index);
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
    }

    /// Frames are `(node, next successor position)`.
    fn run_from(&mut self, adj: &Adjacency, start: usize) {
        let mut frames: Vec<(usize, usize)> = vec![(start, 0)];
        self.visit(start);

        while let Some(frame) = frames.last_mut() {
            let v = frame.0;
            if let Some(&w) = adj.successors[v].get(frame.1) {
                frame.1 += 1;
                match self.index[w] {
                    None => {
                        self.visit(w);
                        frames.push((w, 0));
                    }
                    Some(w_index) if self.on_stack[w] => {
                        self.lowlink[v] = self.lowlink[v].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[v]);
            }
            if Some(self.lowlink[v]) == self.index[v] {
                self.pop_component(v);
            }
        }
    }

    fn pop_component(&mut self, root: usize) {
        let mut comp = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            comp.push(w);
            if w == root {
                break;
            }
        }
        self.components.push(comp);
    }
}
