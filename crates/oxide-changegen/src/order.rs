//! Global kind ordering.
//!
//! Each registered generator contributes edges to a graph over object kinds:
//! `K -> B` for every `B` in its `run_before` list and `A -> K` for every `A`
//! in its `run_after` list, where `K` ranges over the kinds it claims. The
//! graph is sorted once with Kahn's algorithm. Ready kinds are taken in the
//! order they were first seen while scanning the registry, so the same
//! registry always yields the same order.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::error::{ChangeGenError, Result};
use crate::kind::ObjectKind;
use crate::registry::GeneratorRegistry;

/// The resolved processing order of object kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindOrder {
    kinds: Vec<ObjectKind>,
}

#[derive(Default)]
struct KindGraph {
    nodes: Vec<ObjectKind>,
    index: HashMap<ObjectKind, usize>,
    // (from, to) -> generators that declared the edge
    edges: BTreeMap<(usize, usize), Vec<String>>,
}

impl KindGraph {
    fn node(&mut self, kind: ObjectKind) -> usize {
        if let Some(&idx) = self.index.get(&kind) {
            return idx;
        }
        self.nodes.push(kind);
        self.index.insert(kind, self.nodes.len() - 1);
        self.nodes.len() - 1
    }

    fn edge(&mut self, from: ObjectKind, to: ObjectKind, declared_by: &str) {
        // A kind is trivially ordered relative to itself.
        if from == to {
            return;
        }
        let from = self.node(from);
        let to = self.node(to);
        let names = self.edges.entry((from, to)).or_default();
        if !names.iter().any(|n| n == declared_by) {
            names.push(declared_by.to_string());
        }
    }

    fn build(registry: &GeneratorRegistry) -> Self {
        let mut graph = Self::default();

        for generator in registry.generators() {
            let own: Vec<ObjectKind> = generator.own_kinds().collect();
            for &kind in &own {
                graph.node(kind);
            }
            for &kind in generator.run_after() {
                graph.node(kind);
            }
            for &kind in generator.run_before() {
                graph.node(kind);
            }

            for &kind in &own {
                for &after in generator.run_after() {
                    graph.edge(after, kind, generator.name());
                }
                for &before in generator.run_before() {
                    graph.edge(kind, before, generator.name());
                }
            }
        }

        graph
    }

    fn sort(&self) -> Result<Vec<ObjectKind>> {
        let mut in_degree = vec![0usize; self.nodes.len()];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for &(from, to) in self.edges.keys() {
            in_degree[to] += 1;
            successors[from].push(to);
        }

        // Kahn's algorithm, smallest first-seen index first
        let mut ready: BTreeSet<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, deg)| **deg == 0)
            .map(|(idx, _)| idx)
            .collect();
        let mut result = Vec::with_capacity(self.nodes.len());

        while let Some(idx) = ready.pop_first() {
            result.push(self.nodes[idx]);
            for &next in &successors[idx] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.insert(next);
                }
            }
        }

        if result.len() != self.nodes.len() {
            return Err(self.cycle_error(&in_degree));
        }

        Ok(result)
    }

    /// Builds an error naming one concrete cycle among the unsorted kinds.
    ///
    /// Every unsorted kind still has an incoming edge from another unsorted
    /// kind, so walking predecessors must eventually revisit a kind.
    fn cycle_error(&self, in_degree: &[usize]) -> ChangeGenError {
        let remaining: BTreeSet<usize> = (0..self.nodes.len())
            .filter(|&idx| in_degree[idx] > 0)
            .collect();

        let predecessor = |idx: usize| {
            self.edges
                .keys()
                .find(|(from, to)| *to == idx && remaining.contains(from))
                .map(|(from, _)| *from)
        };

        let mut walk: Vec<usize> = Vec::new();
        let mut current = remaining.first().copied();
        while let Some(idx) = current {
            if let Some(pos) = walk.iter().position(|&seen| seen == idx) {
                walk.drain(..pos);
                break;
            }
            walk.push(idx);
            current = predecessor(idx);
        }

        // The walk followed edges backwards.
        walk.reverse();
        if let Some(&first) = walk.first() {
            walk.push(first);
        }

        let mut declared_by: Vec<String> = Vec::new();
        for pair in walk.windows(2) {
            if let Some(names) = self.edges.get(&(pair[0], pair[1])) {
                for name in names {
                    if !declared_by.contains(name) {
                        declared_by.push(name.clone());
                    }
                }
            }
        }

        ChangeGenError::OrderingCycle {
            cycle: walk.into_iter().map(|idx| self.nodes[idx]).collect(),
            declared_by,
        }
    }
}

impl KindOrder {
    /// Resolves the kind order for every generator in the registry.
    ///
    /// Fails with [`ChangeGenError::OrderingCycle`] when the generators'
    /// declarations contradict each other.
    pub fn resolve(registry: &GeneratorRegistry) -> Result<Self> {
        let graph = KindGraph::build(registry);
        let kinds = graph.sort()?;
        debug!(
            order = %kinds.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
            "Resolved kind order"
        );
        Ok(Self { kinds })
    }

    /// Kinds in processing order.
    #[must_use]
    pub fn kinds(&self) -> &[ObjectKind] {
        &self.kinds
    }

    /// Position of a kind, or `None` if no generator mentions it.
    #[must_use]
    pub fn position(&self, kind: ObjectKind) -> Option<usize> {
        self.kinds.iter().position(|k| *k == kind)
    }
}
