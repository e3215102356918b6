//! Arrows, the node set they span, and the parent map they induce.
//!
//! # Node order
//!
//! Nodes are listed in first-seen order while scanning the arrows, source
//! before target within each arrow. Parents are listed in first-seen order
//! too, without repeats. Both are fixed once the [`Structure`] is built.
//!
//! # Cycles
//!
//! The estimator never walks the graph, so a cyclic arrow set still yields
//! well-defined counting tables. [`Structure::cycles`] exists so callers can
//! warn about arrow sets that are not DAGs.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Arrow
// ---------------------------------------------------------------------------

/// A directed dependency `source → target` between two named variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Arrow {
    pub source: String,
    pub target: String,
}

impl Arrow {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl From<(&str, &str)> for Arrow {
    fn from((source, target): (&str, &str)) -> Self {
        Self::new(source, target)
    }
}

impl fmt::Display for Arrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

// ---------------------------------------------------------------------------
// Structure
// ---------------------------------------------------------------------------

/// Node set and parent map derived once from a list of arrows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Structure {
    nodes: Vec<String>,
    parents: BTreeMap<String, Vec<String>>,
}

impl Structure {
    /// Scan `arrows` once, collecting nodes and each node's parents.
    #[must_use]
    pub fn from_arrows(arrows: &[Arrow]) -> Self {
        let mut nodes: Vec<String> = Vec::new();
        let mut parents: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for arrow in arrows {
            for endpoint in [&arrow.source, &arrow.target] {
                if !parents.contains_key(endpoint) {
                    nodes.push(endpoint.clone());
                    parents.insert(endpoint.clone(), Vec::new());
                }
            }

            if let Some(list) = parents.get_mut(&arrow.target) {
                if !list.contains(&arrow.source) {
                    list.push(arrow.source.clone());
                }
            }
        }

        Self { nodes, parents }
    }

    /// Nodes in first-seen order.
    #[must_use]
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Parents of `node` in first-seen order, or `None` for an unknown node.
    #[must_use]
    pub fn parents(&self, node: &str) -> Option<&[String]> {
        self.parents.get(node).map(Vec::as_slice)
    }

    /// `(node, parents)` pairs in node order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.nodes.iter().map(|node| {
            let parents = self.parents.get(node).map_or(&[][..], Vec::as_slice);
            (node.as_str(), parents)
        })
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct `(parent, child)` pairs.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.parents.values().map(Vec::len).sum()
    }

    /// Build a petgraph view of the structure (`parent → child` edges).
    #[must_use]
    pub fn to_graph(&self) -> DiGraph<String, ()> {
        let mut graph = DiGraph::<String, ()>::new();
        let mut node_map: HashMap<&str, NodeIndex> = HashMap::with_capacity(self.nodes.len());

        for node in &self.nodes {
            node_map.insert(node.as_str(), graph.add_node(node.clone()));
        }

        for (child, parents) in self.iter() {
            let child_idx = node_map[child];
            for parent in parents {
                graph.add_edge(node_map[parent.as_str()], child_idx, ());
            }
        }

        graph
    }

    /// Strongly connected components that form cycles, each sorted by name.
    ///
    /// Self-loops are reported as one-element cycles. Empty for a DAG.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let graph = self.to_graph();
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&node| graph.contains_edge(node, node))
            })
            .map(|component| {
                let mut names: Vec<String> =
                    component.into_iter().map(|idx| graph[idx].clone()).collect();
                names.sort_unstable();
                names
            })
            .collect();

        cycles.sort_unstable();
        cycles
    }

    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        self.cycles().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
