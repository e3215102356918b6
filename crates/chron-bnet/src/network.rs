//! A fitted network: arrows, the structure they induce, and one CPT per node.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::cpt::{self, Cpt, ParentState};
use crate::dataset::Dataset;
use crate::error::BnetError;
use crate::structure::{Arrow, Structure};

/// Node set, parent map, and CPTs fitted from a fixed arrow set.
///
/// Nothing here is mutated after [`BayesNet::fit`] returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BayesNet {
    arrows: Vec<Arrow>,
    structure: Structure,
    cpts: BTreeMap<String, Cpt>,
}

impl BayesNet {
    /// Derive nodes and parents from `arrows`, then estimate every node's CPT
    /// from `dataset`.
    ///
    /// A cyclic arrow set is logged but still fitted; estimation only counts
    /// rows and never walks the graph.
    ///
    /// # Errors
    ///
    /// Returns a [`BnetError`] when an arrow endpoint has no dataset column
    /// or a node has more than [`cpt::MAX_PARENTS`] parents.
    #[instrument(skip_all, fields(arrows = arrows.len(), rows = dataset.rows()))]
    pub fn fit(arrows: Vec<Arrow>, dataset: &Dataset) -> Result<Self, BnetError> {
        let structure = Structure::from_arrows(&arrows);

        let cycles = structure.cycles();
        if !cycles.is_empty() {
            warn!(?cycles, "arrow set contains cycles");
        }

        let cpts = cpt::fit(&structure, dataset)?;

        let undefined: usize = cpts.values().map(|c| c.undefined_states().len()).sum();
        info!(
            nodes = structure.node_count(),
            edges = structure.edge_count(),
            undefined_states = undefined,
            "fitted conditional probability tables"
        );

        Ok(Self {
            arrows,
            structure,
            cpts,
        })
    }

    #[must_use]
    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    #[must_use]
    pub const fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Nodes in first-seen order.
    #[must_use]
    pub fn nodes(&self) -> &[String] {
        self.structure.nodes()
    }

    #[must_use]
    pub fn parents(&self, node: &str) -> Option<&[String]> {
        self.structure.parents(node)
    }

    #[must_use]
    pub fn cpt(&self, node: &str) -> Option<&Cpt> {
        self.cpts.get(node)
    }

    #[must_use]
    pub const fn cpts(&self) -> &BTreeMap<String, Cpt> {
        &self.cpts
    }

    /// Every `(node, parent state)` whose probability is undefined.
    #[must_use]
    pub fn undefined_entries(&self) -> Vec<(&str, &ParentState)> {
        self.structure
            .nodes()
            .iter()
            .filter_map(|node| self.cpts.get(node))
            .flat_map(|cpt| {
                cpt.undefined_states()
                    .into_iter()
                    .map(move |state| (cpt.node(), state))
            })
            .collect()
    }
}

/// Human-readable report: per node, its name, its parents, and its CPT.
impl fmt::Display for BayesNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (node, parents)) in self.structure.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "node: {node}")?;
            writeln!(f, "parents: [{}]", parents.join(", "))?;
            if let Some(cpt) = self.cpts.get(node) {
                write!(f, "{cpt}")?;
            }
        }
        Ok(())
    }
}
