//! Empirical conditional probability tables.
//!
//! # Estimation
//!
//! For a node `n` with parents `P` (`k = |P|`), the key space is every
//! binary tuple of length `k` in lexicographic order, the first parent being
//! the most significant bit. One pass over the dataset fills two count
//! tables:
//!
//! - `den[s]`: rows whose parent cells equal `s`
//! - `num[s][v]`: rows whose parent cells equal `s` and whose `n` cell is `v`
//!
//! Only after the pass are ratios taken: `P(n = v | s) = num[s][v] / den[s]`.
//!
//! # Edge cases
//!
//! - `den[s] == 0` (parent state never observed): both entries are
//!   [`Probability::Undefined`]. Callers decide whether to skip or treat the
//!   state as unknown.
//! - `k == 0`: the single entry holds the **raw counts** of `n = 0` and
//!   `n = 1` across all rows, as [`CptEntry::Counts`], not a normalized
//!   pair. No denominator is computed for this case.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::dataset::Dataset;
use crate::error::BnetError;
use crate::structure::Structure;

/// Upper bound on parents per node; the table has `2^k` rows.
pub const MAX_PARENTS: usize = 24;

/// One bit per parent, in parent-list order.
pub type ParentState = Vec<u8>;

// ---------------------------------------------------------------------------
// Probability
// ---------------------------------------------------------------------------

/// A conditional probability, or the marker for an unobserved parent state.
///
/// Serializes as a number, or `null` when undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "Option<f64>")]
pub enum Probability {
    Defined(f64),
    Undefined,
}

impl Probability {
    #[allow(clippy::cast_precision_loss)]
    fn ratio(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            Self::Undefined
        } else {
            Self::Defined(numerator as f64 / denominator as f64)
        }
    }

    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Defined(p) => Some(p),
            Self::Undefined => None,
        }
    }

    #[must_use]
    pub const fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl From<Probability> for Option<f64> {
    fn from(probability: Probability) -> Self {
        probability.value()
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(p) => write!(f, "{p:.3}"),
            Self::Undefined => f.write_str("undefined"),
        }
    }
}

// ---------------------------------------------------------------------------
// CptEntry / CptRow / Cpt
// ---------------------------------------------------------------------------

/// The 2-element vector stored for one parent state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum CptEntry {
    /// Raw counts of the node being 0 and 1. Only used when the node has no
    /// parents; these are not probabilities.
    Counts([u64; 2]),
    /// `P(node = 0 | state)` and `P(node = 1 | state)`.
    Conditional([Probability; 2]),
}

impl CptEntry {
    #[must_use]
    pub const fn counts(&self) -> Option<[u64; 2]> {
        match self {
            Self::Counts(counts) => Some(*counts),
            Self::Conditional(_) => None,
        }
    }

    #[must_use]
    pub const fn probabilities(&self) -> Option<[Probability; 2]> {
        match self {
            Self::Conditional(probs) => Some(*probs),
            Self::Counts(_) => None,
        }
    }

    /// `true` when the parent state behind this entry was never observed.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Conditional(probs) if probs.iter().any(|p| p.is_undefined()))
    }
}

impl fmt::Display for CptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counts([zero, one]) => write!(f, "counts [{zero}, {one}]"),
            Self::Conditional([zero, one]) => write!(f, "[{zero}, {one}]"),
        }
    }
}

/// A parent state and its entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CptRow {
    pub state: ParentState,
    pub entry: CptEntry,
}

/// The conditional table of a single node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cpt {
    node: String,
    parents: Vec<String>,
    rows: Vec<CptRow>,
}

impl Cpt {
    #[must_use]
    pub fn node(&self) -> &str {
        &self.node
    }

    #[must_use]
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Rows in lexicographic parent-state order; always `2^k` of them.
    #[must_use]
    pub fn rows(&self) -> &[CptRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always `false`; even a parentless node has one row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up the entry for a full parent state.
    ///
    /// Returns `None` for a state of the wrong length or with a non-binary
    /// component; partial keys are never valid.
    #[must_use]
    pub fn get(&self, state: &[u8]) -> Option<&CptEntry> {
        if state.len() != self.parents.len() || state.iter().any(|&bit| bit > 1) {
            return None;
        }
        let idx = state
            .iter()
            .fold(0_usize, |acc, &bit| (acc << 1) | usize::from(bit));
        self.rows.get(idx).map(|row| &row.entry)
    }

    /// Parent states that never occurred in the data.
    #[must_use]
    pub fn undefined_states(&self) -> Vec<&ParentState> {
        self.rows
            .iter()
            .filter(|row| row.entry.is_undefined())
            .map(|row| &row.state)
            .collect()
    }
}

impl fmt::Display for Cpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "  {} -> {}", format_state(&row.state), row.entry)?;
        }
        Ok(())
    }
}

/// `(0, 1, 1)`-style rendering of a parent state; `()` when empty.
#[must_use]
pub fn format_state(state: &[u8]) -> String {
    let bits: Vec<String> = state.iter().map(ToString::to_string).collect();
    format!("({})", bits.join(", "))
}

// ---------------------------------------------------------------------------
// Estimation
// ---------------------------------------------------------------------------

/// Every binary tuple of length `k`, in lexicographic order.
pub fn parent_states(k: usize) -> impl Iterator<Item = ParentState> {
    (0..(1_usize << k)).map(move |idx| {
        (0..k)
            .map(|bit| u8::from((idx >> (k - 1 - bit)) & 1 == 1))
            .collect()
    })
}

/// Estimate the CPT of `node` given its `parents`.
///
/// # Errors
///
/// Returns [`BnetError::MissingColumn`] if `node` or a parent has no column
/// and [`BnetError::TooManyParents`] above [`MAX_PARENTS`].
pub fn estimate_cpt(node: &str, parents: &[String], dataset: &Dataset) -> Result<Cpt, BnetError> {
    let k = parents.len();
    if k > MAX_PARENTS {
        return Err(BnetError::TooManyParents {
            node: node.to_string(),
            parents: k,
        });
    }

    let own = dataset.require(node)?;
    let parent_columns = parents
        .iter()
        .map(|parent| dataset.require(parent))
        .collect::<Result<Vec<_>, _>>()?;

    let rows = if k == 0 {
        let mut counts = [0_u64; 2];
        for &value in own {
            counts[usize::from(value)] += 1;
        }
        vec![CptRow {
            state: Vec::new(),
            entry: CptEntry::Counts(counts),
        }]
    } else {
        let states = 1_usize << k;
        let mut den = vec![0_u64; states];
        let mut num = vec![[0_u64; 2]; states];

        for (row, &value) in own.iter().enumerate() {
            let idx = parent_columns
                .iter()
                .fold(0_usize, |acc, column| (acc << 1) | usize::from(column[row]));
            den[idx] += 1;
            num[idx][usize::from(value)] += 1;
        }

        parent_states(k)
            .enumerate()
            .map(|(idx, state)| {
                if den[idx] == 0 {
                    warn!(
                        node,
                        state = %format_state(&state),
                        "parent state never observed; probability undefined"
                    );
                }
                let entry = CptEntry::Conditional([
                    Probability::ratio(num[idx][0], den[idx]),
                    Probability::ratio(num[idx][1], den[idx]),
                ]);
                CptRow { state, entry }
            })
            .collect()
    };

    debug!(node, parents = k, rows = dataset.rows(), "estimated cpt");

    Ok(Cpt {
        node: node.to_string(),
        parents: parents.to_vec(),
        rows,
    })
}

/// Estimate a CPT for every node of `structure`, independently per node.
///
/// # Errors
///
/// Returns the first [`BnetError`] from [`estimate_cpt`].
pub fn fit(structure: &Structure, dataset: &Dataset) -> Result<BTreeMap<String, Cpt>, BnetError> {
    structure
        .iter()
        .map(|(node, parents)| {
            estimate_cpt(node, parents, dataset).map(|cpt| (node.to_string(), cpt))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
