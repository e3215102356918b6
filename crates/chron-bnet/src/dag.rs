//! Arrow extraction from chronicles and Graphviz `dot` rendering.
//!
//! # Look-back arrows
//!
//! A chronicle induces a DAG by joining every frame to the `memory_time`
//! frames just before it: for frame `i`, arrows `frame[i-1] → frame[i]`,
//! `frame[i-2] → frame[i]`, … down to `frame[i-memory_time]` (nearest first).
//!
//! # High-frequency arrows
//!
//! Over a whole library the arrows of every member are pooled and counted.
//! Arrows seen at least `min_freq` times form the high-frequency DAG, which
//! is the arrow set handed to [`BayesNet::fit`](crate::BayesNet::fit).

use std::collections::HashMap;
use std::fmt::Write as _;

use chron_core::Chronicle;
use serde::Serialize;

use crate::structure::Arrow;

/// Arrows from each frame to its `memory_time` predecessors.
#[must_use]
pub fn look_back_arrows(chronicle: &Chronicle, memory_time: usize) -> Vec<Arrow> {
    let frames = chronicle.frames();
    let mut arrows = Vec::new();
    for (i, frame) in frames.iter().enumerate() {
        for delta in 1..=memory_time {
            let Some(j) = i.checked_sub(delta) else {
                break;
            };
            arrows.push(Arrow::new(frames[j].as_str(), frame.as_str()));
        }
    }
    arrows
}

/// Arrow occurrence counts, kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArrowFrequencies {
    entries: Vec<(Arrow, usize)>,
    #[serde(skip)]
    index: HashMap<Arrow, usize>,
}

impl ArrowFrequencies {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool the look-back arrows of every chronicle.
    #[must_use]
    pub fn from_chronicles(chronicles: &[Chronicle], memory_time: usize) -> Self {
        let mut frequencies = Self::new();
        for chronicle in chronicles {
            frequencies.extend(look_back_arrows(chronicle, memory_time));
        }
        frequencies
    }

    pub fn record(&mut self, arrow: Arrow) {
        if let Some(&slot) = self.index.get(&arrow) {
            self.entries[slot].1 += 1;
        } else {
            self.index.insert(arrow.clone(), self.entries.len());
            self.entries.push((arrow, 1));
        }
    }

    #[must_use]
    pub fn count(&self, arrow: &Arrow) -> usize {
        self.index.get(arrow).map_or(0, |&slot| self.entries[slot].1)
    }

    /// `(arrow, count)` pairs in first-seen order.
    #[must_use]
    pub fn entries(&self) -> &[(Arrow, usize)] {
        &self.entries
    }

    /// Number of distinct arrows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Arrows seen at least `min_freq` times, in first-seen order.
    #[must_use]
    pub fn high_frequency_arrows(&self, min_freq: usize) -> Vec<Arrow> {
        self.entries
            .iter()
            .filter(|(_, count)| *count >= min_freq)
            .map(|(arrow, _)| arrow.clone())
            .collect()
    }

    /// `dot` source for the high-frequency DAG, each arrow labelled with its
    /// count.
    #[must_use]
    pub fn high_frequency_dot(&self, min_freq: usize) -> String {
        let mut dot = String::from("digraph {\n");
        for (arrow, count) in &self.entries {
            if *count >= min_freq {
                let _ = writeln!(dot, "{} -> {} [label={count}];", arrow.source, arrow.target);
            }
        }
        dot.push_str("}\n");
        dot
    }
}

impl Extend<Arrow> for ArrowFrequencies {
    fn extend<I: IntoIterator<Item = Arrow>>(&mut self, iter: I) {
        for arrow in iter {
            self.record(arrow);
        }
    }
}

impl FromIterator<Arrow> for ArrowFrequencies {
    fn from_iter<I: IntoIterator<Item = Arrow>>(iter: I) -> Self {
        let mut frequencies = Self::new();
        frequencies.extend(iter);
        frequencies
    }
}

/// `dot` source for one chronicle's look-back DAG.
#[must_use]
pub fn chronicle_dot(chronicle: &Chronicle, memory_time: usize) -> String {
    let mut dot = String::from("digraph {\n");
    for arrow in look_back_arrows(chronicle, memory_time) {
        let _ = writeln!(dot, "{} -> {};", arrow.source, arrow.target);
    }
    dot.push_str("}\n");
    dot
}

/// `dot` source drawing every chronicle of a library side by side.
///
/// Each chronicle becomes an anonymous subgraph; node names get a `_<i>`
/// suffix so equal frames in different chronicles stay distinct.
#[must_use]
pub fn library_dot(chronicles: &[Chronicle], memory_time: usize) -> String {
    let mut dot = String::from("digraph {\n");
    for (i, chronicle) in chronicles.iter().enumerate() {
        dot.push_str("subgraph {\n");
        for arrow in look_back_arrows(chronicle, memory_time) {
            let _ = writeln!(dot, "{}_{i} -> {}_{i};", arrow.source, arrow.target);
        }
        dot.push_str("}\n");
    }
    dot.push_str("}\n");
    dot
}
