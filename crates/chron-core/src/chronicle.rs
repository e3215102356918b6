//! Frames, chronicles, and the time-compatible order between chronicles.
//!
//! # The order relation
//!
//! `a < b` holds when the frames of `a` are a *proper* subset of the frames
//! of `b` **and** `b`, restricted to the frames of `a`, lists them in
//! exactly `a`'s order. In other words `a` is an order-preserving proper
//! sub-sequence of `b`.
//!
//! Chronicles with equal frame sets are incomparable, as is any `a` whose
//! frame set contains `b`'s. The relation is irreflexive and antisymmetric;
//! it is only ever evaluated pairwise, so transitivity is never relied on.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Errors raised when constructing a [`Chronicle`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChronicleError {
    /// A chronicle must contain at least one frame.
    #[error("chronicle must contain at least one frame")]
    Empty,

    /// A frame label appeared twice in the same chronicle.
    #[error("frame {frame} occurs more than once in the chronicle")]
    RepeatedFrame { frame: Frame },
}

impl ChronicleError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Empty => ErrorCode::EmptyChronicle,
            Self::RepeatedFrame { .. } => ErrorCode::RepeatedFrame,
        }
    }
}

/// One discrete event occurrence, e.g. `X4` for "X plays position 4".
///
/// Frames are opaque to the library builder: they are only compared for
/// equality and hashed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frame(String);

impl Frame {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Frame {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Frame {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// A non-empty, chronologically ordered sequence of distinct frames.
///
/// Chronicles are immutable once built. Deserialization goes through
/// [`Chronicle::new`], so a JSON array with a repeated or missing frame is
/// rejected rather than silently accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Frame>", into = "Vec<Frame>")]
pub struct Chronicle {
    frames: Vec<Frame>,
}

impl Chronicle {
    /// Build a chronicle from its frames in chronological order.
    ///
    /// # Errors
    ///
    /// Returns [`ChronicleError::Empty`] for an empty frame list and
    /// [`ChronicleError::RepeatedFrame`] if any label occurs twice.
    pub fn new(frames: Vec<Frame>) -> Result<Self, ChronicleError> {
        if frames.is_empty() {
            return Err(ChronicleError::Empty);
        }

        let mut seen = HashSet::with_capacity(frames.len());
        for frame in &frames {
            if !seen.insert(frame) {
                return Err(ChronicleError::RepeatedFrame {
                    frame: frame.clone(),
                });
            }
        }

        Ok(Self { frames })
    }

    /// Convenience constructor from anything string-like.
    ///
    /// # Errors
    ///
    /// Same as [`Chronicle::new`].
    pub fn from_labels<I, S>(labels: I) -> Result<Self, ChronicleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(labels.into_iter().map(Frame::new).collect())
    }

    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn contains(&self, frame: &Frame) -> bool {
        self.frames.contains(frame)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// The set of frame labels, ignoring order.
    #[must_use]
    pub fn frame_set(&self) -> HashSet<&Frame> {
        self.frames.iter().collect()
    }

    /// `self < other` under the time-compatible order. See [`is_smaller`].
    #[must_use]
    pub fn is_smaller_than(&self, other: &Self) -> bool {
        is_smaller(self, other)
    }
}

impl<'a> IntoIterator for &'a Chronicle {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

impl TryFrom<Vec<Frame>> for Chronicle {
    type Error = ChronicleError;

    fn try_from(frames: Vec<Frame>) -> Result<Self, Self::Error> {
        Self::new(frames)
    }
}

impl From<Chronicle> for Vec<Frame> {
    fn from(chronicle: Chronicle) -> Self {
        chronicle.frames
    }
}

impl fmt::Display for Chronicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{frame}")?;
        }
        f.write_str("]")
    }
}

/// Return `true` iff `a < b`: `a`'s frames are a proper subset of `b`'s and
/// appear in `b` in the same relative order as in `a`.
#[must_use]
pub fn is_smaller(a: &Chronicle, b: &Chronicle) -> bool {
    let a_set = a.frame_set();
    let b_set = b.frame_set();

    // Superset also covers equal frame sets, which rules out a < a.
    if a_set.is_superset(&b_set) {
        return false;
    }

    b.frames
        .iter()
        .filter(|frame| a_set.contains(frame))
        .eq(a.frames.iter())
}
