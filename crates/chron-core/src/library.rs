//! Incremental construction of time-compatible libraries.
//!
//! # Overview
//!
//! A *time-compatible library* is an ordered list of chronicles whose first
//! element, the **head**, is meant to be the largest one: every other member
//! `m` satisfies `m < head`. Members other than the head are never compared
//! with each other.
//!
//! [`LibraryCollection::classify`] places one new chronicle `c` at a time:
//!
//! ```text
//! collection empty?            → open [c]; done
//! for each library L, in order:
//!     c == some member of L    → count a duplicate, leave L untouched
//!     else c < head(L)         → append c to L, mark c homed (keep scanning)
//! c never homed?               → open [c] at the end of the collection
//! ```
//!
//! ## Ordering dependency
//!
//! Each placement depends on every chronicle classified before it, so the
//! same multiset of chronicles fed in two different orders can produce two
//! different collections. A chronicle can also land in several libraries,
//! or be a duplicate in one library and still open a new one. Both are
//! expected output, not errors.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::chronicle::{Chronicle, ChronicleError};

// ---------------------------------------------------------------------------
// Library
// ---------------------------------------------------------------------------

/// A non-empty list of chronicles headed by its first member.
///
/// The head is fixed when the library is opened and is never replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Library {
    members: Vec<Chronicle>,
}

impl Library {
    fn open(head: Chronicle) -> Self {
        Self {
            members: vec![head],
        }
    }

    /// The library's head (its intended maximal element).
    #[must_use]
    pub fn head(&self) -> &Chronicle {
        &self.members[0]
    }

    /// All members, head first, then in arrival order.
    #[must_use]
    pub fn members(&self) -> &[Chronicle] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; a library is opened with its head.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `chronicle` is element-for-element equal to any member.
    #[must_use]
    pub fn contains(&self, chronicle: &Chronicle) -> bool {
        self.members.iter().any(|member| member == chronicle)
    }

    /// Whether `chronicle < head`, i.e. it may join this library.
    #[must_use]
    pub fn admits(&self, chronicle: &Chronicle) -> bool {
        chronicle.is_smaller_than(self.head())
    }

    fn push(&mut self, chronicle: Chronicle) {
        self.members.push(chronicle);
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Where a single chronicle ended up after [`LibraryCollection::classify`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Libraries that already held an identical chronicle.
    pub duplicate_in: Vec<usize>,
    /// Libraries the chronicle was appended to.
    pub homed_in: Vec<usize>,
    /// Index of the singleton library opened for the chronicle, if any.
    pub new_library: Option<usize>,
}

impl Classification {
    /// `true` if the chronicle matched an existing member somewhere.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        !self.duplicate_in.is_empty()
    }

    /// `true` if the chronicle was appended to at least one existing library.
    #[must_use]
    pub fn is_homed(&self) -> bool {
        !self.homed_in.is_empty()
    }
}

// ---------------------------------------------------------------------------
// LibraryCollection
// ---------------------------------------------------------------------------

/// The ordered list of libraries built so far plus the duplicate counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LibraryCollection {
    libraries: Vec<Library>,
    duplicates: usize,
}

impl LibraryCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `chronicle` into every library whose head dominates it, or open
    /// a new library for it if none does.
    ///
    /// Every library is visited; there is no early exit. A duplicate match
    /// in one library bumps [`duplicates`](Self::duplicates) once for that
    /// library and does not count as finding a home.
    pub fn classify(&mut self, chronicle: Chronicle) -> Classification {
        let mut outcome = Classification::default();

        if self.libraries.is_empty() {
            self.libraries.push(Library::open(chronicle));
            outcome.new_library = Some(0);
            return outcome;
        }

        let mut homed = false;
        for (index, library) in self.libraries.iter_mut().enumerate() {
            if library.contains(&chronicle) {
                self.duplicates += 1;
                outcome.duplicate_in.push(index);
            } else if library.admits(&chronicle) {
                library.push(chronicle.clone());
                homed = true;
                outcome.homed_in.push(index);
            }
        }

        if !homed {
            outcome.new_library = Some(self.libraries.len());
            self.libraries.push(Library::open(chronicle));
        }

        debug!(
            duplicate_in = ?outcome.duplicate_in,
            homed_in = ?outcome.homed_in,
            new_library = ?outcome.new_library,
            "classified chronicle"
        );

        outcome
    }

    #[must_use]
    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    /// Number of duplicate occurrences seen so far (one per matching library).
    #[must_use]
    pub const fn duplicates(&self) -> usize {
        self.duplicates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    #[must_use]
    pub fn into_libraries(self) -> Vec<Library> {
        self.libraries
    }

    /// Library length → number of libraries with that length.
    #[must_use]
    pub fn length_histogram(&self) -> BTreeMap<usize, usize> {
        let mut histogram = BTreeMap::new();
        for library in &self.libraries {
            *histogram.entry(library.len()).or_insert(0) += 1;
        }
        histogram
    }

    /// Length of the longest library, or 0 for an empty collection.
    #[must_use]
    pub fn max_library_len(&self) -> usize {
        self.libraries.iter().map(Library::len).max().unwrap_or(0)
    }

    /// All libraries whose length equals [`max_library_len`](Self::max_library_len).
    pub fn longest(&self) -> impl Iterator<Item = &Library> {
        let max = self.max_library_len();
        self.libraries.iter().filter(move |library| library.len() == max)
    }
}

impl Extend<Chronicle> for LibraryCollection {
    fn extend<I: IntoIterator<Item = Chronicle>>(&mut self, iter: I) {
        for chronicle in iter {
            self.classify(chronicle);
        }
    }
}

/// Classify `chronicles` in arrival order into a fresh collection.
#[instrument(skip_all)]
pub fn build_libraries<I>(chronicles: I) -> LibraryCollection
where
    I: IntoIterator<Item = Chronicle>,
{
    let mut collection = LibraryCollection::new();
    let mut classified = 0_usize;
    for chronicle in chronicles {
        collection.classify(chronicle);
        classified += 1;
    }

    info!(
        classified,
        libraries = collection.len(),
        duplicates = collection.duplicates(),
        "built chronicle libraries"
    );

    collection
}

/// Validate raw label lists as chronicles, then classify them in order.
///
/// Validation happens up front, so an invalid entry fails the whole batch
/// before anything is classified.
///
/// # Errors
///
/// Returns the first [`ChronicleError`] encountered (empty chronicle or a
/// repeated frame).
pub fn build_libraries_from_labels<I, C, S>(raw: I) -> Result<LibraryCollection, ChronicleError>
where
    I: IntoIterator<Item = C>,
    C: IntoIterator<Item = S>,
    S: Into<String>,
{
    let chronicles = raw
        .into_iter()
        .map(Chronicle::from_labels)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(build_libraries(chronicles))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
