//! Binary datasets: named 0/1 columns of equal length.
//!
//! Rows are samples (`0..rows`), columns are variables. Every cell is
//! validated to be 0 or 1 on the way in, so the estimator can index count
//! tables by cell value without re-checking.
//!
//! [`Dataset::presence`] derives the table used for chronicle libraries:
//! one row per chronicle, one column per frame, 1 where the chronicle
//! contains the frame.

use std::collections::HashMap;
use std::fmt;

use chron_core::{Chronicle, Frame, Library};
use serde::Serialize;

use crate::error::BnetError;

/// One named column of 0/1 cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<u8>,
}

/// A table of binary columns with a shared row count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dataset {
    columns: Vec<Column>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    rows: usize,
}

impl Dataset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from `(name, values)` pairs, in order.
    ///
    /// # Errors
    ///
    /// See [`Dataset::push_column`].
    pub fn from_columns<I, S>(columns: I) -> Result<Self, BnetError>
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        let mut dataset = Self::new();
        for (name, values) in columns {
            dataset.push_column(name, values)?;
        }
        Ok(dataset)
    }

    /// Build a dataset from row-major data with the given column names.
    ///
    /// # Errors
    ///
    /// Returns [`BnetError::RowWidthMismatch`] if a row does not have one
    /// cell per name, plus anything [`Dataset::push_column`] rejects.
    pub fn from_rows<S: AsRef<str>>(names: &[S], rows: &[Vec<u8>]) -> Result<Self, BnetError> {
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != names.len() {
                return Err(BnetError::RowWidthMismatch {
                    row,
                    expected: names.len(),
                    actual: cells.len(),
                });
            }
        }

        let mut dataset = Self::new();
        for (col, name) in names.iter().enumerate() {
            let values = rows.iter().map(|cells| cells[col]).collect();
            dataset.push_column(name.as_ref(), values)?;
        }
        if names.is_empty() {
            dataset.rows = rows.len();
        }
        Ok(dataset)
    }

    /// Presence table: one row per chronicle, one column per entry of
    /// `frames`, cell = 1 iff the chronicle contains that frame.
    ///
    /// # Errors
    ///
    /// Returns [`BnetError::EmptyLibrary`] when `chronicles` is empty and
    /// [`BnetError::DuplicateColumn`] if `frames` repeats a label.
    pub fn presence(chronicles: &[Chronicle], frames: &[Frame]) -> Result<Self, BnetError> {
        if chronicles.is_empty() {
            return Err(BnetError::EmptyLibrary);
        }

        let mut dataset = Self::new();
        for frame in frames {
            let values = chronicles
                .iter()
                .map(|chronicle| u8::from(chronicle.contains(frame)))
                .collect();
            dataset.push_column(frame.as_str(), values)?;
        }
        dataset.rows = chronicles.len();
        Ok(dataset)
    }

    /// Presence table for a library, with the head's frames as columns.
    ///
    /// Every member of a library is smaller than its head, so these columns
    /// cover every frame that occurs anywhere in the library.
    ///
    /// # Errors
    ///
    /// Never fails for a library built by `chron-core`; the `Result` is
    /// kept so the call composes with [`Dataset::presence`].
    pub fn presence_for_library(library: &Library) -> Result<Self, BnetError> {
        Self::presence(library.members(), library.head().frames())
    }

    /// Append a column.
    ///
    /// # Errors
    ///
    /// Returns [`BnetError::DuplicateColumn`] for a repeated name,
    /// [`BnetError::NonBinaryValue`] for a cell other than 0/1, and
    /// [`BnetError::ColumnLengthMismatch`] when the length differs from the
    /// columns already present.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<u8>) -> Result<(), BnetError> {
        let name = name.into();

        if self.index.contains_key(&name) {
            return Err(BnetError::DuplicateColumn { column: name });
        }

        if let Some((row, &value)) = values.iter().enumerate().find(|(_, v)| **v > 1) {
            return Err(BnetError::NonBinaryValue {
                column: name,
                row,
                value,
            });
        }

        if self.columns.is_empty() {
            self.rows = values.len();
        } else if values.len() != self.rows {
            return Err(BnetError::ColumnLengthMismatch {
                column: name,
                expected: self.rows,
                actual: values.len(),
            });
        }

        self.index.insert(name.clone(), self.columns.len());
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Number of samples.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[u8]> {
        self.index
            .get(name)
            .map(|&idx| self.columns[idx].values.as_slice())
    }

    #[must_use]
    pub fn value(&self, column: &str, row: usize) -> Option<u8> {
        self.column(column).and_then(|values| values.get(row).copied())
    }

    /// Like [`Dataset::column`] but with a [`BnetError::MissingColumn`].
    ///
    /// # Errors
    ///
    /// Returns [`BnetError::MissingColumn`] if `name` is not a column.
    pub fn require(&self, name: &str) -> Result<&[u8], BnetError> {
        self.column(name).ok_or_else(|| BnetError::MissingColumn {
            column: name.to_string(),
        })
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths: Vec<usize> = self.columns.iter().map(|c| c.name.len().max(1)).collect();
        let index_width = self.rows.saturating_sub(1).to_string().len();

        write!(f, "{:index_width$}", "")?;
        for (column, width) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>width$}", column.name)?;
        }
        writeln!(f)?;

        for row in 0..self.rows {
            write!(f, "{row:>index_width$}")?;
            for (column, width) in self.columns.iter().zip(&widths) {
                write!(f, "  {:>width$}", column.values[row])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
