use chron_core::ErrorCode;

/// Errors from dataset validation and CPT estimation.
///
/// An unobserved parent state is *not* an error; it is reported in-band as
/// [`Probability::Undefined`](crate::cpt::Probability::Undefined).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BnetError {
    /// A node named by the arrows has no dataset column.
    #[error("dataset has no column for node {column}")]
    MissingColumn { column: String },

    /// A column's length differs from the dataset's row count.
    #[error("column {column} has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A row handed to [`Dataset::from_rows`](crate::Dataset::from_rows)
    /// has the wrong number of cells.
    #[error("row {row} has {actual} cells, expected {expected}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// The same column name was added twice.
    #[error("column {column} is defined more than once")]
    DuplicateColumn { column: String },

    /// A cell held something other than 0 or 1.
    #[error("column {column} row {row} holds {value}, expected 0 or 1")]
    NonBinaryValue {
        column: String,
        row: usize,
        value: u8,
    },

    /// The parent-state key space `2^k` does not fit in memory indices.
    #[error("node {node} has {parents} parents; the state table would overflow")]
    TooManyParents { node: String, parents: usize },

    /// A presence dataset was requested for no chronicles.
    #[error("cannot derive a presence dataset from an empty library")]
    EmptyLibrary,
}

impl BnetError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MissingColumn { .. } => ErrorCode::MissingColumn,
            Self::ColumnLengthMismatch { .. } | Self::RowWidthMismatch { .. } => {
                ErrorCode::ColumnLengthMismatch
            }
            Self::DuplicateColumn { .. } => ErrorCode::MalformedInput,
            Self::NonBinaryValue { .. } => ErrorCode::NonBinaryValue,
            Self::TooManyParents { .. } => ErrorCode::TooManyParents,
            Self::EmptyLibrary => ErrorCode::EmptyLibrary,
        }
    }
}
