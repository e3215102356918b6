use std::fmt;

/// Machine-readable error codes shared by every crate in the workspace.
///
/// Module-level error enums (`ChronicleError`, `BnetError`, `RenderError`)
/// map each of their variants onto one of these codes so the CLI can print
/// a stable identifier and a remediation hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EmptyChronicle,
    RepeatedFrame,
    MalformedInput,
    MissingColumn,
    ColumnLengthMismatch,
    NonBinaryValue,
    TooManyParents,
    EmptyLibrary,
    UnrecognizedFrame,
    BoardCount,
    ConfigParseError,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyChronicle => "E1001",
            Self::RepeatedFrame => "E1002",
            Self::MalformedInput => "E1003",
            Self::MissingColumn => "E2001",
            Self::ColumnLengthMismatch => "E2002",
            Self::NonBinaryValue => "E2003",
            Self::TooManyParents => "E2004",
            Self::EmptyLibrary => "E2005",
            Self::UnrecognizedFrame => "E3001",
            Self::BoardCount => "E3002",
            Self::ConfigParseError => "E4001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::EmptyChronicle => "Chronicle has no frames",
            Self::RepeatedFrame => "Frame repeated within a chronicle",
            Self::MalformedInput => "Malformed chronicle input",
            Self::MissingColumn => "Dataset column missing",
            Self::ColumnLengthMismatch => "Dataset column length mismatch",
            Self::NonBinaryValue => "Dataset cell is not 0 or 1",
            Self::TooManyParents => "Too many parents for a conditional table",
            Self::EmptyLibrary => "Library is empty",
            Self::UnrecognizedFrame => "Frame is not a board move",
            Self::BoardCount => "Invalid number of boards",
            Self::ConfigParseError => "Config file parse error",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::EmptyChronicle => Some("Every chronicle needs at least one frame."),
            Self::RepeatedFrame => Some("Frames must be unique within one chronicle."),
            Self::MalformedInput => {
                Some("Provide a JSON array of chronicles, each an array of frame labels.")
            }
            Self::MissingColumn => {
                Some("Every arrow endpoint must appear as a column of the dataset.")
            }
            Self::ColumnLengthMismatch => Some("All dataset columns must have the same length."),
            Self::NonBinaryValue => Some("Encode presence as 1 and absence as 0."),
            Self::TooManyParents => Some("Raise the arrow frequency threshold to prune parents."),
            Self::EmptyLibrary => None,
            Self::UnrecognizedFrame => {
                Some("Board frames are a player (X or O) followed by a position 0-8.")
            }
            Self::BoardCount => Some("Render between one and the column limit of boards."),
            Self::ConfigParseError => Some("Fix syntax in chron.toml and retry."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    const ALL: [ErrorCode; 12] = [
        ErrorCode::EmptyChronicle,
        ErrorCode::RepeatedFrame,
        ErrorCode::MalformedInput,
        ErrorCode::MissingColumn,
        ErrorCode::ColumnLengthMismatch,
        ErrorCode::NonBinaryValue,
        ErrorCode::TooManyParents,
        ErrorCode::EmptyLibrary,
        ErrorCode::UnrecognizedFrame,
        ErrorCode::BoardCount,
        ErrorCode::ConfigParseError,
        ErrorCode::InternalUnexpected,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let text = code.code();
            assert_eq!(text.len(), 5);
            assert!(text.starts_with('E'));
            assert!(text.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn display_matches_code() {
        assert_eq!(ErrorCode::MissingColumn.to_string(), "E2001");
    }
}
