//! Board rendering for tic-tac-toe chronicles.
//!
//! Each occupied cell shows the player and the time step the move was made
//! at, e.g. `X(0)` for the opening move. LaTeX output is a `tabular`
//! environment; several boards are laid side by side in an outer `tabular`
//! with a fixed number of columns.

use std::fmt::Write as _;

use chron_core::{Chronicle, ErrorCode};
use thiserror::Error;

use crate::tictactoe::{CELLS, Move};

const BOARD_PREAMBLE: &str = r"\setlength\arrayrulewidth{2pt}\begin{tabular}{c|c|c}";
const ROW_BREAK: &str = r"\\\hline ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("frame '{frame}' is not a tic-tac-toe move")]
    UnrecognizedFrame { frame: String },

    #[error("cannot lay out {count} boards in {max} columns")]
    BoardCount { count: usize, max: usize },
}

impl RenderError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnrecognizedFrame { .. } => ErrorCode::UnrecognizedFrame,
            Self::BoardCount { .. } => ErrorCode::BoardCount,
        }
    }
}

/// Cell contents by position: `X(t)` / `O(t)`, or `None` for a free cell.
fn timed_cells(chronicle: &Chronicle) -> Result<[Option<String>; CELLS], RenderError> {
    let mut cells: [Option<String>; CELLS] = Default::default();
    for (time, frame) in chronicle.iter().enumerate() {
        let mv = Move::parse(frame).ok_or_else(|| RenderError::UnrecognizedFrame {
            frame: frame.to_string(),
        })?;
        cells[mv.position] = Some(format!("{}({time})", mv.player));
    }
    Ok(cells)
}

/// LaTeX `tabular` drawing one game.
///
/// # Errors
///
/// Returns [`RenderError::UnrecognizedFrame`] for a frame that is not a
/// board move.
pub fn board_latex(chronicle: &Chronicle) -> Result<String, RenderError> {
    let cells = timed_cells(chronicle)?;
    let rows: Vec<String> = cells
        .chunks(3)
        .map(|row| {
            row.iter()
                .map(|cell| cell.as_deref().unwrap_or(""))
                .collect::<Vec<_>>()
                .join("&")
        })
        .collect();

    Ok(format!(
        r"{BOARD_PREAMBLE}{}\end{{tabular}}",
        rows.join(ROW_BREAK)
    ))
}

/// LaTeX `tabular` with `max_columns` columns holding one board per game.
///
/// Unused columns are left empty.
///
/// # Errors
///
/// Returns [`RenderError::BoardCount`] unless `0 < chronicles.len() <=
/// max_columns`, and propagates [`board_latex`] failures.
pub fn boards_latex(chronicles: &[Chronicle], max_columns: usize) -> Result<String, RenderError> {
    let count = chronicles.len();
    if count == 0 || count > max_columns {
        return Err(RenderError::BoardCount {
            count,
            max: max_columns,
        });
    }

    let boards = chronicles
        .iter()
        .map(board_latex)
        .collect::<Result<Vec<_>, _>>()?;

    let mut latex = format!(r"\begin{{tabular}}{{{}}}", "c".repeat(max_columns));
    latex.push_str(&boards.join("&"));
    latex.push_str(&"&".repeat(max_columns - count));
    latex.push_str(r"\end{tabular}");
    Ok(latex)
}

/// Plain-text board for terminals.
///
/// # Errors
///
/// Returns [`RenderError::UnrecognizedFrame`] for a frame that is not a
/// board move.
pub fn board_text(chronicle: &Chronicle) -> Result<String, RenderError> {
    let cells = timed_cells(chronicle)?;
    let mut text = String::new();
    for (i, row) in cells.chunks(3).enumerate() {
        if i > 0 {
            text.push_str("------+------+------\n");
        }
        let line: Vec<String> = row
            .iter()
            .map(|cell| format!("{:^6}", cell.as_deref().unwrap_or("")))
            .collect();
        let _ = writeln!(text, "{}", line.join("|"));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chron(labels: &[&str]) -> Chronicle {
        Chronicle::from_labels(labels.iter().copied()).expect("valid chronicle")
    }

    #[test]
    fn single_board_marks_move_times() {
        let latex = board_latex(&chron(&["X4", "O0", "X8"])).expect("render");
        assert_eq!(
            latex,
            r"\setlength\arrayrulewidth{2pt}\begin{tabular}{c|c|c}O(1)&&\\\hline &X(0)&\\\hline &&X(2)\end{tabular}"
        );
    }

    #[test]
    fn board_list_pads_unused_columns() {
        let games = [chron(&["X0"]), chron(&["X1"])];
        let latex = boards_latex(&games, 4).expect("render");
        assert!(latex.starts_with(r"\begin{tabular}{cccc}"));
        assert!(latex.ends_with(r"\end{tabular}&&\end{tabular}"));
        assert_eq!(latex.matches(BOARD_PREAMBLE).count(), 2);
    }

    #[test]
    fn board_list_rejects_bad_counts() {
        let games = [chron(&["X0"]), chron(&["X1"])];
        assert_eq!(
            boards_latex(&games, 1),
            Err(RenderError::BoardCount { count: 2, max: 1 })
        );
        assert_eq!(
            boards_latex(&[], 3),
            Err(RenderError::BoardCount { count: 0, max: 3 })
        );
    }

    #[test]
    fn non_move_frame_rejected() {
        let err = board_latex(&chron(&["X0", "door_opens"])).expect_err("not a move");
        assert_eq!(
            err,
            RenderError::UnrecognizedFrame {
                frame: "door_opens".into()
            }
        );
        assert_eq!(err.code(), ErrorCode::UnrecognizedFrame);
    }

    #[test]
    fn text_board_has_three_rows() {
        let text = board_text(&chron(&["X4"])).expect("render");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2], "      | X(0) |      ");
    }
}
