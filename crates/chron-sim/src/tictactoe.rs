//! Random tic-tac-toe games as chronicles.
//!
//! A game is a chronicle whose frames are moves: the player symbol followed
//! by the board position, positions numbered row by row:
//!
//! ```text
//! 0 | 1 | 2
//! 3 | 4 | 5
//! 6 | 7 | 8
//! ```
//!
//! `X` always moves first. A move is never repeated, so a game is always a
//! valid chronicle.

use std::fmt;

use chron_core::{Chronicle, ChronicleError, Frame};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::rng::DeterministicRng;

/// Number of board cells.
pub const CELLS: usize = 9;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::X => 'X',
            Self::O => 'O',
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single move: who played and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub player: Player,
    pub position: usize,
}

impl Move {
    #[must_use]
    pub fn to_frame(self) -> Frame {
        Frame::new(format!("{}{}", self.player, self.position))
    }

    /// Parse a frame such as `X4`; `None` if it is not a board move.
    #[must_use]
    pub fn parse(frame: &Frame) -> Option<Self> {
        let mut chars = frame.as_str().chars();
        let player = match chars.next()? {
            'X' => Player::X,
            'O' => Player::O,
            _ => return None,
        };
        let position = chars.next()?.to_digit(10)? as usize;
        if chars.next().is_some() || position >= CELLS {
            return None;
        }
        Some(Self { player, position })
    }
}

/// Board occupancy built up move by move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Player>; CELLS],
    moves: usize,
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay the moves of a chronicle; unrecognized frames are skipped.
    #[must_use]
    pub fn from_frames(frames: &[Frame]) -> Self {
        let mut board = Self::new();
        for mv in frames.iter().filter_map(Move::parse) {
            board.place(mv);
        }
        board
    }

    fn place(&mut self, mv: Move) {
        if self.cells[mv.position].is_none() {
            self.cells[mv.position] = Some(mv.player);
            self.moves += 1;
        }
    }

    #[must_use]
    pub fn cell(&self, position: usize) -> Option<Player> {
        self.cells.get(position).copied().flatten()
    }

    /// Free positions in ascending order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELLS).filter(|&pos| self.cells[pos].is_none()).collect()
    }

    /// The player holding a full line, if any.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        LINES.iter().find_map(|line| {
            let first = self.cells[line[0]]?;
            line.iter()
                .all(|&pos| self.cells[pos] == Some(first))
                .then_some(first)
        })
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.moves == CELLS
    }

    /// The game is over once someone holds a line or the board is full.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.is_full() || self.winner().is_some()
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win(Player),
    Draw,
}

/// `true` if the moves in `frames` end a game.
#[must_use]
pub fn is_finished(frames: &[Frame]) -> bool {
    frames.len() == CELLS || Board::from_frames(frames).is_finished()
}

/// Outcome of a finished game, `None` while it is still in progress.
#[must_use]
pub fn outcome(chronicle: &Chronicle) -> Option<Outcome> {
    let board = Board::from_frames(chronicle.frames());
    match board.winner() {
        Some(player) => Some(Outcome::Win(player)),
        None if board.is_full() => Some(Outcome::Draw),
        None => None,
    }
}

/// Play one random game to completion.
///
/// `X` opens on a uniformly random cell; each following move takes a
/// uniformly random free cell, alternating players.
///
/// # Errors
///
/// Returns a [`ChronicleError`] only if the move list fails chronicle
/// validation, which a legal game never does.
pub fn play_game(rng: &mut DeterministicRng) -> Result<Chronicle, ChronicleError> {
    let mut board = Board::new();
    let mut frames = Vec::with_capacity(CELLS);
    let mut player = Player::X;

    while !board.is_finished() {
        let free = board.empty_cells();
        let Some(&position) = rng.choose(&free) else {
            break;
        };
        let mv = Move { player, position };
        board.place(mv);
        frames.push(mv.to_frame());
        player = player.other();
    }

    trace!(moves = frames.len(), "played game");
    Chronicle::new(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(labels: &[&str]) -> Vec<Frame> {
        labels.iter().copied().map(Frame::from).collect()
    }

    #[test]
    fn parse_recognizes_moves() {
        assert_eq!(
            Move::parse(&Frame::from("O7")),
            Some(Move {
                player: Player::O,
                position: 7
            })
        );
        assert_eq!(Move::parse(&Frame::from("Z1")), None);
        assert_eq!(Move::parse(&Frame::from("X9")), None);
        assert_eq!(Move::parse(&Frame::from("X12")), None);
        assert_eq!(Move::parse(&Frame::from("X")), None);
    }

    #[test]
    fn row_win_ends_game() {
        assert!(is_finished(&frames(&["X0", "O3", "X1", "O4", "X2"])));
        assert!(!is_finished(&frames(&["X0", "O3", "X1", "O4"])));
    }

    #[test]
    fn diagonal_win_for_o() {
        let board = Board::from_frames(&frames(&["X1", "O2", "X0", "O4", "X8", "O6"]));
        assert_eq!(board.winner(), Some(Player::O));
    }

    #[test]
    fn mixed_line_is_not_a_win() {
        let board = Board::from_frames(&frames(&["X0", "O1", "X2"]));
        assert_eq!(board.winner(), None);
        assert!(!board.is_finished());
    }

    #[test]
    fn full_board_is_finished() {
        let draw = frames(&["X0", "O1", "X2", "O4", "X3", "O5", "X7", "O6", "X8"]);
        assert!(is_finished(&draw));
        let chronicle = Chronicle::new(draw).expect("valid");
        assert_eq!(outcome(&chronicle), Some(Outcome::Draw));
    }

    #[test]
    fn generated_games_are_legal_and_finished() {
        let mut rng = DeterministicRng::new(21);
        for _ in 0..200 {
            let game = play_game(&mut rng).expect("legal game");
            assert!((5..=CELLS).contains(&game.len()));
            assert!(is_finished(game.frames()));
            assert!(outcome(&game).is_some());

            for (turn, frame) in game.iter().enumerate() {
                let mv = Move::parse(frame).expect("board move");
                let expected = if turn % 2 == 0 { Player::X } else { Player::O };
                assert_eq!(mv.player, expected);
            }

            // No move is played after the game ended.
            let prefix = &game.frames()[..game.len() - 1];
            assert!(!is_finished(prefix));
        }
    }

    #[test]
    fn same_seed_same_game() {
        let a = play_game(&mut DeterministicRng::new(5)).expect("game");
        let b = play_game(&mut DeterministicRng::new(5)).expect("game");
        assert_eq!(a, b);
    }
}
