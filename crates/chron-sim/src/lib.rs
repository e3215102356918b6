#![forbid(unsafe_code)]
//! chron-sim library.
//!
//! Deterministic generation of example chronicles: random tic-tac-toe games
//! played from an explicit seed, plus board rendering and a campaign runner
//! that feeds generated games to the library builder.
//!
//! # Conventions
//!
//! - **Errors**: `anyhow::Result` in the campaign runner, [`RenderError`]
//!   for rendering.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod campaign;
pub mod render;
pub mod rng;
pub mod tictactoe;

pub use campaign::{GenerateConfig, LibraryReport, generate_games, run_library_campaign};
pub use render::{RenderError, board_latex, board_text, boards_latex};
pub use rng::DeterministicRng;
pub use tictactoe::{Board, Move, Outcome, Player, is_finished, outcome, play_game};
