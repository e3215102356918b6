//! `chron game`: print generated games with their board tables.

use std::io::Write;

use anyhow::Result;
use chron_core::Chronicle;
use chron_sim::{GenerateConfig, Outcome, board_latex, board_text, boards_latex, generate_games, outcome};
use clap::Args;
use serde::Serialize;

use crate::config::ChronConfig;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct GameArgs {
    /// RNG seed (overrides `generate.seed`).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of games to play.
    #[arg(long, default_value = "1")]
    pub count: usize,
}

#[derive(Debug, Serialize)]
struct GameOutput {
    moves: Vec<String>,
    outcome: Option<Outcome>,
    #[serde(skip)]
    board: String,
    latex: String,
}

#[derive(Debug, Serialize)]
struct GamesOutput {
    seed: u64,
    games: Vec<GameOutput>,
    /// All boards side by side in one table.
    table_latex: String,
}

fn describe(outcome: Option<Outcome>) -> String {
    match outcome {
        Some(Outcome::Win(player)) => format!("{player} wins"),
        Some(Outcome::Draw) => "draw".to_string(),
        None => "unfinished".to_string(),
    }
}

fn game_output(chronicle: &Chronicle) -> Result<GameOutput> {
    Ok(GameOutput {
        moves: chronicle.iter().map(ToString::to_string).collect(),
        outcome: outcome(chronicle),
        board: board_text(chronicle)?,
        latex: board_latex(chronicle)?,
    })
}

pub fn run_game(args: &GameArgs, config: &ChronConfig, output: OutputMode) -> Result<()> {
    let generate = GenerateConfig {
        seed: args.seed.unwrap_or(config.generate.seed),
        count: args.count,
    };
    let chronicles = generate_games(&generate)?;

    let out = GamesOutput {
        seed: generate.seed,
        games: chronicles
            .iter()
            .map(game_output)
            .collect::<Result<Vec<_>>>()?,
        table_latex: boards_latex(&chronicles, chronicles.len())?,
    };
    render_mode(output, &out, render_text, render_pretty)
}

fn render_text(out: &GamesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for (i, game) in out.games.iter().enumerate() {
        writeln!(
            w,
            "game index={} seed={} moves={} outcome=\"{}\"",
            i + 1,
            out.seed,
            game.moves.join(","),
            describe(game.outcome)
        )?;
        writeln!(w, "latex {}", game.latex)?;
    }
    Ok(())
}

fn render_pretty(out: &GamesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for (i, game) in out.games.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        pretty_section(w, &format!("Game {}", i + 1))?;
        pretty_kv(w, "Moves", game.moves.join(" "))?;
        pretty_kv(w, "Outcome", describe(game.outcome))?;
        writeln!(w)?;
        write!(w, "{}", game.board)?;
        writeln!(w)?;
        pretty_kv(w, "LaTeX", &game.latex)?;
    }
    if out.games.len() > 1 {
        writeln!(w)?;
        pretty_section(w, "All Boards")?;
        writeln!(w, "{}", out.table_latex)?;
    }
    Ok(())
}
