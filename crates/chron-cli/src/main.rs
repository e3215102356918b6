#![forbid(unsafe_code)]

mod cmd;
mod config;
mod output;

use chron_bnet::BnetError;
use chron_core::{ChronicleError, ErrorCode};
use chron_sim::RenderError;
use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "chron: chronicle libraries and empirical conditional probability tables",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (defaults to pretty on a TTY, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Config file (defaults to ./chron.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Generate games and group them into time-compatible libraries",
        after_help = "EXAMPLES:\n    # 2000 games from the default seed\n    chron libraries\n\n    # Reproducible run\n    chron libraries --count 500 --seed 7\n\n    # Machine-readable output\n    chron libraries --format json"
    )]
    Libraries(cmd::libraries::LibrariesArgs),

    #[command(
        about = "Fit conditional probability tables over a library's high-frequency DAG",
        after_help = "EXAMPLES:\n    # Built-in sample library\n    chron bnet\n\n    # Custom library with Graphviz output\n    chron bnet --input library.json --memory-time 3 --min-freq 2 --dot"
    )]
    Bnet(cmd::bnet::BnetArgs),

    #[command(
        about = "Play random games and print their board tables",
        after_help = "EXAMPLES:\n    # One game\n    chron game --seed 21\n\n    # Four games side by side\n    chron game --seed 21 --count 4"
    )]
    Game(cmd::game::GameArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CHRON_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "chron=debug,info"
        } else {
            "chron=info,warn"
        })
    });

    let format = env::var("CHRON_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Find the most specific known error in the chain and map it to a code.
fn error_code(err: &anyhow::Error) -> Option<ErrorCode> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<ChronicleError>() {
            Some(e.code())
        } else if let Some(e) = cause.downcast_ref::<BnetError>() {
            Some(e.code())
        } else if let Some(e) = cause.downcast_ref::<RenderError>() {
            Some(e.code())
        } else if cause.is::<toml::de::Error>() {
            Some(ErrorCode::ConfigParseError)
        } else if cause.is::<serde_json::Error>() {
            Some(ErrorCode::MalformedInput)
        } else {
            None
        }
    })
}

fn to_cli_error(err: &anyhow::Error) -> CliError {
    let error = CliError::new(format!("{err:#}"));
    match error_code(err) {
        Some(code) => error.with_code(code),
        None => error,
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    let project_root = env::current_dir()?;
    let config = config::load(cli.config.as_deref(), &project_root)?;
    debug!(?config, "resolved config");

    match &cli.command {
        Commands::Libraries(args) => cmd::libraries::run_libraries(args, &config, output),
        Commands::Bnet(args) => cmd::bnet::run_bnet(args, &config, output),
        Commands::Game(args) => cmd::game::run_game(args, &config, output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = resolve_output_mode(cli.format);

    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if render_error(output, &to_cli_error(&err)).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
