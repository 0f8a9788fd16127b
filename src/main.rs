//! Connect Six CLI - play, replay and preview games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use connect_six::GameConfig;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

/// Connect Six - a six-city conquest game against a scripted opponent
#[derive(Parser, Debug)]
#[command(name = "connect-six")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log game internals to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play an interactive game on the terminal
    Play {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Index of your headquarters city (0-5)
        #[arg(long, default_value = "0")]
        hq: usize,

        /// Headquarters capture rule
        #[arg(long, default_value = "contested")]
        hq_rule: cli::HqRuleArg,

        /// End the game without a winner after this many rounds
        #[arg(long)]
        max_rounds: Option<u32>,

        /// Only allow moves between adjacent cities
        #[arg(long)]
        adjacent_moves: bool,

        /// Save recording to file when the session ends
        #[arg(long)]
        save: Option<std::path::PathBuf>,
    },

    /// Replay a recorded game
    Replay {
        /// Recording file (.json)
        #[arg(required = true)]
        recording: std::path::PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Show the cities a seed generates
    Cities {
        /// Random seed
        #[arg(short, long)]
        seed: u64,

        /// Index of your headquarters city (0-5)
        #[arg(long, default_value = "0")]
        hq: usize,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn random_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() ^ u64::from(d.subsec_nanos()))
        .unwrap_or(42)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Play {
            seed,
            hq,
            hq_rule,
            max_rounds,
            adjacent_moves,
            save,
        } => cli::play::execute(&cli::play::PlayOptions {
            seed: seed.unwrap_or_else(random_seed),
            hq,
            config: GameConfig {
                hq_rule: hq_rule.into(),
                player_moves_need_adjacency: adjacent_moves,
                max_rounds,
            },
            save,
        }),

        Commands::Replay { recording, format } => cli::replay::execute(recording, format),

        Commands::Cities { seed, hq, format } => cli::cities::execute(seed, hq, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
