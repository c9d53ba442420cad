//! recall CLI — adaptive question drills in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "recall",
    version,
    about = "Adaptive question drill with spaced repetition"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drill the questions of a bank until end of input (Ctrl-D)
    Drill {
        /// Path to a .json or .toml question bank
        bank: PathBuf,

        /// Selection mode: smart or random
        #[arg(long)]
        mode: Option<String>,

        /// Disable speech
        #[arg(long)]
        no_speak: bool,

        /// Print each question's new cutoff and points
        #[arg(long)]
        show_stats: bool,

        /// Seed for reproducible question order
        #[arg(long)]
        seed: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Type the digits of numbers read out loud
    Listen {
        /// Language the numbers are read in
        #[arg(long, default_value = "de")]
        language: String,

        /// Smallest number
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        min: i64,

        /// Largest number
        #[arg(long, default_value = "100", allow_hyphen_values = true)]
        max: i64,

        /// Seed for reproducible numbers
        #[arg(long)]
        seed: Option<u64>,

        /// Disable speech
        #[arg(long)]
        no_speak: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a question bank for problems
    Validate {
        /// Path to a .json or .toml question bank
        bank: PathBuf,
    },

    /// Show per-question progress for a bank
    Stats {
        /// Path to a .json or .toml question bank
        bank: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the voices available for speech
    Voices {
        /// Only show this language (e.g. "es")
        #[arg(long)]
        language: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and example question bank
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Drill {
            bank,
            mode,
            no_speak,
            show_stats,
            seed,
            config,
        } => commands::drill::execute(commands::drill::DrillArgs {
            bank,
            mode,
            no_speak,
            show_stats,
            seed,
            config,
        }),
        Commands::Listen {
            language,
            min,
            max,
            seed,
            no_speak,
            config,
        } => commands::listen::execute(language, min..=max, seed, no_speak, config),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Stats { bank, config } => commands::stats::execute(bank, config),
        Commands::Voices { language, config } => commands::voices::execute(language, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
