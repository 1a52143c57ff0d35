//! Ecosim CLI - run or watch an ecosystem simulation.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::process::ExitCode;

/// Ecosim - A deterministic turn-based ecosystem simulation
#[derive(Parser, Debug)]
#[command(name = "ecosim")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log debug messages (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a simulation headless and print each turn
    Run {
        #[command(flatten)]
        sim: cli::SimArgs,

        /// Number of turns (default: config value, else 20)
        #[arg(short, long)]
        turns: Option<u64>,

        /// Delay between turns in milliseconds (default: 0)
        #[arg(long, default_value = "0")]
        delay: u64,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Only print the final summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// Interactive TUI to watch a simulation in real time
    Watch {
        #[command(flatten)]
        sim: cli::SimArgs,

        /// Stop after this many turns (default: run until stopped)
        #[arg(short, long)]
        turns: Option<u64>,

        /// Delay between turns in milliseconds (default: 2000)
        #[arg(long)]
        delay: Option<u64>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            sim,
            turns,
            delay,
            format,
            quiet,
        } => {
            cli::init_logging(args.verbose, LevelFilter::Info);
            cli::run::execute(&sim, turns, delay, format, quiet)
        }

        Commands::Watch { sim, turns, delay } => {
            // Log lines would tear the alternate screen
            cli::init_logging(args.verbose, LevelFilter::Warn);
            cli::watch::execute(&sim, turns, delay)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
