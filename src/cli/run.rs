//! Run command implementation: headless simulation.

use super::output::{format_census, format_summary, format_turn_line};
use super::{CliError, OutputFormat, SimArgs};
use ecosim::render::render_frame;
use ecosim::{Driver, Ecosystem, TurnObserver, TurnReport};
use std::sync::mpsc;
use std::time::Duration;

/// Turns to run when neither the flag nor the config sets a limit.
const DEFAULT_TURNS: u64 = 20;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the config is invalid or the simulation fails.
pub(crate) fn execute(
    sim: &SimArgs,
    turns: Option<u64>,
    delay_ms: u64,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let config = sim.build_config()?;
    let max_turns = turns.or(config.max_turns).unwrap_or(DEFAULT_TURNS);

    let mut eco = Ecosystem::new(config)?;
    eco.populate()?;

    if format == OutputFormat::Text && !quiet {
        println!(
            "Running {}x{} ecosystem with seed {} for {max_turns} turns...",
            eco.grid().rows(),
            eco.grid().cols(),
            eco.seed()
        );
        println!();
        print!("{}", render_frame(eco.grid()));
        println!("Turn 0: {}", format_census(&eco.census()));
        println!();
    }

    // No input source: the sender only keeps the channel open
    let (_events, rx) = mpsc::channel();
    let mut output = Headless { format, quiet };
    let summary = Driver::new(Duration::from_millis(delay_ms))
        .with_max_turns(Some(max_turns))
        .run(&mut eco, &rx, &mut output)?;

    if format == OutputFormat::Text {
        print!("{}", format_summary(&eco, &summary));
    }

    Ok(())
}

/// Prints each turn to stdout.
struct Headless {
    format: OutputFormat,
    quiet: bool,
}

impl TurnObserver for Headless {
    type Error = CliError;

    fn on_turn(&mut self, eco: &Ecosystem, report: &TurnReport) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => {
                if !self.quiet {
                    print!("{}", render_frame(eco.grid()));
                    println!("{}", format_turn_line(report));
                    println!("  {}", format_census(&report.census));
                    println!();
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(report)?);
            }
        }
        Ok(())
    }
}
