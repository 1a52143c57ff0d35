//! Output formatting utilities for CLI.

use ecosim::{Census, Ecosystem, Kind, RunSummary, StopReason, TurnReport};

/// One-line summary of a turn.
pub(super) fn format_turn_line(report: &TurnReport) -> String {
    format!(
        "Turn {}: {} meals, {} attacks ({} kills), {} moves, {} stranded, {} removed, {} restored",
        report.turn,
        report.meals,
        report.attacks,
        report.kills,
        report.moves,
        report.stranded,
        report.removed,
        report.restored
    )
}

/// Census as `glyph label count` pairs on one line.
pub(super) fn format_census(census: &Census) -> String {
    Kind::ALL
        .iter()
        .map(|&kind| format!("{} {} {}", kind.glyph(), kind, census.get(kind)))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Closing summary after a run.
pub(super) fn format_summary(eco: &Ecosystem, summary: &RunSummary) -> String {
    let reason = match summary.reason {
        StopReason::Requested => "stopped",
        StopReason::TurnLimit => "turn limit reached",
        StopReason::Disconnected => "control channel closed",
    };

    format!(
        "Simulation ended after {} turns ({reason}, seed {})\n  {}\n",
        summary.turns,
        eco.seed(),
        format_census(&eco.census())
    )
}
