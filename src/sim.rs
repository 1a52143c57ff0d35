//! Turn pipeline for Ecosim.
//!
//! Builds on the world layer:
//! - Configuration (grid size, densities, restore rules, creature stats)
//! - Bounded random placement for populate and restore
//! - The ordered action pipeline: populate, move, clean, restore
//! - Per-turn reports and census
//! - The driver loop that applies pause/resume/stop between turns

mod actions;
mod config;
mod driver;
mod placement;
mod report;
mod state;

pub use actions::Action;
pub use config::{Densities, RestoreRule, SimConfig, Spawn};
pub use driver::{ControlEvent, Driver, RunSummary, StopReason, TurnObserver};
pub use placement::{density_target, restore_target, scatter};
pub use report::{Census, TurnReport};
pub use state::Ecosystem;
