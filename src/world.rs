//! World layer for Ecosim.
//!
//! Everything that lives on the grid:
//! - Grid store with bounds and single-occupancy enforcement
//! - Entity variants (terrain and creatures) and their capabilities
//! - Breadth-first pathfinding toward food
//! - The per-creature behavior step (feed, attack, seek)
//! - Invariant checks over a whole grid

mod behavior;
mod entity;
mod grid;
mod invariants;
mod pathfind;

pub use behavior::{take_turn, Outcome};
pub use entity::{
    Body, Capability, Creature, Entity, EntityId, Family, Kind, Location, Profile, Profiles,
    StatRange, EMPTY_GLYPH,
};
pub use grid::{Cell, Grid, GridId};
pub use invariants::{check_clean, check_invariants, InvariantViolation};
pub use pathfind::find_path;
