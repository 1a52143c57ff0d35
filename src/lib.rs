// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Ecosim: a deterministic turn-based ecosystem simulation on a bounded grid.
//!
//! Plants, rocks and trees occupy cells; herbivores and predators forage by
//! breadth-first search toward their food, eat or attack when adjacent, and
//! the grid is cleaned and replenished every turn.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Driver (pause / resume / stop)    │
//! ├─────────────────────────────────────┤
//! │  Turn pipeline (move, clean, ...)   │
//! ├─────────────────────────────────────┤
//! │  Behavior + BFS pathfinder          │
//! ├─────────────────────────────────────┤
//! │  Grid store (cells, entities)       │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use ecosim::{Ecosystem, SimConfig};
//!
//! let config = SimConfig { seed: Some(42), ..SimConfig::default() };
//! let mut eco = Ecosystem::new(config).unwrap();
//! eco.populate().unwrap();
//! let report = eco.step().unwrap();
//! assert_eq!(report.turn, 1);
//! ```

pub mod error;
pub mod render;
pub mod sim;
pub mod world;

pub use error::{ConfigError, GridError, GridResult, KeyDefect, SimError};

// Re-export key types at crate root for convenience
pub use sim::{
    Census, ControlEvent, Driver, Ecosystem, RunSummary, SimConfig, StopReason, TurnObserver,
    TurnReport,
};
pub use world::{Cell, Entity, EntityId, Grid, Kind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_reexports() {
        let mut grid = Grid::new(1, 1).unwrap();
        let id = grid.place(Cell::new(0, 0), Entity::plant()).unwrap();
        assert_eq!(grid.get(Cell::new(0, 0)).unwrap().unwrap().id(), id);
        assert_eq!("grass".parse::<Kind>().unwrap(), Kind::Plant);
    }

    #[test]
    fn test_plain_data_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<Driver>();
        assert_copy::<Entity>();
        assert_copy::<TurnReport>();
        assert_copy::<Census>();
    }
}
