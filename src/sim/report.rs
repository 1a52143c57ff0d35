//! Per-turn reports.

use serde::Serialize;

use crate::world::{Grid, Kind, Outcome};

/// Entity counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Census {
    /// Plants on the grid.
    pub plant: usize,
    /// Rocks on the grid.
    pub rock: usize,
    /// Trees on the grid.
    pub tree: usize,
    /// Herbivores on the grid.
    pub herbivore: usize,
    /// Predators on the grid.
    pub predator: usize,
}

impl Census {
    /// Count every entity on the grid in a single pass.
    #[must_use]
    pub fn take(grid: &Grid) -> Self {
        let mut census = Self::default();
        for (_, entity) in grid.iter() {
            *census.slot(entity.kind()) += 1;
        }
        census
    }

    /// Count for a kind.
    #[must_use]
    pub const fn get(&self, kind: Kind) -> usize {
        match kind {
            Kind::Plant => self.plant,
            Kind::Rock => self.rock,
            Kind::Tree => self.tree,
            Kind::Herbivore => self.herbivore,
            Kind::Predator => self.predator,
        }
    }

    /// Total number of entities.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.plant + self.rock + self.tree + self.herbivore + self.predator
    }

    fn slot(&mut self, kind: Kind) -> &mut usize {
        match kind {
            Kind::Plant => &mut self.plant,
            Kind::Rock => &mut self.rock,
            Kind::Tree => &mut self.tree,
            Kind::Herbivore => &mut self.herbivore,
            Kind::Predator => &mut self.predator,
        }
    }
}

/// What happened during one turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    /// Turn number, starting at 1.
    pub turn: u64,
    /// Plants eaten.
    pub meals: u32,
    /// Predator attacks.
    pub attacks: u32,
    /// Attacks that killed their prey.
    pub kills: u32,
    /// Creatures that moved toward food.
    pub moves: u32,
    /// Creatures with no reachable food.
    pub stranded: u32,
    /// Dead entities removed by the clean phase.
    pub removed: usize,
    /// Entities placed by the restore phase.
    pub restored: usize,
    /// Counts after the turn completed.
    pub census: Census,
}

impl TurnReport {
    /// Start an empty report for a turn.
    #[must_use]
    pub fn new(turn: u64) -> Self {
        Self {
            turn,
            ..Self::default()
        }
    }

    /// Tally one behavior outcome.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Idle => {}
            Outcome::Fed { .. } => self.meals += 1,
            Outcome::Attacked { killed, .. } => {
                self.attacks += 1;
                if killed {
                    self.kills += 1;
                }
            }
            Outcome::Moved { .. } => self.moves += 1,
            Outcome::Stranded => self.stranded += 1,
        }
    }
}
