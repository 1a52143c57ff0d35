//! The actions that make up the turn pipeline.

use crate::error::GridResult;
use crate::sim::placement::{density_target, restore_target, scatter};
use crate::sim::{Ecosystem, RestoreRule, TurnReport};
use crate::world::{take_turn, Grid, Kind};

/// One step of the pipeline.
///
/// `Populate` runs once before the first turn; the others run every turn in
/// the order `MoveAll`, `Clean`, then each `Restore` rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Fill the grid to the configured densities.
    Populate,
    /// Give every entity present at the start of the phase its turn step.
    MoveAll,
    /// Remove dead entities.
    Clean,
    /// Replenish one kind.
    Restore(RestoreRule),
}

impl Action {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Populate => "populate",
            Self::MoveAll => "move",
            Self::Clean => "clean",
            Self::Restore(_) => "restore",
        }
    }

    /// Run the action against an ecosystem, tallying into `report`.
    ///
    /// # Errors
    ///
    /// Propagates grid errors, which indicate a broken invariant.
    pub fn execute(self, eco: &mut Ecosystem, report: &mut TurnReport) -> GridResult<()> {
        match self {
            Self::Populate => populate(eco)?,
            Self::MoveAll => move_all(&mut eco.grid, report)?,
            Self::Clean => report.removed += clean(&mut eco.grid)?,
            Self::Restore(rule) => report.restored += restore(eco, rule)?,
        }
        Ok(())
    }
}

/// Place every kind at its populate density.
fn populate(eco: &mut Ecosystem) -> GridResult<()> {
    let area = eco.grid.area();

    for kind in Kind::ALL {
        let target = density_target(area, eco.config.densities.get(kind));
        let placed = scatter(&mut eco.grid, kind, target, &mut eco.rng, &eco.config.creatures)?;
        log::debug!("populate: placed {placed}/{target} {kind}");
    }

    Ok(())
}

/// Run the behavior step for every entity present when the phase starts.
///
/// The step set is fixed by a snapshot of `(cell, id)` pairs; an entry is
/// skipped if its cell no longer holds the same entity.
fn move_all(grid: &mut Grid, report: &mut TurnReport) -> GridResult<()> {
    let snapshot: Vec<_> = grid.iter().map(|(cell, e)| (cell, e.id())).collect();

    for (cell, id) in snapshot {
        let still_there = grid.get(cell)?.is_some_and(|e| e.id() == id);
        if !still_there {
            continue;
        }

        let outcome = take_turn(grid, cell)?;
        log::trace!("{cell}: {outcome:?}");
        report.record(outcome);
    }

    Ok(())
}

/// Remove every dead entity. Returns the number removed.
fn clean(grid: &mut Grid) -> GridResult<usize> {
    let dead: Vec<_> = grid
        .iter()
        .filter(|(_, e)| !e.is_alive())
        .map(|(cell, _)| cell)
        .collect();

    for &cell in &dead {
        grid.remove(cell)?;
    }

    Ok(dead.len())
}

/// Replenish one kind at its restore coefficient. Returns the number placed.
fn restore(eco: &mut Ecosystem, rule: RestoreRule) -> GridResult<usize> {
    let target = restore_target(eco.grid.area(), rule.coefficient);
    let placed = scatter(&mut eco.grid, rule.kind, target, &mut eco.rng, &eco.config.creatures)?;
    log::debug!("restore: placed {placed}/{target} {}", rule.kind);
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimConfig;
    use crate::world::{Cell, Entity};

    fn scenario(rows: u16, cols: u16) -> Ecosystem {
        Ecosystem::new(SimConfig::empty(rows, cols)).unwrap()
    }

    #[test]
    fn test_clean_removes_only_dead() {
        let mut eco = scenario(2, 2);
        let grid = eco.grid_mut();
        grid.place(Cell::new(0, 0), Entity::plant()).unwrap();
        grid.place(Cell::new(0, 1), Entity::plant()).unwrap();
        grid.get_mut(Cell::new(0, 0)).unwrap().unwrap().kill();

        let mut report = TurnReport::new(1);
        Action::Clean.execute(&mut eco, &mut report).unwrap();
        assert_eq!(report.removed, 1);
        assert!(eco.grid().get(Cell::new(0, 0)).unwrap().is_none());
        assert!(eco.grid().get(Cell::new(0, 1)).unwrap().is_some());
    }

    #[test]
    fn test_move_all_steps_each_entity_once() {
        // A herbivore that moves into a cell later in row-major order must
        // not get a second step in the same phase.
        let mut eco = scenario(1, 6);
        let grid = eco.grid_mut();
        grid.place(Cell::new(0, 0), Entity::herbivore(3, 2)).unwrap();
        grid.place(Cell::new(0, 5), Entity::plant()).unwrap();

        let mut report = TurnReport::new(1);
        Action::MoveAll.execute(&mut eco, &mut report).unwrap();
        assert_eq!(report.moves, 1);
        let herbivore = eco.grid().get(Cell::new(0, 2)).unwrap().unwrap();
        assert_eq!(herbivore.kind(), Kind::Herbivore);
    }

    #[test]
    fn test_killed_prey_skips_its_step() {
        // Predator acts first (row-major) and kills the herbivore, which
        // then takes no step even though a plant is next to it.
        let mut eco = scenario(1, 3);
        let grid = eco.grid_mut();
        grid.place(Cell::new(0, 0), Entity::predator(5, 5, 9)).unwrap();
        grid.place(Cell::new(0, 1), Entity::herbivore(3, 3)).unwrap();
        grid.place(Cell::new(0, 2), Entity::plant()).unwrap();

        let mut report = TurnReport::new(1);
        Action::MoveAll.execute(&mut eco, &mut report).unwrap();
        assert_eq!(report.kills, 1);
        assert_eq!(report.meals, 0);
        assert!(eco.grid().get(Cell::new(0, 2)).unwrap().unwrap().is_alive());
    }

    #[test]
    fn test_restore_respects_target() {
        let mut eco = scenario(5, 12);
        let mut report = TurnReport::new(1);
        Action::Restore(RestoreRule::new(Kind::Plant, 0.04))
            .execute(&mut eco, &mut report)
            .unwrap();
        assert_eq!(report.restored, 3);
        assert_eq!(eco.grid().count(Kind::Plant), 3);
    }

    #[test]
    fn test_action_names() {
        assert_eq!(Action::Populate.name(), "populate");
        assert_eq!(Action::MoveAll.name(), "move");
        assert_eq!(Action::Clean.name(), "clean");
        assert_eq!(Action::Restore(RestoreRule::new(Kind::Plant, 0.1)).name(), "restore");
    }
}
