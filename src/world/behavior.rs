//! Per-creature turn step: feed or attack if food is adjacent, otherwise
//! walk toward the nearest food.

use crate::error::GridResult;
use crate::world::{find_path, Body, Cell, Grid};

/// What a single turn step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing acted: empty cell, terrain, a dead creature, or a creature
    /// with zero speed.
    Idle,
    /// A herbivore ate the plant at `target`.
    Fed {
        /// Cell of the eaten plant.
        target: Cell,
    },
    /// A predator attacked the herbivore at `target`.
    Attacked {
        /// Cell of the prey.
        target: Cell,
        /// Whether the prey died from this attack.
        killed: bool,
    },
    /// The creature walked toward food.
    Moved {
        /// Where it started.
        from: Cell,
        /// Where it stopped.
        to: Cell,
    },
    /// No food reachable; the creature held position.
    Stranded,
}

/// Run the turn step for whatever occupies `cell`.
///
/// The decision is made fresh every call: first look for food among
/// the neighbors in neighbor order and act on the first hit, otherwise
/// follow the shortest path toward food, advancing
/// `min(speed, path_len - 1)` cells so the creature always stops one cell
/// short of the food.
///
/// # Errors
///
/// Returns [`GridError::OutOfRange`](crate::GridError::OutOfRange) if `cell`
/// is off the grid. Other grid errors indicate a broken invariant.
pub fn take_turn(grid: &mut Grid, cell: Cell) -> GridResult<Outcome> {
    let Some(entity) = grid.get(cell)? else {
        return Ok(Outcome::Idle);
    };
    if !entity.is_alive() {
        return Ok(Outcome::Idle);
    }
    let Some(creature) = entity.creature().copied() else {
        return Ok(Outcome::Idle);
    };
    let attack_power = entity.attack_power();

    // Adjacent food first
    let neighbors = grid.neighbors(cell)?;
    if let Some(target) = neighbors.into_iter().find(|&n| grid.holds(n, creature.food)) {
        return bite(grid, target, attack_power);
    }

    // Otherwise seek
    let path = find_path(grid, cell, creature.food)?;
    let Some(reach) = path.len().checked_sub(1) else {
        return Ok(Outcome::Stranded);
    };
    let steps = usize::try_from(creature.speed).unwrap_or(usize::MAX).min(reach);
    if steps == 0 {
        // Food is reachable but the creature cannot move
        return Ok(Outcome::Idle);
    }

    let to = path[steps - 1];
    grid.relocate(cell, to)?;
    Ok(Outcome::Moved { from: cell, to })
}

/// Eat or attack the prey at `target`.
///
/// Plants die outright; anything with vitality takes `attack_power` damage.
fn bite(grid: &mut Grid, target: Cell, attack_power: Option<i32>) -> GridResult<Outcome> {
    let Some(prey) = grid.get_mut(target)? else {
        return Ok(Outcome::Idle);
    };

    let has_vitality = matches!(prey.body(), Body::Herbivore(_) | Body::Predator { .. });
    match attack_power {
        Some(power) if has_vitality => {
            let killed = prey.wound(power);
            Ok(Outcome::Attacked { target, killed })
        }
        _ => {
            prey.kill();
            Ok(Outcome::Fed { target })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Entity, Kind};

    #[test]
    fn test_herbivore_eats_adjacent_plant() {
        let mut grid = Grid::new(3, 3).unwrap();
        let herbivore = Cell::new(1, 1);
        let plant = Cell::new(1, 2);
        grid.place(herbivore, Entity::herbivore(3, 5)).unwrap();
        grid.place(plant, Entity::plant()).unwrap();

        let outcome = take_turn(&mut grid, herbivore).unwrap();
        assert_eq!(outcome, Outcome::Fed { target: plant });
        assert!(!grid.get(plant).unwrap().unwrap().is_alive());
        // Plant stays on the grid until cleaned, herbivore did not move
        assert_eq!(grid.get(herbivore).unwrap().unwrap().kind(), Kind::Herbivore);
    }

    #[test]
    fn test_predator_wounds_prey() {
        let mut grid = Grid::new(3, 3).unwrap();
        let predator = Cell::new(0, 0);
        let prey = Cell::new(0, 1);
        grid.place(predator, Entity::predator(6, 5, 2)).unwrap();
        grid.place(prey, Entity::herbivore(5, 3)).unwrap();

        let outcome = take_turn(&mut grid, predator).unwrap();
        assert_eq!(outcome, Outcome::Attacked { target: prey, killed: false });
        let victim = grid.get(prey).unwrap().unwrap();
        assert_eq!(victim.health(), Some(3));
        assert!(victim.is_alive());
    }

    #[test]
    fn test_predator_kills_prey() {
        let mut grid = Grid::new(3, 3).unwrap();
        let predator = Cell::new(0, 0);
        let prey = Cell::new(1, 0);
        grid.place(predator, Entity::predator(6, 5, 4)).unwrap();
        grid.place(prey, Entity::herbivore(4, 3)).unwrap();

        let outcome = take_turn(&mut grid, predator).unwrap();
        assert_eq!(outcome, Outcome::Attacked { target: prey, killed: true });
        assert!(!grid.get(prey).unwrap().unwrap().is_alive());
    }

    #[test]
    fn test_first_neighbor_in_order_wins() {
        let mut grid = Grid::new(3, 3).unwrap();
        let herbivore = Cell::new(1, 1);
        grid.place(herbivore, Entity::herbivore(3, 3)).unwrap();
        grid.place(Cell::new(1, 2), Entity::plant()).unwrap(); // right
        grid.place(Cell::new(2, 1), Entity::plant()).unwrap(); // down

        let outcome = take_turn(&mut grid, herbivore).unwrap();
        assert_eq!(outcome, Outcome::Fed { target: Cell::new(2, 1) });
        assert!(grid.get(Cell::new(1, 2)).unwrap().unwrap().is_alive());
    }

    #[test]
    fn test_stops_one_short_of_food() {
        let mut grid = Grid::new(1, 5).unwrap();
        let start = Cell::new(0, 0);
        grid.place(start, Entity::herbivore(3, 3)).unwrap();
        grid.place(Cell::new(0, 4), Entity::plant()).unwrap();

        let outcome = take_turn(&mut grid, start).unwrap();
        assert_eq!(outcome, Outcome::Moved { from: start, to: Cell::new(0, 3) });
        assert!(grid.get(start).unwrap().is_none());
    }

    #[test]
    fn test_speed_limits_progress() {
        let mut grid = Grid::new(1, 10).unwrap();
        let start = Cell::new(0, 0);
        grid.place(start, Entity::herbivore(3, 2)).unwrap();
        grid.place(Cell::new(0, 9), Entity::plant()).unwrap();

        let outcome = take_turn(&mut grid, start).unwrap();
        assert_eq!(outcome, Outcome::Moved { from: start, to: Cell::new(0, 2) });
    }

    #[test]
    fn test_fast_creature_never_lands_on_food() {
        let mut grid = Grid::new(1, 4).unwrap();
        let start = Cell::new(0, 0);
        grid.place(start, Entity::predator(5, 11, 4)).unwrap();
        grid.place(Cell::new(0, 3), Entity::herbivore(3, 3)).unwrap();

        let outcome = take_turn(&mut grid, start).unwrap();
        assert_eq!(outcome, Outcome::Moved { from: start, to: Cell::new(0, 2) });
        assert_eq!(grid.get(Cell::new(0, 3)).unwrap().unwrap().kind(), Kind::Herbivore);
    }

    #[test]
    fn test_stranded_without_food() {
        let mut grid = Grid::new(2, 2).unwrap();
        let start = Cell::new(0, 0);
        grid.place(start, Entity::herbivore(3, 3)).unwrap();
        grid.place(Cell::new(1, 1), Entity::rock()).unwrap();

        assert_eq!(take_turn(&mut grid, start).unwrap(), Outcome::Stranded);
        assert!(grid.get(start).unwrap().is_some());
    }

    #[test]
    fn test_dead_and_terrain_idle() {
        let mut grid = Grid::new(1, 3).unwrap();
        grid.place(Cell::new(0, 0), Entity::herbivore(0, 3)).unwrap();
        grid.place(Cell::new(0, 1), Entity::plant()).unwrap();
        grid.place(Cell::new(0, 2), Entity::tree()).unwrap();

        assert_eq!(take_turn(&mut grid, Cell::new(0, 0)).unwrap(), Outcome::Idle);
        assert_eq!(take_turn(&mut grid, Cell::new(0, 1)).unwrap(), Outcome::Idle);
        assert_eq!(take_turn(&mut grid, Cell::new(0, 2)).unwrap(), Outcome::Idle);
        assert!(grid.get(Cell::new(0, 1)).unwrap().unwrap().is_alive());
    }

    #[test]
    fn test_dead_food_still_eaten() {
        let mut grid = Grid::new(1, 2).unwrap();
        let plant = Cell::new(0, 1);
        grid.place(Cell::new(0, 0), Entity::herbivore(3, 3)).unwrap();
        grid.place(plant, Entity::plant()).unwrap();
        grid.get_mut(plant).unwrap().unwrap().kill();

        let outcome = take_turn(&mut grid, Cell::new(0, 0)).unwrap();
        assert_eq!(outcome, Outcome::Fed { target: plant });
        assert!(!grid.get(plant).unwrap().unwrap().is_alive());
        assert!(grid.get(Cell::new(0, 0)).unwrap().is_some());
    }

    #[test]
    fn test_dead_prey_still_attacked() {
        let mut grid = Grid::new(1, 2).unwrap();
        let prey = Cell::new(0, 1);
        grid.place(Cell::new(0, 0), Entity::predator(5, 5, 4)).unwrap();
        grid.place(prey, Entity::herbivore(0, 3)).unwrap();

        let outcome = take_turn(&mut grid, Cell::new(0, 0)).unwrap();
        assert_eq!(outcome, Outcome::Attacked { target: prey, killed: false });
        assert_eq!(grid.get(prey).unwrap().unwrap().health(), Some(-4));
    }

    #[test]
    fn test_zero_speed_is_idle() {
        let mut grid = Grid::new(1, 4).unwrap();
        let start = Cell::new(0, 0);
        grid.place(start, Entity::herbivore(3, 0)).unwrap();
        grid.place(Cell::new(0, 3), Entity::plant()).unwrap();

        assert_eq!(take_turn(&mut grid, start).unwrap(), Outcome::Idle);
        assert!(grid.get(start).unwrap().is_some());
    }
}
