//! Breadth-first search toward the nearest cell holding a given kind.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::GridResult;
use crate::world::{Cell, Grid, Kind};

/// Find the shortest path from `start` to the nearest `target`.
///
/// A cell can be expanded when it is empty or holds a `target`, dead or
/// alive; any other occupant blocks passage. Ties between equally short
/// paths are broken by neighbor order (up, down, left, right).
///
/// The returned path starts with the first step after `start` and ends with
/// the target cell itself. It is empty when no target is reachable.
///
/// # Errors
///
/// Returns [`GridError::OutOfRange`](crate::GridError::OutOfRange) if
/// `start` is off the grid.
pub fn find_path(grid: &Grid, start: Cell, target: Kind) -> GridResult<Vec<Cell>> {
    let start = grid.validate(start)?;

    let mut visited: HashSet<Cell> = HashSet::with_capacity(grid.area());
    let mut parent: HashMap<Cell, Cell> = HashMap::new();
    let mut frontier: VecDeque<Cell> = VecDeque::new();

    visited.insert(start);
    frontier.push_back(start);

    while let Some(cell) = frontier.pop_front() {
        if cell != start && grid.holds(cell, target) {
            return Ok(trace_back(&parent, start, cell));
        }

        for next in grid.neighbors(cell)? {
            if visited.contains(&next) {
                continue;
            }
            let passable = match grid.occupant(next) {
                None => true,
                Some(entity) => entity.kind() == target,
            };
            if passable {
                visited.insert(next);
                parent.insert(next, cell);
                frontier.push_back(next);
            }
        }
    }

    Ok(Vec::new())
}

/// Walk parent links from `goal` back to `start`, excluding `start`.
fn trace_back(parent: &HashMap<Cell, Cell>, start: Cell, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut cursor = goal;
    while let Some(&prev) = parent.get(&cursor) {
        if prev == start {
            break;
        }
        path.push(prev);
        cursor = prev;
    }
    path.reverse();
    path
}
