//! Grid invariants - sanity checks that detect bugs.
//!
//! These should never trigger through the public grid API. If they do, some
//! code path mutated an entity behind the grid's back.

use crate::world::{Grid, Location};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check the structural invariants of a grid.
///
/// - every stored entity records the cell it is stored under
/// - every stored entity points back at this grid
/// - no creature is alive with non-positive health
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(grid: &Grid) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (cell, entity) in grid.iter() {
        match entity.location() {
            Some(Location { grid: id, cell: recorded }) => {
                if recorded != cell {
                    violations.push(InvariantViolation {
                        message: format!(
                            "{} {:?} stored at {cell} but records {recorded}",
                            entity.kind(),
                            entity.id()
                        ),
                    });
                }
                if id != grid.id() {
                    violations.push(InvariantViolation {
                        message: format!(
                            "{} at {cell} belongs to grid {id:?}, stored in {:?}",
                            entity.kind(),
                            grid.id()
                        ),
                    });
                }
            }
            None => violations.push(InvariantViolation {
                message: format!("{} at {cell} has no location", entity.kind()),
            }),
        }

        if let Some(health) = entity.health().filter(|&h| h <= 0 && entity.is_alive()) {
            violations.push(InvariantViolation {
                message: format!("{} at {cell} is alive with health {health}", entity.kind()),
            });
        }
    }

    violations
}

/// Check invariants that must hold right after the clean phase: everything
/// in [`check_invariants`] plus no dead entity left on the grid.
#[must_use]
pub fn check_clean(grid: &Grid) -> Vec<InvariantViolation> {
    let mut violations = check_invariants(grid);

    for (cell, entity) in grid.iter() {
        if !entity.is_alive() {
            violations.push(InvariantViolation {
                message: format!("dead {} left at {cell} after clean", entity.kind()),
            });
        }
    }

    violations
}
