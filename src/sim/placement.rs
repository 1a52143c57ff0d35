//! Random placement into empty cells.
//!
//! Placement draws from a shuffled snapshot of the currently empty cells
//! instead of sampling random cells until an empty one turns up, so it
//! finishes in one pass even on a nearly full grid.

// Target counts are derived from float densities
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::GridResult;
use crate::world::{Entity, Grid, Kind, Profiles};

/// Populate target: `round(area * density)`, ties to even.
#[must_use]
pub fn density_target(area: usize, density: f64) -> usize {
    (area as f64 * density).round_ties_even().max(0.0) as usize
}

/// Restore target: `ceil(area * coefficient)`.
#[must_use]
pub fn restore_target(area: usize, coefficient: f64) -> usize {
    (area as f64 * coefficient).ceil().max(0.0) as usize
}

/// Place up to `count` fresh entities of `kind` into random empty cells.
///
/// Returns how many were placed. Fewer than `count` are placed only when
/// the grid runs out of empty cells, which is logged as a warning.
///
/// # Errors
///
/// Propagates grid errors, which cannot occur for cells taken from the
/// empty snapshot.
pub fn scatter<R: Rng + ?Sized>(
    grid: &mut Grid,
    kind: Kind,
    count: usize,
    rng: &mut R,
    profiles: &Profiles,
) -> GridResult<usize> {
    if count == 0 {
        return Ok(0);
    }

    let mut empty = grid.empty_cells();
    if empty.len() < count {
        log::warn!(
            "only {} empty cells left for {count} {kind}(s); placing {}",
            empty.len(),
            empty.len()
        );
    }

    let (chosen, _) = empty.partial_shuffle(rng, count);
    for &cell in chosen.iter() {
        grid.place(cell, Entity::spawn(kind, rng, profiles))?;
    }

    Ok(chosen.len())
}
