#![no_main]

//! Grid and turn fuzzer.
//!
//! Builds a small grid from arbitrary placements, removals and moves, then
//! runs a few full turns. After every step the grid must still pass the
//! invariant checker, and no turn may leave a dead entity behind.

use arbitrary::Arbitrary;
use ecosim::world::{check_clean, check_invariants, take_turn};
use ecosim::{Cell, Ecosystem, Entity, GridError, SimConfig};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated grid operation.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzOp {
    /// Place an entity of the given variant.
    Place { row: u8, col: u8, variant: u8, health: i8, speed: u8, attack: i8 },
    /// Remove whatever is at a cell.
    Remove { row: u8, col: u8 },
    /// Relocate between two cells.
    Relocate { from_row: u8, from_col: u8, to_row: u8, to_col: u8 },
    /// Run one behavior step on a cell.
    Step { row: u8, col: u8 },
}

/// Structured input for turn fuzzing.
#[derive(Arbitrary, Debug)]
struct TurnInput {
    rows: u8,
    cols: u8,
    ops: Vec<FuzzOp>,
    seed: u64,
    turns: u8,
}

fn entity(variant: u8, health: i8, speed: u8, attack: i8) -> Entity {
    let health = i32::from(health);
    let speed = u32::from(speed % 16);
    match variant % 5 {
        0 => Entity::plant(),
        1 => Entity::rock(),
        2 => Entity::tree(),
        3 => Entity::herbivore(health, speed),
        _ => Entity::predator(health, speed, i32::from(attack)),
    }
}

fn check(result: Result<(), GridError>) {
    match result {
        Ok(())
        | Err(
            GridError::Occupied(_) | GridError::Vacant(_) | GridError::OutOfRange { .. },
        ) => {}
        Err(e) => panic!("unexpected grid error: {e}"),
    }
}

fuzz_target!(|input: TurnInput| {
    // Cap sizes to avoid excessive runtime
    let rows = u16::from(input.rows % 16).max(1);
    let cols = u16::from(input.cols % 16).max(1);
    let config = SimConfig {
        rows,
        cols,
        seed: Some(input.seed),
        ..SimConfig::default()
    };
    let Ok(mut eco) = Ecosystem::new(config) else {
        return;
    };

    // Ops may aim one past the edge to exercise bounds checks
    let cell = |r: u8, c: u8| Cell::new(u16::from(r) % (rows + 1), u16::from(c) % (cols + 1));

    for op in input.ops.into_iter().take(64) {
        let grid = eco.grid_mut();
        let result = match op {
            FuzzOp::Place { row, col, variant, health, speed, attack } => grid
                .place(cell(row, col), entity(variant, health, speed, attack))
                .map(|_| ()),
            FuzzOp::Remove { row, col } => grid.remove(cell(row, col)).map(|_| ()),
            FuzzOp::Relocate { from_row, from_col, to_row, to_col } => {
                grid.relocate(cell(from_row, from_col), cell(to_row, to_col))
            }
            FuzzOp::Step { row, col } => take_turn(grid, cell(row, col)).map(|_| ()),
        };
        check(result);

        let violations = check_invariants(eco.grid());
        assert!(violations.is_empty(), "invariants violated: {violations:?}");
    }

    for _ in 0..(input.turns % 8) {
        eco.step().expect("turn failed");
        assert!(check_clean(eco.grid()).is_empty());
    }
});
