//! Benchmarks for the turn pipeline.
//!
//! Pathfinding dominates a turn, so the grid sizes here are picked to show
//! how BFS scales with area.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use ecosim::world::find_path;
use ecosim::{Cell, Ecosystem, Entity, Grid, Kind, SimConfig};

fn populated(rows: u16, cols: u16) -> Ecosystem {
    let config = SimConfig {
        rows,
        cols,
        seed: Some(42),
        ..SimConfig::default()
    };
    let mut eco = Ecosystem::new(config).unwrap();
    eco.populate().unwrap();
    eco
}

fn bench_populate(c: &mut Criterion) {
    c.bench_function("populate_40x40", |b| {
        b.iter(|| black_box(populated(black_box(40), black_box(40))));
    });
}

fn bench_single_turn(c: &mut Criterion) {
    for (rows, cols) in [(5, 12), (20, 20), (40, 40)] {
        c.bench_function(&format!("turn_{rows}x{cols}"), |b| {
            b.iter_batched(
                || populated(rows, cols),
                |mut eco| black_box(eco.step().unwrap()),
                BatchSize::SmallInput,
            );
        });
    }
}

fn bench_ten_turns(c: &mut Criterion) {
    c.bench_function("10_turns_20x20", |b| {
        b.iter_batched(
            || populated(20, 20),
            |mut eco| {
                for _ in 0..10 {
                    black_box(eco.step().unwrap());
                }
                eco
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_bfs_open_grid(c: &mut Criterion) {
    // Worst case: food in the far corner of an empty grid
    let mut grid = Grid::new(64, 64).unwrap();
    grid.place(Cell::new(63, 63), Entity::plant()).unwrap();

    c.bench_function("bfs_64x64_corner", |b| {
        b.iter(|| {
            let path = find_path(black_box(&grid), black_box(Cell::new(0, 0)), Kind::Plant);
            black_box(path)
        });
    });
}

criterion_group!(
    benches,
    bench_populate,
    bench_single_turn,
    bench_ten_turns,
    bench_bfs_open_grid
);
criterion_main!(benches);
