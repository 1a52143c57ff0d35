//! Grid store: sparse cell-to-entity storage with bounds and occupancy checks.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{GridError, GridResult, KeyDefect};
use crate::world::{Entity, EntityId, Kind, Location};

/// Source of process-unique grid identifiers.
static NEXT_GRID_ID: AtomicU64 = AtomicU64::new(1);

/// A cell on the grid.
///
/// Cells order row-major, which fixes iteration order across the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Row index (0 is the top row).
    pub row: u16,
    /// Column index (0 is the left column).
    pub col: u16,
}

impl Cell {
    /// Create a new cell.
    #[must_use]
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Identity of a grid, held by entities as a non-owning back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridId(u64);

/// The grid store.
///
/// Owns every entity on the board. Entities only remember where they are
/// (see [`Location`]); creating, moving and dropping them goes through here.
#[derive(Debug)]
pub struct Grid {
    id: GridId,
    rows: u16,
    cols: u16,
    cells: BTreeMap<Cell, Entity>,
    next_entity: u64,
}

impl Grid {
    /// Create an empty grid of `rows x cols` cells.
    ///
    /// Returns `None` if either dimension is zero.
    #[must_use]
    pub fn new(rows: u16, cols: u16) -> Option<Self> {
        if rows == 0 || cols == 0 {
            return None;
        }

        Some(Self {
            id: GridId(NEXT_GRID_ID.fetch_add(1, Ordering::Relaxed)),
            rows,
            cols,
            cells: BTreeMap::new(),
            next_entity: 1,
        })
    }

    /// Identity stamped into every entity placed on this grid.
    #[must_use]
    pub const fn id(&self) -> GridId {
        self.id
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> u16 {
        self.cols
    }

    /// Total number of cells.
    #[must_use]
    pub fn area(&self) -> usize {
        usize::from(self.rows) * usize::from(self.cols)
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check that a cell lies inside the grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`] if it does not.
    pub fn validate(&self, cell: Cell) -> GridResult<Cell> {
        if cell.row < self.rows && cell.col < self.cols {
            Ok(cell)
        } else {
            Err(self.out_of_range(i64::from(cell.row), i64::from(cell.col)))
        }
    }

    /// Turn raw integer components into a validated cell.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidKey`] unless there are exactly two
    /// components, and [`GridError::OutOfRange`] if they fall off the grid.
    pub fn key(&self, components: &[i64]) -> GridResult<Cell> {
        let &[row, col] = components else {
            return Err(GridError::InvalidKey {
                key: format!("{components:?}"),
                defect: KeyDefect::NotAPair,
            });
        };

        match (u16::try_from(row), u16::try_from(col)) {
            (Ok(r), Ok(c)) if r < self.rows && c < self.cols => Ok(Cell::new(r, c)),
            _ => Err(self.out_of_range(row, col)),
        }
    }

    /// Parse a `row,col` key (optionally wrapped in parentheses).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidKey`] for anything that is not two
    /// comma-separated integers, and [`GridError::OutOfRange`] for cells off
    /// the grid.
    pub fn parse_key(&self, text: &str) -> GridResult<Cell> {
        let trimmed = text.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(trimmed);

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(GridError::InvalidKey {
                key: text.to_string(),
                defect: KeyDefect::NotAPair,
            });
        }

        let mut components = [0i64; 2];
        for (slot, part) in components.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| GridError::InvalidKey {
                key: text.to_string(),
                defect: KeyDefect::NonInteger,
            })?;
        }

        self.key(&components)
    }

    /// Place an entity into an empty cell.
    ///
    /// Stamps the entity with a fresh [`EntityId`] and its [`Location`].
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`] for cells off the grid and
    /// [`GridError::Occupied`] if the cell already holds an entity. The grid
    /// is unchanged on error.
    pub fn place(&mut self, cell: Cell, mut entity: Entity) -> GridResult<EntityId> {
        let cell = self.validate(cell)?;
        if self.cells.contains_key(&cell) {
            return Err(GridError::Occupied(cell));
        }

        let id = EntityId(self.next_entity);
        self.next_entity += 1;

        entity.set_id(id);
        entity.set_location(Some(Location { grid: self.id, cell }));
        self.cells.insert(cell, entity);

        Ok(id)
    }

    /// Get the entity at a cell, if any.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`] for cells off the grid.
    pub fn get(&self, cell: Cell) -> GridResult<Option<&Entity>> {
        let cell = self.validate(cell)?;
        Ok(self.cells.get(&cell))
    }

    /// Get a mutable reference to the entity at a cell, if any.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`] for cells off the grid.
    pub fn get_mut(&mut self, cell: Cell) -> GridResult<Option<&mut Entity>> {
        let cell = self.validate(cell)?;
        Ok(self.cells.get_mut(&cell))
    }

    /// Remove and return the entity at a cell. Removing from an empty cell
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`] for cells off the grid.
    pub fn remove(&mut self, cell: Cell) -> GridResult<Option<Entity>> {
        let cell = self.validate(cell)?;
        Ok(self.cells.remove(&cell).map(|mut entity| {
            entity.set_location(None);
            entity
        }))
    }

    /// Whether a cell holds no entity.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`] for cells off the grid.
    pub fn is_vacant(&self, cell: Cell) -> GridResult<bool> {
        let cell = self.validate(cell)?;
        Ok(!self.cells.contains_key(&cell))
    }

    /// Orthogonally adjacent in-bounds cells, in the order up, down, left,
    /// right.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`] for cells off the grid.
    pub fn neighbors(&self, cell: Cell) -> GridResult<Vec<Cell>> {
        let Cell { row, col } = self.validate(cell)?;
        let mut result = Vec::with_capacity(4);

        if row > 0 {
            result.push(Cell::new(row - 1, col)); // up
        }
        if row + 1 < self.rows {
            result.push(Cell::new(row + 1, col)); // down
        }
        if col > 0 {
            result.push(Cell::new(row, col - 1)); // left
        }
        if col + 1 < self.cols {
            result.push(Cell::new(row, col + 1)); // right
        }

        Ok(result)
    }

    /// Move the entity at `from` to the empty cell `to`.
    ///
    /// Identity and vitality are preserved; only the location changes.
    /// Moving an entity onto its own cell is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`] for cells off the grid,
    /// [`GridError::Vacant`] if `from` is empty and [`GridError::Occupied`]
    /// if `to` is taken. Nothing moves on error.
    pub fn relocate(&mut self, from: Cell, to: Cell) -> GridResult<()> {
        let from = self.validate(from)?;
        let to = self.validate(to)?;

        if !self.cells.contains_key(&from) {
            return Err(GridError::Vacant(from));
        }
        if from == to {
            return Ok(());
        }
        if self.cells.contains_key(&to) {
            return Err(GridError::Occupied(to));
        }

        let Some(mut entity) = self.cells.remove(&from) else {
            return Err(GridError::Vacant(from));
        };
        entity.set_location(Some(Location {
            grid: self.id,
            cell: to,
        }));
        self.cells.insert(to, entity);

        Ok(())
    }

    /// Snapshot of every occupied cell, row-major.
    ///
    /// The snapshot is detached from the grid, so callers may mutate the
    /// grid while walking it.
    #[must_use]
    pub fn occupied_cells(&self) -> Vec<Cell> {
        self.cells.keys().copied().collect()
    }

    /// Snapshot of every empty cell, row-major.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<Cell> {
        self.all_cells()
            .filter(|cell| !self.cells.contains_key(cell))
            .collect()
    }

    /// Iterate over every cell of the grid, row-major, occupied or not.
    pub fn all_cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Cell::new(row, col)))
    }

    /// Iterate over occupied cells and their entities.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &Entity)> {
        self.cells.iter().map(|(cell, entity)| (*cell, entity))
    }

    /// Count entities of a kind, dead or alive.
    #[must_use]
    pub fn count(&self, kind: Kind) -> usize {
        self.cells.values().filter(|e| e.kind() == kind).count()
    }

    /// Entity at a cell that is already known to be in bounds.
    pub(crate) fn occupant(&self, cell: Cell) -> Option<&Entity> {
        self.cells.get(&cell)
    }

    /// Whether an in-bounds cell holds an entity of the given kind, dead or
    /// alive.
    pub(crate) fn holds(&self, cell: Cell, kind: Kind) -> bool {
        self.cells.get(&cell).is_some_and(|e| e.kind() == kind)
    }

    fn out_of_range(&self, row: i64, col: i64) -> GridError {
        GridError::OutOfRange {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        }
    }
}
