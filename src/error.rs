//! Error types for the grid store and the simulation built on top of it.

use std::fmt;
use std::path::PathBuf;

use crate::world::Cell;

/// Why a raw coordinate key was rejected before bounds checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDefect {
    /// The key did not have exactly two components.
    NotAPair,
    /// A component could not be read as an integer.
    NonInteger,
}

impl fmt::Display for KeyDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAPair => write!(f, "expected exactly two components"),
            Self::NonInteger => write!(f, "components must be integers"),
        }
    }
}

/// Contract violations reported by the grid store.
///
/// None of these are gameplay events: the pipeline pre-checks emptiness
/// before placing, so seeing one means a caller misused the grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The coordinate argument is not a pair of integers.
    #[error("invalid cell key `{key}`: {defect}")]
    InvalidKey {
        /// The offending key as written by the caller.
        key: String,
        /// What is wrong with it.
        defect: KeyDefect,
    },
    /// The coordinate lies outside `[0, rows) x [0, cols)`.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfRange {
        /// Requested row.
        row: i64,
        /// Requested column.
        col: i64,
        /// Grid height.
        rows: u16,
        /// Grid width.
        cols: u16,
    },
    /// Placement or relocation into a cell that already holds an entity.
    #[error("cell {0} is already occupied")]
    Occupied(Cell),
    /// Relocation out of a cell that holds nothing.
    #[error("cell {0} holds no entity")]
    Vacant(Cell),
    /// A label that does not name any entity variant.
    #[error("unrecognized entity `{0}`")]
    InvalidEntity(String),
}

/// Errors raised while loading or validating a [`SimConfig`](crate::sim::SimConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The config file is not valid JSON for a `SimConfig`.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File that was being parsed.
        path: PathBuf,
        /// Underlying parse failure.
        source: serde_json::Error,
    },
    /// A field holds a value the simulation cannot run with.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level error for building and stepping a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A grid operation failed.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for grid operations.
pub type GridResult<T> = Result<T, GridError>;
