//! # Game Error Types

use std::path::PathBuf;

use geocoin_economy::EconomyError;
use geocoin_procedural::{Cell, GridError};
use thiserror::Error;

/// Errors surfaced by a game session.
#[derive(Error, Debug)]
pub enum GameError {
    /// Cache generation, restore or encoding failed.
    #[error(transparent)]
    Economy(#[from] EconomyError),

    /// A point or cell was rejected by the grid.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Configuration values are out of range or unparseable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("failed to read config {path:?}: {source}")]
    ConfigIo {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A persisted snapshot entry is not valid.
    #[error("snapshot entry {key:?} is malformed: {reason}")]
    Snapshot {
        /// Storage key of the entry.
        key: String,
        /// Parser message.
        reason: String,
    },

    /// Poke or deposit aimed at a cell without a cache.
    #[error("no cache at cell {0}")]
    NoCacheAtCell(Cell),
}

/// Result type for session operations.
pub type GameResult<T> = Result<T, GameError>;
