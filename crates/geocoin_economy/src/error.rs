//! # Economy Error Types
//!
//! All errors that can occur while generating, restoring or storing caches.

use geocoin_procedural::{Cell, GridError};
use thiserror::Error;

/// Errors that can occur in the economy system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EconomyError {
    /// A stored memento could not be decoded into a cache.
    #[error("corrupt state for cell {key}: {reason}")]
    CorruptState {
        /// Persistence key of the cell.
        key: String,
        /// What was wrong with the blob.
        reason: String,
    },

    /// A cell address was rejected by the grid.
    #[error(transparent)]
    InvalidCell(#[from] GridError),

    /// An import listed the same cell more than once.
    #[error("duplicate memento for cell {0}")]
    DuplicateCell(Cell),

    /// A cache could not be encoded.
    #[error("failed to encode memento for cell {key}: {reason}")]
    Encode {
        /// Persistence key of the cell.
        key: String,
        /// Encoder message.
        reason: String,
    },
}

impl EconomyError {
    /// Builds a `CorruptState` error.
    pub(crate) fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptState {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for a corrupt memento.
    #[must_use]
    pub const fn is_corrupt_state(&self) -> bool {
        matches!(self, Self::CorruptState { .. })
    }
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;
