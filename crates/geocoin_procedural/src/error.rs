//! # Grid Error Types
//!
//! Every way a coordinate or cell address can be rejected.

use thiserror::Error;

/// Errors raised while addressing the cell grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// A coordinate was NaN or infinite.
    #[error("invalid cell: point ({lat}, {lng}) is not finite")]
    NonFinitePoint {
        /// Latitude of the rejected point.
        lat: f64,
        /// Longitude of the rejected point.
        lng: f64,
    },

    /// A cell index does not fit the grid's integer range.
    #[error("invalid cell: index {value} is out of range")]
    CellOutOfRange {
        /// The offending index, before truncation.
        value: f64,
    },

    /// A persisted cell key could not be parsed.
    #[error("invalid cell: malformed key {0:?}")]
    MalformedCellKey(String),

    /// A neighborhood radius exceeds the supported maximum.
    #[error("neighborhood radius {radius} exceeds maximum {max}")]
    RadiusTooLarge {
        /// Requested radius, in cells.
        radius: u32,
        /// Largest accepted radius.
        max: u32,
    },

    /// The tile size must be a positive, finite number of degrees.
    #[error("invalid tile size: {0}")]
    InvalidTileSize(f64),
}

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;
