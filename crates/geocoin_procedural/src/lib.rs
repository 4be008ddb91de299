//! # Geocoin Procedural Generation
//!
//! Grid addressing and deterministic cache generation for an infinite,
//! reproducible world.
//!
//! ## Design Principles
//!
//! 1. **Canonical**: One `Arc<Cell>` per `(i, j)` for the life of an index
//! 2. **Deterministic**: Same seed and key always produce the same luck
//! 3. **Stateless**: Unvisited cells are never stored, only re-derived
//!
//! ## Core Components
//!
//! - `GridIndex`: Coordinates to cells, cells to bounds, neighborhoods
//! - `Luck`: Keyed pseudo-random values in `[0, 1)`
//! - `CacheGenerator`: Spawn decision and initial coin count per cell
//!
//! ## Example
//!
//! ```rust,ignore
//! use geocoin_procedural::{CacheGenerator, GeoPoint, GridIndex};
//!
//! let grid = GridIndex::new(1e-4, 8)?;
//! let generator = CacheGenerator::default();
//!
//! for cell in grid.cells_near_point_default(GeoPoint::new(36.9895, -122.0628))? {
//!     if let Some(plan) = generator.plan(*cell) {
//!         println!("cache at {} with {} coins", plan.cell, plan.coin_count);
//!     }
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod grid;
pub mod luck;
pub mod spawn;

pub use error::{GridError, GridResult};
pub use grid::{Cell, CellBounds, CellRef, GeoPoint, GridIndex, MAX_NEIGHBORHOOD_RADIUS};
pub use luck::{KeyPart, Luck, WorldSeed};
pub use spawn::{CacheGenerator, SpawnPlan, COIN_COUNT_SALT};
