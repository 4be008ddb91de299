//! # Geocoin
//!
//! Location-based coin collecting. The world is a lattice of small cells;
//! some cells hold caches of uniquely identified coins. Players walk the
//! world, take coins from caches in reach and leave them elsewhere.
//!
//! ## Architecture
//!
//! ```text
//! geocoin_procedural   grid, luck, spawn plans        (pure, deterministic)
//!        │
//! geocoin_economy      coins, caches, mementos, transfers
//!        │
//! geocoin              config, session, history, save/load
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use geocoin::{Direction, GameConfig, GameSession, MemoryStore};
//!
//! let mut session = GameSession::new(GameConfig::default())?;
//! session.step(Direction::North)?;
//!
//! for cache in session.visible_caches()? {
//!     session.poke(cache.cell())?;
//! }
//!
//! let mut store = MemoryStore::new();
//! session.save_to(&mut store)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod history;
pub mod persistence;
pub mod session;

pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use history::MovementHistory;
pub use persistence::{
    KeyValueStore, MemoryStore, SaveSnapshot, CACHE_MEMENTOS_KEY, MOVEMENT_HISTORY_KEY,
    PLAYER_COINS_KEY, POINTS_KEY,
};
pub use session::{Direction, GameSession};
