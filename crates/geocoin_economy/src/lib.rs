//! # Geocoin Economy
//!
//! Coins, caches and the rules for moving coins between them.
//!
//! ## Design Principles
//!
//! 1. **Conservation** - A transfer moves exactly one coin, or none
//! 2. **Identity** - A coin's home cell and serial never change
//! 3. **Lazy** - Caches are generated on first visit, then live as mementos
//! 4. **Explicit commits** - A mutated cache is durable only once committed
//!
//! ## Example
//!
//! ```rust,ignore
//! use geocoin_economy::{transfer, CacheStore, PlayerInventory};
//! use geocoin_procedural::{CacheGenerator, Cell};
//!
//! let mut store = CacheStore::new(CacheGenerator::default());
//! let mut inventory = PlayerInventory::new();
//!
//! let mut cache = store.materialize(Cell::new(3, -2))?;
//! if let Some(coin) = transfer::collect(&mut cache, &mut inventory) {
//!     println!("picked up {coin}");
//! }
//! store.commit(&cache)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cache;
pub mod coin;
pub mod error;
pub mod inventory;
pub mod memento;
pub mod store;
pub mod transfer;

pub use cache::{CacheState, Memento};
pub use coin::Coin;
pub use error::{EconomyError, EconomyResult};
pub use inventory::PlayerInventory;
pub use memento::{CacheMemento, MementoBlob, MEMENTO_VERSION};
pub use store::CacheStore;
