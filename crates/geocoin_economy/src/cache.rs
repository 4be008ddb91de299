//! # Cache State
//!
//! The live contents of one cell's cache: an ordered queue of coins.
//!
//! The oldest coin sits at the front and leaves first; deposits join at
//! the back. Only the transfer protocol mutates a cache, and every
//! mutation must be followed by `CacheStore::commit`.

use std::collections::{HashSet, VecDeque};

use geocoin_procedural::{Cell, SpawnPlan};

use crate::coin::Coin;
use crate::error::{EconomyError, EconomyResult};
use crate::memento::{CacheMemento, MEMENTO_VERSION};

/// Capture/restore contract for state that outlives its in-memory object.
pub trait Memento: Sized {
    /// The captured, serializable form.
    type Snapshot;

    /// Captures the current state.
    fn capture(&self) -> Self::Snapshot;

    /// Rebuilds state from a capture.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is inconsistent.
    fn restore(snapshot: Self::Snapshot) -> EconomyResult<Self>;
}

/// A materialized cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheState {
    /// Cell this cache belongs to.
    cell: Cell,
    /// Coins, oldest first.
    coins: VecDeque<Coin>,
}

impl CacheState {
    /// Creates a cache holding the given coins, oldest first.
    #[must_use]
    pub fn new(cell: Cell, coins: impl IntoIterator<Item = Coin>) -> Self {
        Self {
            cell,
            coins: coins.into_iter().collect(),
        }
    }

    /// Creates a freshly generated cache from a spawn plan.
    #[must_use]
    pub fn generate(plan: SpawnPlan) -> Self {
        Self::new(plan.cell, Coin::mint(plan))
    }

    /// Returns the cache's cell.
    #[inline]
    #[must_use]
    pub const fn cell(&self) -> Cell {
        self.cell
    }

    /// Returns the coins, oldest first.
    #[inline]
    #[must_use]
    pub const fn coins(&self) -> &VecDeque<Coin> {
        &self.coins
    }

    /// Returns the number of coins.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.coins.len()
    }

    /// Returns true if the cache holds no coins.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Removes the oldest coin.
    pub(crate) fn take_oldest(&mut self) -> Option<Coin> {
        self.coins.pop_front()
    }

    /// Appends a coin behind all others.
    pub(crate) fn push_newest(&mut self, coin: Coin) {
        self.coins.push_back(coin);
    }
}

impl Memento for CacheState {
    type Snapshot = CacheMemento;

    fn capture(&self) -> CacheMemento {
        CacheMemento {
            version: MEMENTO_VERSION,
            cell: self.cell,
            coins: self.coins.iter().copied().collect(),
        }
    }

    fn restore(snapshot: CacheMemento) -> EconomyResult<Self> {
        let key = snapshot.cell.key();
        if snapshot.version != MEMENTO_VERSION {
            return Err(EconomyError::corrupt(
                key,
                format!("unsupported memento version {}", snapshot.version),
            ));
        }

        let mut seen = HashSet::with_capacity(snapshot.coins.len());
        if let Some(dup) = snapshot.coins.iter().find(|coin| !seen.insert(**coin)) {
            return Err(EconomyError::corrupt(key, format!("coin {dup} listed twice")));
        }

        Ok(Self::new(snapshot.cell, snapshot.coins))
    }
}
