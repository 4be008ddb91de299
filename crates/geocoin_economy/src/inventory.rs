//! # Player Inventory
//!
//! The coins a player carries, oldest first. Same queue discipline as a
//! cache: deposits give away the oldest coin, new coins join the back.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::coin::Coin;

/// Coins held by the player.
///
/// Coins only arrive through [`crate::transfer::collect`]; outside this
/// crate there is no way to push one:
///
/// ```compile_fail
/// use geocoin_economy::{Coin, PlayerInventory};
/// use geocoin_procedural::Cell;
///
/// let mut inventory = PlayerInventory::new();
/// inventory.push(Coin::new(Cell::new(0, 0), 0));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerInventory {
    /// Coins, oldest first.
    coins: VecDeque<Coin>,
}

impl PlayerInventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an inventory holding the given coins, oldest first.
    #[must_use]
    pub fn from_coins(coins: impl IntoIterator<Item = Coin>) -> Self {
        Self {
            coins: coins.into_iter().collect(),
        }
    }

    /// Returns the coins, oldest first.
    #[inline]
    #[must_use]
    pub const fn coins(&self) -> &VecDeque<Coin> {
        &self.coins
    }

    /// Returns the number of coins held.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.coins.len()
    }

    /// Returns true if the player holds no coins.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Returns true if the player holds this exact coin.
    #[must_use]
    pub fn contains(&self, coin: &Coin) -> bool {
        self.coins.contains(coin)
    }

    /// Receives a coin withdrawn from a cache.
    pub(crate) fn push(&mut self, coin: Coin) {
        self.coins.push_back(coin);
    }

    /// Drops every coin (full reset only).
    pub fn clear(&mut self) {
        self.coins.clear();
    }

    /// Removes the oldest coin.
    pub(crate) fn take_oldest(&mut self) -> Option<Coin> {
        self.coins.pop_front()
    }
}
