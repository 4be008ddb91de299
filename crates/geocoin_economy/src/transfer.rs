//! # Transfer Protocol
//!
//! Moves coins one at a time between a cache and the player.
//!
//! ## Rules
//!
//! 1. Exactly one coin moves, or none if the source is empty
//! 2. An empty source is normal and yields `None`, never an error
//! 3. A coin leaves its source queue before it joins the destination
//! 4. The caller commits the mutated cache to the `CacheStore`
//!
//! ```text
//! poke:    cache.front  ──> inventory.back
//! deposit: inventory.front ──> cache.back
//! ```

use crate::cache::CacheState;
use crate::coin::Coin;
use crate::inventory::PlayerInventory;

/// Removes and returns the oldest coin in the cache.
///
/// The caller owns the coin and must hand it to the player's inventory.
pub fn withdraw(cache: &mut CacheState) -> Option<Coin> {
    let coin = cache.take_oldest()?;
    tracing::debug!("Withdrew {} from cache {}", coin, cache.cell());
    Some(coin)
}

/// Moves the player's oldest coin to the back of the cache.
pub fn deposit(cache: &mut CacheState, inventory: &mut PlayerInventory) -> Option<Coin> {
    let coin = inventory.take_oldest()?;
    cache.push_newest(coin);
    tracing::debug!("Deposited {} into cache {}", coin, cache.cell());
    Some(coin)
}

/// Withdraws the oldest coin and hands it straight to the player.
pub fn collect(cache: &mut CacheState, inventory: &mut PlayerInventory) -> Option<Coin> {
    let coin = withdraw(cache)?;
    inventory.push(coin);
    Some(coin)
}
