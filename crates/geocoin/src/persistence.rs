//! # Save Snapshots
//!
//! Game state persisted to a flat string key-value store, one JSON value
//! per key.
//!
//! ## Format
//!
//! ```text
//! "playerCoins"      [{"home":{"i":..,"j":..},"serial":..}, ...]   oldest first
//! "cacheMementos"    [["i,j", "<memento blob>"], ...]              key order
//! "movementHistory"  [{"lat":..,"lng":..}, ...]                    oldest first
//! "points"           integer
//! ```
//!
//! A missing key reads as its empty default, so a fresh store loads as a
//! new game. A present but malformed key is an error.

use std::collections::HashMap;

use geocoin_economy::PlayerInventory;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{GameError, GameResult};
use crate::history::MovementHistory;

/// Key holding the player's coins.
pub const PLAYER_COINS_KEY: &str = "playerCoins";
/// Key holding every cache memento.
pub const CACHE_MEMENTOS_KEY: &str = "cacheMementos";
/// Key holding the movement history.
pub const MOVEMENT_HISTORY_KEY: &str = "movementHistory";
/// Key holding the player's points.
pub const POINTS_KEY: &str = "points";

/// Host-provided string storage (browser local storage, a file, a table).
pub trait KeyValueStore {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String);

    /// Removes `key` if present.
    fn remove(&mut self, key: &str);
}

/// In-process key-value store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Everything needed to resume a game.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SaveSnapshot {
    /// Player's coins, oldest first.
    pub player_coins: PlayerInventory,
    /// `(cell key, memento blob)` pairs.
    pub cache_mementos: Vec<(String, String)>,
    /// Visited points, oldest first.
    pub movement_history: MovementHistory,
    /// Coins withdrawn so far.
    pub points: u64,
}

impl SaveSnapshot {
    /// Writes every entry to the store.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Snapshot` if an entry cannot be serialized.
    pub fn write_to(&self, store: &mut impl KeyValueStore) -> GameResult<()> {
        store.set(PLAYER_COINS_KEY, encode(PLAYER_COINS_KEY, &self.player_coins)?);
        store.set(CACHE_MEMENTOS_KEY, encode(CACHE_MEMENTOS_KEY, &self.cache_mementos)?);
        store.set(
            MOVEMENT_HISTORY_KEY,
            encode(MOVEMENT_HISTORY_KEY, &self.movement_history)?,
        );
        store.set(POINTS_KEY, encode(POINTS_KEY, &self.points)?);
        tracing::debug!(
            "Saved {} coins, {} caches, {} history points",
            self.player_coins.len(),
            self.cache_mementos.len(),
            self.movement_history.len()
        );
        Ok(())
    }

    /// Reads a snapshot, defaulting any missing entry.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Snapshot` naming the first malformed entry.
    pub fn read_from(store: &impl KeyValueStore) -> GameResult<Self> {
        Ok(Self {
            player_coins: decode(store, PLAYER_COINS_KEY)?,
            cache_mementos: decode(store, CACHE_MEMENTOS_KEY)?,
            movement_history: decode(store, MOVEMENT_HISTORY_KEY)?,
            points: decode(store, POINTS_KEY)?,
        })
    }

    /// Removes every snapshot entry from the store.
    pub fn erase_from(store: &mut impl KeyValueStore) {
        for key in [PLAYER_COINS_KEY, CACHE_MEMENTOS_KEY, MOVEMENT_HISTORY_KEY, POINTS_KEY] {
            store.remove(key);
        }
    }
}

fn encode<T: Serialize>(key: &str, value: &T) -> GameResult<String> {
    serde_json::to_string(value).map_err(|e| GameError::Snapshot {
        key: key.to_owned(),
        reason: e.to_string(),
    })
}

fn decode<T: DeserializeOwned + Default>(store: &impl KeyValueStore, key: &str) -> GameResult<T> {
    let Some(raw) = store.get(key) else {
        return Ok(T::default());
    };
    serde_json::from_str(&raw).map_err(|e| GameError::Snapshot {
        key: key.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocoin_economy::Coin;
    use geocoin_procedural::{Cell, GeoPoint};

    fn sample() -> SaveSnapshot {
        SaveSnapshot {
            player_coins: PlayerInventory::from_coins([Coin::new(Cell::new(1, -1), 0)]),
            cache_mementos: vec![("1,-1".to_owned(), "{}".to_owned())],
            movement_history: MovementHistory::from_points([GeoPoint::new(0.25, 0.75)]),
            points: 3,
        }
    }

    #[test]
    fn test_write_read_round_trip() {
        let mut store = MemoryStore::new();
        sample().write_to(&mut store).unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(SaveSnapshot::read_from(&store).unwrap(), sample());
    }

    #[test]
    fn test_key_layout() {
        let mut store = MemoryStore::new();
        sample().write_to(&mut store).unwrap();
        assert_eq!(store.get(CACHE_MEMENTOS_KEY).unwrap(), r#"[["1,-1","{}"]]"#);
        assert_eq!(store.get(POINTS_KEY).unwrap(), "3");
    }

    #[test]
    fn test_empty_store_reads_default() {
        let store = MemoryStore::new();
        assert_eq!(SaveSnapshot::read_from(&store).unwrap(), SaveSnapshot::default());
    }

    #[test]
    fn test_malformed_entry_is_named() {
        let mut store = MemoryStore::new();
        store.set(MOVEMENT_HISTORY_KEY, "not json".to_owned());

        match SaveSnapshot::read_from(&store) {
            Err(GameError::Snapshot { key, .. }) => assert_eq!(key, MOVEMENT_HISTORY_KEY),
            other => panic!("expected snapshot error, got {other:?}"),
        }
    }

    #[test]
    fn test_erase() {
        let mut store = MemoryStore::new();
        sample().write_to(&mut store).unwrap();
        store.set("unrelated", "kept".to_owned());

        SaveSnapshot::erase_from(&mut store);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("unrelated").as_deref(), Some("kept"));
    }
}
