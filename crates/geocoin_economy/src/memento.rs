//! # Cache Mementos
//!
//! The durable form of a cache. A memento exists for every cache ever
//! generated, whether or not a `CacheState` is currently materialized.
//!
//! ## Format
//!
//! ```text
//! {"version":1,"cell":{"i":3,"j":-2},"coins":[{"home":{"i":3,"j":-2},"serial":1}, ...]}
//! ```
//!
//! Coins are listed oldest first. The blob is opaque to the persistence
//! collaborator, which stores it under the cell's `"{i},{j}"` key.

use geocoin_procedural::Cell;
use serde::{Deserialize, Serialize};

use crate::cache::{CacheState, Memento};
use crate::coin::Coin;
use crate::error::{EconomyError, EconomyResult};

/// Current memento format version.
pub const MEMENTO_VERSION: u16 = 1;

/// Versioned capture of a cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMemento {
    /// Format version.
    pub version: u16,
    /// Cell the cache belongs to.
    pub cell: Cell,
    /// Coins, oldest first.
    pub coins: Vec<Coin>,
}

/// Encoded memento, as handed to persistence.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MementoBlob(String);

impl MementoBlob {
    /// Returns the encoded text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the blob, returning the encoded text.
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for MementoBlob {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// Encodes a cache into a blob.
///
/// # Errors
///
/// Returns `EconomyError::Encode` if serialization fails.
pub fn encode(state: &CacheState) -> EconomyResult<MementoBlob> {
    serde_json::to_string(&state.capture())
        .map(MementoBlob)
        .map_err(|e| EconomyError::Encode {
            key: state.cell().key(),
            reason: e.to_string(),
        })
}

/// Decodes a blob stored under `cell`'s key.
///
/// # Errors
///
/// Returns `EconomyError::CorruptState` if the blob is not a valid memento,
/// was captured for a different cell, or lists a coin twice.
pub fn decode(cell: Cell, blob: &MementoBlob) -> EconomyResult<CacheState> {
    let snapshot: CacheMemento = serde_json::from_str(blob.as_str())
        .map_err(|e| EconomyError::corrupt(cell.key(), e.to_string()))?;

    if snapshot.cell != cell {
        return Err(EconomyError::corrupt(
            cell.key(),
            format!("memento belongs to cell {}", snapshot.cell),
        ));
    }

    CacheState::restore(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocoin_procedural::SpawnPlan;

    fn generated() -> CacheState {
        CacheState::generate(SpawnPlan {
            cell: Cell::new(3, -2),
            coin_count: 5,
        })
    }

    #[test]
    fn test_generated_cache_round_trip() {
        let cache = generated();
        let blob = encode(&cache).unwrap();
        assert_eq!(decode(cache.cell(), &blob).unwrap(), cache);
    }

    #[test]
    fn test_emptied_cache_round_trip() {
        let cache = CacheState::new(Cell::new(3, -2), std::iter::empty());
        let blob = encode(&cache).unwrap();
        let restored = decode(cache.cell(), &blob).unwrap();
        assert!(restored.is_empty());
        assert_eq!(restored.cell(), cache.cell());
    }

    #[test]
    fn test_blob_shape() {
        let cache = CacheState::new(Cell::new(3, -2), [Coin::new(Cell::new(3, -2), 1)]);
        let blob = encode(&cache).unwrap();
        assert_eq!(
            blob.as_str(),
            r#"{"version":1,"cell":{"i":3,"j":-2},"coins":[{"home":{"i":3,"j":-2},"serial":1}]}"#
        );
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let cell = Cell::new(0, 0);
        for text in ["", "not json", "[1,2,3]", r#"{"version":1}"#] {
            let err = decode(cell, &MementoBlob::from(text.to_owned())).unwrap_err();
            assert!(err.is_corrupt_state(), "{text:?} should be corrupt");
        }
    }

    #[test]
    fn test_foreign_cell_is_corrupt() {
        let blob = encode(&generated()).unwrap();
        let err = decode(Cell::new(4, -2), &blob).unwrap_err();
        assert!(matches!(err, EconomyError::CorruptState { ref key, .. } if key == "4,-2"));
    }
}
