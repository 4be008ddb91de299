//! # Cache Store
//!
//! Owns the memento of every cache ever generated.
//!
//! ## Lifecycle
//!
//! ```text
//! materialize(cell) ─┬─ memento exists ──> decode ───────────────> CacheState
//!                    └─ no memento ──────> generate, store memento > CacheState
//!
//! transfer mutates CacheState ──> commit(state) ──> memento overwritten
//! reset() ──> every memento dropped, next visit regenerates pristine content
//! ```
//!
//! A `CacheState` is a disposable view: drop it whenever the cell scrolls
//! out of view, and materialize again when it returns.

use std::collections::{BTreeMap, HashMap};

use geocoin_procedural::{CacheGenerator, Cell};

use crate::cache::CacheState;
use crate::error::{EconomyError, EconomyResult};
use crate::memento::{self, MementoBlob};

/// Authoritative store of cache mementos.
pub struct CacheStore {
    /// Deterministic content for never-seen cells.
    generator: CacheGenerator,
    /// Memento per generated cache.
    mementos: HashMap<Cell, MementoBlob>,
}

impl CacheStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(generator: CacheGenerator) -> Self {
        Self {
            generator,
            mementos: HashMap::new(),
        }
    }

    /// Returns the generator used for fresh caches.
    #[inline]
    #[must_use]
    pub const fn generator(&self) -> &CacheGenerator {
        &self.generator
    }

    /// Returns the number of stored mementos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mementos.len()
    }

    /// Returns true if no cache has been generated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mementos.is_empty()
    }

    /// Returns true if a memento exists for the cell.
    #[must_use]
    pub fn contains(&self, cell: &Cell) -> bool {
        self.mementos.contains_key(cell)
    }

    /// Returns true if the cell holds a cache, stored or spawnable.
    #[must_use]
    pub fn has_cache(&self, cell: &Cell) -> bool {
        self.contains(cell) || self.generator.spawns(cell)
    }

    /// Returns the cell's cache, restoring or generating it.
    ///
    /// Generation does not consult the spawn test; use
    /// [`CacheStore::cache_at`] when the cell may be empty. A generated
    /// cache is stored immediately, so it exists durably before any
    /// mutation.
    ///
    /// # Errors
    ///
    /// Returns `EconomyError::CorruptState` if the stored memento cannot be
    /// decoded. The memento is left in place.
    pub fn materialize(&mut self, cell: Cell) -> EconomyResult<CacheState> {
        if let Some(blob) = self.mementos.get(&cell) {
            let state = memento::decode(cell, blob)?;
            tracing::debug!("Restored cache {} with {} coins", cell, state.len());
            return Ok(state);
        }

        let state = CacheState::generate(self.generator.plan_for(cell));
        self.commit(&state)?;
        tracing::debug!("Generated cache {} with {} coins", cell, state.len());
        Ok(state)
    }

    /// Returns the cell's cache if it has one.
    ///
    /// # Errors
    ///
    /// See [`CacheStore::materialize`].
    pub fn cache_at(&mut self, cell: Cell) -> EconomyResult<Option<CacheState>> {
        if self.has_cache(&cell) {
            self.materialize(cell).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Materializes a cache, regenerating it if its memento is corrupt.
    ///
    /// A corrupt cell is treated as never generated: its memento is dropped
    /// and fresh deterministic content takes its place.
    ///
    /// # Errors
    ///
    /// Returns any error other than `CorruptState`.
    pub fn materialize_or_regenerate(&mut self, cell: Cell) -> EconomyResult<CacheState> {
        match self.materialize(cell) {
            Err(EconomyError::CorruptState { key, reason }) => {
                tracing::warn!("Discarding corrupt cache {}: {}", key, reason);
                self.discard(&cell);
                self.materialize(cell)
            }
            other => other,
        }
    }

    /// Counts the coins held across every stored cache.
    ///
    /// # Errors
    ///
    /// Returns `EconomyError::CorruptState` if any memento is corrupt.
    pub fn coin_total(&self) -> EconomyResult<usize> {
        self.mementos
            .iter()
            .map(|(cell, blob)| memento::decode(*cell, blob).map(|state| state.len()))
            .sum()
    }

    /// Stores the cache's current contents, replacing any prior memento.
    ///
    /// Call after every withdraw or deposit.
    ///
    /// # Errors
    ///
    /// Returns `EconomyError::Encode` if the cache cannot be encoded.
    pub fn commit(&mut self, state: &CacheState) -> EconomyResult<()> {
        let blob = memento::encode(state)?;
        self.mementos.insert(state.cell(), blob);
        Ok(())
    }

    /// Drops one cell's memento. Returns true if one existed.
    pub fn discard(&mut self, cell: &Cell) -> bool {
        self.mementos.remove(cell).is_some()
    }

    /// Drops every memento.
    pub fn reset(&mut self) {
        tracing::info!("Cache store reset ({} caches dropped)", self.mementos.len());
        self.mementos.clear();
    }

    /// Exports every memento keyed by `"{i},{j}"`, in key order.
    #[must_use]
    pub fn export_mementos(&self) -> BTreeMap<String, String> {
        self.mementos
            .iter()
            .map(|(cell, blob)| (cell.key(), blob.as_str().to_owned()))
            .collect()
    }

    /// Replaces every memento with the given entries.
    ///
    /// Blobs are stored as-is and only decoded when their cell is
    /// materialized. Nothing is replaced if any key is rejected.
    ///
    /// # Errors
    ///
    /// Returns `EconomyError::InvalidCell` for a key that is not exactly
    /// `"{i},{j}"`, or `EconomyError::DuplicateCell` if two entries name the
    /// same cell.
    pub fn import_mementos<I>(&mut self, entries: I) -> EconomyResult<usize>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut mementos = HashMap::new();
        for (key, blob) in entries {
            let cell = key.parse::<Cell>()?;
            if mementos.insert(cell, MementoBlob::from(blob)).is_some() {
                return Err(EconomyError::DuplicateCell(cell));
            }
        }

        self.mementos = mementos;
        tracing::info!("Imported {} cache mementos", self.mementos.len());
        Ok(self.mementos.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer;
    use crate::PlayerInventory;
    use geocoin_procedural::WorldSeed;

    fn store() -> CacheStore {
        CacheStore::new(CacheGenerator::new(WorldSeed::new(5), 0.1, 10))
    }

    /// First cell along the row `j = 0` whose fresh cache has at least `n` coins.
    fn cell_with_coins(store: &CacheStore, n: u32) -> Cell {
        (0..)
            .map(|i| Cell::new(i, 0))
            .find(|c| store.generator().initial_coin_count(c) >= n)
            .unwrap()
    }

    #[test]
    fn test_materialize_stores_memento() {
        let mut store = store();
        let cell = Cell::new(1, 1);
        assert!(!store.contains(&cell));

        store.materialize(cell).unwrap();
        assert!(store.contains(&cell));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_generation_idempotent() {
        let mut store = store();
        let cell = cell_with_coins(&store, 2);
        let first = store.materialize(cell).unwrap();
        let second = store.materialize(cell).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_commit_survives_rematerialize() {
        let mut store = store();
        let cell = cell_with_coins(&store, 2);
        let mut inv = PlayerInventory::new();

        let mut cache = store.materialize(cell).unwrap();
        let count = cache.len();
        transfer::collect(&mut cache, &mut inv).unwrap();
        store.commit(&cache).unwrap();
        drop(cache);

        let again = store.materialize(cell).unwrap();
        assert_eq!(again.len(), count - 1);
        assert_eq!(again.coins().front().map(|c| c.serial), Some(1));
    }

    #[test]
    fn test_uncommitted_mutation_is_lost() {
        let mut store = store();
        let cell = cell_with_coins(&store, 1);
        let mut cache = store.materialize(cell).unwrap();
        let count = cache.len();
        transfer::withdraw(&mut cache).unwrap();

        assert_eq!(store.materialize(cell).unwrap().len(), count);
    }

    #[test]
    fn test_reset_restores_pristine() {
        let mut store = store();
        let cell = cell_with_coins(&store, 1);
        let pristine = store.materialize(cell).unwrap();

        let mut cache = pristine.clone();
        transfer::withdraw(&mut cache).unwrap();
        store.commit(&cache).unwrap();
        assert_ne!(store.materialize(cell).unwrap(), pristine);

        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.materialize(cell).unwrap(), pristine);
    }

    #[test]
    fn test_cache_at_respects_spawn() {
        let mut store = store();
        let empty = (0..)
            .map(|i| Cell::new(i, 0))
            .find(|c| !store.generator().spawns(c))
            .unwrap();
        assert_eq!(store.cache_at(empty).unwrap(), None);
        assert!(!store.contains(&empty));

        let spawning = (0..)
            .map(|i| Cell::new(i, 0))
            .find(|c| store.generator().spawns(c))
            .unwrap();
        assert!(store.cache_at(spawning).unwrap().is_some());
    }

    #[test]
    fn test_corrupt_memento_surfaces() {
        let mut store = store();
        let cell = Cell::new(2, 2);
        store
            .import_mementos([(cell.key(), "{broken".to_owned())])
            .unwrap();

        let err = store.materialize(cell).unwrap_err();
        assert!(err.is_corrupt_state());
        assert!(store.contains(&cell), "Corrupt memento is not silently dropped");
    }

    #[test]
    fn test_corrupt_memento_regenerates() {
        let mut store = store();
        let cell = Cell::new(2, 2);
        let pristine = store.materialize(cell).unwrap();

        store
            .import_mementos([(cell.key(), "{broken".to_owned())])
            .unwrap();
        assert_eq!(store.materialize_or_regenerate(cell).unwrap(), pristine);
        assert_eq!(store.materialize(cell).unwrap(), pristine);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut store = store();
        let mut inv = PlayerInventory::new();
        for i in 0..5 {
            let mut cache = store.materialize(Cell::new(i, -i)).unwrap();
            transfer::collect(&mut cache, &mut inv);
            store.commit(&cache).unwrap();
        }

        let exported = store.export_mementos();
        assert_eq!(exported.len(), 5);

        let mut other = CacheStore::new(*store.generator());
        other.import_mementos(exported.clone()).unwrap();
        assert_eq!(other.export_mementos(), exported);
        assert_eq!(
            other.coin_total().unwrap() + inv.len(),
            (0..5)
                .map(|i| store.generator().initial_coin_count(&Cell::new(i, -i)) as usize)
                .sum::<usize>()
        );
        for i in 0..5 {
            let cell = Cell::new(i, -i);
            assert_eq!(other.materialize(cell).unwrap(), store.materialize(cell).unwrap());
        }
    }

    #[test]
    fn test_import_rejects_bad_key() {
        let mut store = store();
        store.materialize(Cell::new(0, 0)).unwrap();

        let result = store.import_mementos([("zero-zero".to_owned(), "{}".to_owned())]);
        assert!(matches!(result, Err(EconomyError::InvalidCell(_))));
        assert_eq!(store.len(), 1, "Failed import leaves the store untouched");
    }

    #[test]
    fn test_import_rejects_non_canonical_key() {
        let mut store = store();
        let result = store.import_mementos([
            ("1,2".to_owned(), "{}".to_owned()),
            ("1, 2".to_owned(), "[]".to_owned()),
        ]);
        assert!(matches!(result, Err(EconomyError::InvalidCell(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_import_rejects_duplicate_cell() {
        let mut store = store();
        store.materialize(Cell::new(0, 0)).unwrap();
        let before = store.export_mementos();

        let result = store.import_mementos([
            ("1,2".to_owned(), "{}".to_owned()),
            ("1,2".to_owned(), "[]".to_owned()),
        ]);
        assert_eq!(result, Err(EconomyError::DuplicateCell(Cell::new(1, 2))));
        assert_eq!(store.export_mementos(), before);
    }
}
