//! # Game Session
//!
//! One player walking one world. Owns the grid, the cache store, the
//! player's coins, points and movement history.
//!
//! ## Flow
//!
//! ```text
//! step / relocate / jump_to ──> position changes
//!        │
//!        ▼
//! visible_caches() ──> neighborhood cells ──> spawn test ──> CacheState views
//!        │
//!        ▼
//! poke(cell) / deposit(cell) ──> transfer ──> commit ──> memento updated
//! ```
//!
//! Cache views handed out by the session are snapshots; the session
//! re-materializes and commits on every transfer.

use geocoin_economy::{transfer, CacheState, CacheStore, Coin, PlayerInventory};
use geocoin_procedural::{Cell, CellRef, GeoPoint, GridIndex};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::history::MovementHistory;
use crate::persistence::{KeyValueStore, SaveSnapshot};

/// One-cell movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Increasing latitude.
    North,
    /// Decreasing latitude.
    South,
    /// Increasing longitude.
    East,
    /// Decreasing longitude.
    West,
}

impl Direction {
    /// Every direction.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Returns the `(di, dj)` cell offset.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::South => (0, -1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }
}

/// Live game state for one player.
pub struct GameSession {
    config: GameConfig,
    grid: GridIndex,
    caches: CacheStore,
    inventory: PlayerInventory,
    history: MovementHistory,
    position: CellRef,
    points: u64,
}

impl GameSession {
    /// Starts a new game at the configured origin.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidConfig` or `GameError::Grid` if the
    /// config is rejected.
    pub fn new(config: GameConfig) -> GameResult<Self> {
        config.validate()?;
        let grid = config.grid()?;
        let position = grid.cell_for_point(config.origin)?;
        let caches = CacheStore::new(config.generator());

        tracing::info!(
            "Game session started at cell {} (seed {:#x})",
            position,
            config.world_seed.value()
        );

        Ok(Self {
            config,
            grid,
            caches,
            inventory: PlayerInventory::new(),
            history: MovementHistory::new(),
            position,
            points: 0,
        })
    }

    /// Returns the session's config.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Returns the grid index.
    #[must_use]
    pub const fn grid(&self) -> &GridIndex {
        &self.grid
    }

    /// Returns the cache store.
    #[must_use]
    pub const fn caches(&self) -> &CacheStore {
        &self.caches
    }

    /// Returns the player's coins.
    #[must_use]
    pub const fn inventory(&self) -> &PlayerInventory {
        &self.inventory
    }

    /// Returns every point the player has visited.
    #[must_use]
    pub const fn history(&self) -> &MovementHistory {
        &self.history
    }

    /// Returns the player's cell.
    #[must_use]
    pub fn position(&self) -> &CellRef {
        &self.position
    }

    /// Returns coins withdrawn so far.
    #[must_use]
    pub const fn points(&self) -> u64 {
        self.points
    }

    /// Returns the center of the player's cell.
    #[must_use]
    pub fn player_point(&self) -> GeoPoint {
        self.grid.bounds_for_cell(&self.position).center()
    }

    /// Moves one cell and records the new cell's center.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Grid` at the edge of the index range.
    pub fn step(&mut self, direction: Direction) -> GameResult<&CellRef> {
        let (di, dj) = direction.offset();
        let next = self.position.offset(di, dj)?;
        self.position = self.grid.canonical(next);

        let point = self.player_point();
        self.history.record(point);
        tracing::debug!("Stepped {:?} to cell {}", direction, self.position);
        Ok(&self.position)
    }

    /// Moves to the cell under a reported location and records the point.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Grid` for a non-finite or out-of-range point.
    pub fn relocate(&mut self, point: GeoPoint) -> GameResult<&CellRef> {
        self.position = self.grid.cell_for_point(point)?;
        self.history.record(point);
        tracing::debug!("Relocated to cell {}", self.position);
        Ok(&self.position)
    }

    /// Teleports to a cell without recording history.
    pub fn jump_to(&mut self, cell: Cell) -> &CellRef {
        self.position = self.grid.canonical(cell);
        &self.position
    }

    /// Returns the cells around the player, row-major from the south-west.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Grid` near the edge of the index range.
    pub fn nearby_cells(&self) -> GameResult<Vec<CellRef>> {
        Ok(self.grid.cells_near_point_default(self.player_point())?)
    }

    /// Returns every cache in the player's neighborhood.
    ///
    /// Corrupt mementos are replaced by regenerated content.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Grid` near the edge of the index range, or
    /// `GameError::Economy` if a cache cannot be stored.
    pub fn visible_caches(&mut self) -> GameResult<Vec<CacheState>> {
        let cells = self.nearby_cells()?;
        let mut visible = Vec::new();
        for cell in cells {
            if self.caches.has_cache(&cell) {
                visible.push(self.caches.materialize_or_regenerate(*cell)?);
            }
        }
        Ok(visible)
    }

    /// Returns the current contents of the cache at `cell`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoCacheAtCell` if the cell holds no cache.
    pub fn cache(&mut self, cell: Cell) -> GameResult<CacheState> {
        if !self.caches.has_cache(&cell) {
            return Err(GameError::NoCacheAtCell(cell));
        }
        Ok(self.caches.materialize_or_regenerate(cell)?)
    }

    /// Takes the cache's oldest coin and scores a point.
    ///
    /// Returns `None` if the cache is empty.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoCacheAtCell` if the cell holds no cache.
    pub fn poke(&mut self, cell: Cell) -> GameResult<Option<Coin>> {
        let mut cache = self.cache(cell)?;
        let Some(coin) = transfer::collect(&mut cache, &mut self.inventory) else {
            return Ok(None);
        };
        self.caches.commit(&cache)?;
        self.points += 1;
        tracing::info!("Collected {} ({} points)", coin, self.points);
        Ok(Some(coin))
    }

    /// Leaves the player's oldest coin in the cache.
    ///
    /// Returns `None` if the player holds no coins.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoCacheAtCell` if the cell holds no cache.
    pub fn deposit(&mut self, cell: Cell) -> GameResult<Option<Coin>> {
        let mut cache = self.cache(cell)?;
        let Some(coin) = transfer::deposit(&mut cache, &mut self.inventory) else {
            return Ok(None);
        };
        self.caches.commit(&cache)?;
        tracing::info!("Deposited {} at cell {}", coin, cell);
        Ok(Some(coin))
    }

    /// Counts coins in every stored cache plus the player's.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Economy` if a memento is corrupt.
    pub fn total_coins(&self) -> GameResult<usize> {
        Ok(self.caches.coin_total()? + self.inventory.len())
    }

    /// Forgets every cache mutation, coin, point and history entry.
    ///
    /// The player stays in their cell. Stored saves are untouched; see
    /// [`GameSession::erase_from`].
    pub fn reset(&mut self) {
        self.caches.reset();
        self.inventory.clear();
        self.history.clear();
        self.points = 0;
        tracing::info!("Game state has been reset");
    }

    /// Captures the persistent state.
    #[must_use]
    pub fn snapshot(&self) -> SaveSnapshot {
        SaveSnapshot {
            player_coins: self.inventory.clone(),
            cache_mementos: self.caches.export_mementos().into_iter().collect(),
            movement_history: self.history.clone(),
            points: self.points,
        }
    }

    /// Replaces the persistent state with a snapshot.
    ///
    /// Nothing changes if the snapshot is rejected.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Economy` for a malformed cache key.
    pub fn restore(&mut self, snapshot: SaveSnapshot) -> GameResult<()> {
        self.caches.import_mementos(snapshot.cache_mementos)?;
        self.inventory = snapshot.player_coins;
        self.history = snapshot.movement_history;
        self.points = snapshot.points;
        Ok(())
    }

    /// Saves the persistent state.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Snapshot` if an entry cannot be serialized.
    pub fn save_to(&self, store: &mut impl KeyValueStore) -> GameResult<()> {
        self.snapshot().write_to(store)
    }

    /// Loads the persistent state saved by [`GameSession::save_to`].
    ///
    /// # Errors
    ///
    /// Returns `GameError::Snapshot` for malformed JSON, or
    /// `GameError::Economy` for a malformed cache key.
    pub fn load_from(&mut self, store: &impl KeyValueStore) -> GameResult<()> {
        let snapshot = SaveSnapshot::read_from(store)?;
        self.restore(snapshot)?;
        tracing::info!(
            "Loaded save: {} coins held, {} caches known",
            self.inventory.len(),
            self.caches.len()
        );
        Ok(())
    }

    /// Removes the saved state from the store.
    pub fn erase_from(store: &mut impl KeyValueStore) {
        SaveSnapshot::erase_from(store);
    }
}
