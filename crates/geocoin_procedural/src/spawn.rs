//! # Spawn Rules
//!
//! Decides, from luck alone, which cells hold a cache and how many coins
//! a fresh cache starts with.
//!
//! ```text
//! spawns(cell)      = luck([i, j])              < spawn_probability
//! coin_count(cell)  = floor(luck([i, j, "coinCount"]) * max_coins_per_cache)
//! ```
//!
//! Neither value is ever stored; both are re-derived on demand.

use crate::grid::Cell;
use crate::luck::{Luck, WorldSeed};

/// Salt used for the initial coin count roll.
pub const COIN_COUNT_SALT: &str = "coinCount";

/// Initial contents of a freshly generated cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnPlan {
    /// The cell the cache belongs to.
    pub cell: Cell,
    /// Number of coins to mint, with serials `0..coin_count`.
    pub coin_count: u32,
}

/// Deterministic cache generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CacheGenerator {
    /// Luck function shared by both rolls.
    luck: Luck,
    /// Threshold below which a cell spawns a cache.
    spawn_probability: f64,
    /// Upper bound (exclusive) on the initial coin count.
    max_coins_per_cache: u32,
}

impl CacheGenerator {
    /// Default spawn probability.
    pub const DEFAULT_SPAWN_PROBABILITY: f64 = 0.1;

    /// Default coin count scale.
    pub const DEFAULT_MAX_COINS: u32 = 100;

    /// Creates a generator.
    #[must_use]
    pub const fn new(seed: WorldSeed, spawn_probability: f64, max_coins_per_cache: u32) -> Self {
        Self {
            luck: Luck::new(seed),
            spawn_probability,
            max_coins_per_cache,
        }
    }

    /// Returns the luck function.
    #[inline]
    #[must_use]
    pub const fn luck(&self) -> &Luck {
        &self.luck
    }

    /// Returns the spawn threshold.
    #[inline]
    #[must_use]
    pub const fn spawn_probability(&self) -> f64 {
        self.spawn_probability
    }

    /// Returns true if the cell holds a cache.
    #[must_use]
    pub fn spawns(&self, cell: &Cell) -> bool {
        self.luck.value(&crate::luck_key![cell.i, cell.j]) < self.spawn_probability
    }

    /// Returns the number of coins a fresh cache in this cell starts with.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn initial_coin_count(&self, cell: &Cell) -> u32 {
        let roll = self.luck.value(&crate::luck_key![cell.i, cell.j, COIN_COUNT_SALT]);
        let scaled = (roll * f64::from(self.max_coins_per_cache)).floor() as u32;
        scaled.min(self.max_coins_per_cache.saturating_sub(1))
    }

    /// Returns the initial contents, ignoring the spawn test.
    #[must_use]
    pub fn plan_for(&self, cell: Cell) -> SpawnPlan {
        SpawnPlan {
            cell,
            coin_count: self.initial_coin_count(&cell),
        }
    }

    /// Returns the initial contents if the cell spawns a cache.
    #[must_use]
    pub fn plan(&self, cell: Cell) -> Option<SpawnPlan> {
        self.spawns(&cell).then(|| self.plan_for(cell))
    }
}

impl Default for CacheGenerator {
    fn default() -> Self {
        Self::new(
            WorldSeed::default(),
            Self::DEFAULT_SPAWN_PROBABILITY,
            Self::DEFAULT_MAX_COINS,
        )
    }
}
