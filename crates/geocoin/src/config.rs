//! # Game Configuration
//!
//! World constants, loaded from TOML. Every field is optional in the file;
//! missing fields keep their defaults.
//!
//! ```toml
//! tile_degrees = 0.0001
//! neighborhood_size = 8
//! spawn_probability = 0.1
//! max_coins_per_cache = 100
//! world_seed = 42
//!
//! [origin]
//! lat = 36.9895
//! lng = -122.0628
//! ```

use std::path::Path;

use geocoin_procedural::{
    CacheGenerator, GeoPoint, GridIndex, WorldSeed, MAX_NEIGHBORHOOD_RADIUS,
};
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// World and economy constants for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cell edge length in degrees.
    pub tile_degrees: f64,
    /// Visibility radius in cells.
    pub neighborhood_size: u32,
    /// Chance that a cell holds a cache.
    pub spawn_probability: f64,
    /// Exclusive upper bound on a fresh cache's coin count.
    pub max_coins_per_cache: u32,
    /// Seed every luck value derives from.
    pub world_seed: WorldSeed,
    /// Starting player location.
    pub origin: GeoPoint,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_degrees: 1e-4,
            neighborhood_size: 8,
            spawn_probability: CacheGenerator::DEFAULT_SPAWN_PROBABILITY,
            max_coins_per_cache: CacheGenerator::DEFAULT_MAX_COINS,
            world_seed: WorldSeed::default(),
            origin: GeoPoint::new(36.9895, -122.0628),
        }
    }
}

impl GameConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidConfig` if the document does not parse or
    /// a value is out of range.
    pub fn from_toml_str(source: &str) -> GameResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `GameError::ConfigIo` if the file cannot be read, otherwise
    /// see [`GameConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| GameError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!("Loaded game config from {}", path.display());
        Ok(config)
    }

    /// Checks every value is in range.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidConfig` naming the first bad field.
    pub fn validate(&self) -> GameResult<()> {
        if !self.origin.lat.is_finite() || !self.origin.lng.is_finite() {
            return Err(GameError::InvalidConfig("origin must be finite".into()));
        }
        if !self.tile_degrees.is_finite() || self.tile_degrees <= 0.0 {
            return Err(GameError::InvalidConfig(format!(
                "tile_degrees must be positive, got {}",
                self.tile_degrees
            )));
        }
        if self.neighborhood_size > MAX_NEIGHBORHOOD_RADIUS {
            return Err(GameError::InvalidConfig(format!(
                "neighborhood_size must be at most {MAX_NEIGHBORHOOD_RADIUS}, got {}",
                self.neighborhood_size
            )));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(GameError::InvalidConfig(format!(
                "spawn_probability must be within [0, 1], got {}",
                self.spawn_probability
            )));
        }
        if self.max_coins_per_cache == 0 {
            return Err(GameError::InvalidConfig(
                "max_coins_per_cache must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Renders the config as TOML.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidConfig` if serialization fails.
    pub fn to_toml_string(&self) -> GameResult<String> {
        toml::to_string(self).map_err(|e| GameError::InvalidConfig(e.to_string()))
    }

    /// Builds the cache generator for this world.
    #[must_use]
    pub const fn generator(&self) -> CacheGenerator {
        CacheGenerator::new(
            self.world_seed,
            self.spawn_probability,
            self.max_coins_per_cache,
        )
    }

    /// Builds a fresh grid index for this world.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Grid` if the tile size is rejected.
    pub fn grid(&self) -> GameResult<GridIndex> {
        Ok(GridIndex::new(self.tile_degrees, self.neighborhood_size)?)
    }
}
