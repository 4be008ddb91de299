//! # Coins
//!
//! A coin is identified by the cell that minted it and its serial number
//! within that cell. The pair never changes, wherever the coin travels.

use std::fmt;

use geocoin_procedural::{Cell, SpawnPlan};
use serde::{Deserialize, Serialize};

/// One collectible token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coin {
    /// Cell whose cache minted this coin.
    pub home: Cell,
    /// Serial number, unique within `home`.
    pub serial: u32,
}

impl Coin {
    /// Creates a coin identity.
    #[inline]
    #[must_use]
    pub const fn new(home: Cell, serial: u32) -> Self {
        Self { home, serial }
    }

    /// Mints the initial coins for a spawn plan, serials `0..coin_count`.
    pub fn mint(plan: SpawnPlan) -> impl Iterator<Item = Self> {
        (0..plan.coin_count).map(move |serial| Self::new(plan.cell, serial))
    }
}

/// Formats as `i:j#serial`.
impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.home.i, self.home.j, self.serial)
    }
}
