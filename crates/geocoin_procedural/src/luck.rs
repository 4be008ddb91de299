//! # Luck Values
//!
//! Stateless, keyed pseudo-random numbers in `[0, 1)`.
//!
//! ## Determinism Guarantee
//!
//! A luck value is a pure function of the world seed and the key. There is
//! no internal RNG state, so an unvisited cell regenerates exactly as it
//! would have the first time, on any platform, in any run. Only cells the
//! player has changed ever need to be stored.
//!
//! ## Hashing
//!
//! Keys are fed through SipHash-2-4 with keys derived from the seed. Each
//! key part is tagged with its type, so `[1, 2]` and `["1", "2"]` never
//! collide by construction. Every length and integer is written as a
//! little-endian `u64`, so the byte stream is the same on 32-bit and
//! 64-bit targets.

use std::hash::Hasher;

use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher24;

/// World seed for deterministic generation.
///
/// All luck values derive from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0x6765_6f63_6f69_6e21)
    }
}

/// One primitive component of a luck key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyPart<'a> {
    /// An integer component, such as a cell index.
    Int(i64),
    /// A string salt, such as `"coinCount"`.
    Str(&'a str),
}

impl From<i32> for KeyPart<'_> {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for KeyPart<'_> {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for KeyPart<'_> {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl<'a> From<&'a str> for KeyPart<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(value)
    }
}

/// Builds a `[KeyPart]` array from mixed primitives.
///
/// ```rust,ignore
/// let value = luck.value(&luck_key![cell.i, cell.j, "coinCount"]);
/// ```
#[macro_export]
macro_rules! luck_key {
    ($($part:expr),* $(,)?) => {
        [$($crate::luck::KeyPart::from($part)),*]
    };
}

/// Scale that maps the top 53 bits of a hash onto `[0, 1)`.
const UNIT_SCALE: f64 = 1.0 / (1u64 << 53) as f64;

/// Keyed luck function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Luck {
    /// First SipHash key.
    k0: u64,
    /// Second SipHash key.
    k1: u64,
}

impl Luck {
    /// Creates a luck function for a world.
    #[must_use]
    pub const fn new(seed: WorldSeed) -> Self {
        Self {
            k0: seed.derive(1).value(),
            k1: seed.derive(2).value(),
        }
    }

    /// Returns the luck value for a key, in `[0, 1)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self, key: &[KeyPart<'_>]) -> f64 {
        let mut hasher = SipHasher24::new_with_keys(self.k0, self.k1);
        hasher.write_u64(key.len() as u64);
        for part in key {
            match *part {
                KeyPart::Int(v) => {
                    hasher.write_u8(0);
                    hasher.write_i64(v);
                }
                KeyPart::Str(s) => {
                    hasher.write_u8(1);
                    hasher.write_u64(s.len() as u64);
                    hasher.write(s.as_bytes());
                }
            }
        }
        (hasher.finish() >> 11) as f64 * UNIT_SCALE
    }
}

impl Default for Luck {
    fn default() -> Self {
        Self::new(WorldSeed::default())
    }
}
