//! Packed `(component, entity)` keys.
//!
//! A packed key stores the component index in the high bits and the entity
//! index in the low [`ENTITY_BITS`] bits of a single `u64`:
//!
//! ```text
//!  63        52 51              32 31                          0
//! +------------+------------------+-----------------------------+
//! |  always 0  | component index  |        entity index         |
//! +------------+------------------+-----------------------------+
//! ```
//!
//! The largest key is `2^52 - 1`, so every key is exactly representable as an
//! IEEE-754 double. Keys sort by component index, then by entity index.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, KeyDimension, Result};

/// Number of bits reserved for the component index.
pub const COMPONENT_BITS: u32 = 20;

/// Number of bits reserved for the entity index.
pub const ENTITY_BITS: u32 = 32;

/// Exclusive upper bound on component indices (1,048,576 components).
pub const MAX_COMPONENTS: u64 = 1 << COMPONENT_BITS;

/// Exclusive upper bound on entity indices (4,294,967,296 entities).
pub const MAX_ENTITIES: u64 = 1 << ENTITY_BITS;

const ENTITY_MASK: u64 = MAX_ENTITIES - 1;

/// Exclusive upper bound on raw packed key values.
const KEY_LIMIT: u64 = 1 << (COMPONENT_BITS + ENTITY_BITS);

/// A collision-free scalar encoding of a `(component index, entity index)` pair.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u64", into = "u64"))]
pub struct PackedKey(u64);

impl PackedKey {
    /// Packs a component index and an entity index into a key.
    ///
    /// # Errors
    ///
    /// Returns a key range error if `component >= MAX_COMPONENTS` or
    /// `entity >= MAX_ENTITIES`.
    pub fn pack(component: usize, entity: usize) -> Result<Self> {
        let component = check(KeyDimension::Component, component, MAX_COMPONENTS)?;
        let entity = check(KeyDimension::Entity, entity, MAX_ENTITIES)?;
        Ok(Self((component << ENTITY_BITS) | entity))
    }

    /// Validates a raw integer read back from storage.
    ///
    /// # Errors
    ///
    /// Returns a key range error if `raw` sets any bit above the packed range.
    pub fn from_raw(raw: u64) -> Result<Self> {
        if raw >= KEY_LIMIT {
            return Err(Error::key_range(
                KeyDimension::Component,
                raw >> ENTITY_BITS,
                MAX_COMPONENTS,
            ));
        }
        Ok(Self(raw))
    }

    /// Returns the raw integer value of this key.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns the component index.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn component(self) -> usize {
        (self.0 >> ENTITY_BITS) as usize
    }

    /// Returns the entity index.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn entity(self) -> usize {
        (self.0 & ENTITY_MASK) as usize
    }

    /// Splits the key back into `(component index, entity index)`.
    #[must_use]
    pub const fn unpack(self) -> (usize, usize) {
        (self.component(), self.entity())
    }
}

fn check(dimension: KeyDimension, index: usize, limit: u64) -> Result<u64> {
    match u64::try_from(index) {
        Ok(index) if index < limit => Ok(index),
        Ok(index) => Err(Error::key_range(dimension, index, limit)),
        Err(_) => Err(Error::key_range(dimension, u64::MAX, limit)),
    }
}

impl fmt::Debug for PackedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedKey({}:{})", self.component(), self.entity())
    }
}

impl fmt::Display for PackedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PackedKey> for u64 {
    fn from(key: PackedKey) -> Self {
        key.0
    }
}

impl TryFrom<u64> for PackedKey {
    type Error = Error;

    fn try_from(raw: u64) -> Result<Self> {
        Self::from_raw(raw)
    }
}

/// Packs a `(component index, entity index)` pair.
///
/// Shorthand for [`PackedKey::pack`].
///
/// # Errors
///
/// Returns a key range error if either index is out of bounds.
pub fn pack(component: usize, entity: usize) -> Result<PackedKey> {
    PackedKey::pack(component, entity)
}

/// Unpacks a key into `(component index, entity index)`.
#[must_use]
pub const fn unpack(key: PackedKey) -> (usize, usize) {
    key.unpack()
}
