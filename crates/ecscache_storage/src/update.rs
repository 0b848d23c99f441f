//! Component update records.
//!
//! The same record shape flows in (events observed on the source stream) and
//! out (entries reconstructed by [`crate::CacheStore::materialize`]).

use std::sync::Arc;

use ecscache_foundation::Value;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Transaction hash marker carried by records reconstructed from a cache.
pub const CACHE_TX_HASH: &str = "cache";

/// A single component update on an entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ComponentUpdate {
    /// The entity the value is attached to.
    pub entity: Arc<str>,
    /// The component (schema) name.
    pub component: Arc<str>,
    /// The new component value.
    pub value: Value,
    /// Whether this is the last event of its originating transaction.
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_event_in_tx: bool,
    /// Source stream position of the event.
    pub block_number: u64,
    /// Originating transaction hash, or [`CACHE_TX_HASH`] for cached records.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tx_hash: Arc<str>,
}

impl ComponentUpdate {
    /// Creates an update with no transaction metadata.
    #[must_use]
    pub fn new(
        entity: impl Into<Arc<str>>,
        component: impl Into<Arc<str>>,
        value: impl Into<Value>,
        block_number: u64,
    ) -> Self {
        Self {
            entity: entity.into(),
            component: component.into(),
            value: value.into(),
            last_event_in_tx: false,
            block_number,
            tx_hash: Arc::from(""),
        }
    }

    /// Builder method to mark the update as the last in its transaction.
    #[must_use]
    pub fn with_last_event_in_tx(mut self, last: bool) -> Self {
        self.last_event_in_tx = last;
        self
    }

    /// Builder method to set the transaction hash.
    #[must_use]
    pub fn with_tx_hash(mut self, tx_hash: impl Into<Arc<str>>) -> Self {
        self.tx_hash = tx_hash.into();
        self
    }

    /// Returns true if this record was reconstructed from a cache.
    #[must_use]
    pub fn is_from_cache(&self) -> bool {
        &*self.tx_hash == CACHE_TX_HASH
    }
}
