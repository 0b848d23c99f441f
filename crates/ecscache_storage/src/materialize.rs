//! Reconstructing update records from cached state.

use std::sync::Arc;

use ecscache_foundation::{PackedKey, Value};

use crate::update::{CACHE_TX_HASH, ComponentUpdate};

/// An independent, restartable snapshot of a store's state.
///
/// Produced by [`crate::CacheStore::materialize`]. Holds structurally shared
/// copies of the store's tables, so it is cheap to create and clone and is
/// not affected by later mutation of the store. Every call to
/// [`Materialized::iter`] starts a fresh pass.
#[derive(Clone, Debug)]
pub struct Materialized {
    components: im::Vector<Arc<str>>,
    entities: im::Vector<Arc<str>>,
    order: im::Vector<PackedKey>,
    state: im::OrdMap<PackedKey, Value>,
    block_number: u64,
}

impl Materialized {
    pub(crate) fn new(
        components: im::Vector<Arc<str>>,
        entities: im::Vector<Arc<str>>,
        order: im::Vector<PackedKey>,
        state: im::OrdMap<PackedKey, Value>,
        block_number: u64,
    ) -> Self {
        Self {
            components,
            entities,
            order,
            state,
            block_number,
        }
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Returns the watermark every record reports.
    #[must_use]
    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    /// Lazily iterates over the records in the order their pairs were first
    /// stored.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            snapshot: self,
            keys: self.order.iter(),
        }
    }

    /// Collects every record into a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<ComponentUpdate> {
        self.iter().collect()
    }

    fn record(&self, key: PackedKey, value: &Value) -> ComponentUpdate {
        let (component, entity) = key.unpack();
        ComponentUpdate {
            // Keys are only ever built from interned indices.
            entity: self.entities[entity].clone(),
            component: self.components[component].clone(),
            value: value.clone(),
            last_event_in_tx: false,
            block_number: self.block_number,
            tx_hash: Arc::from(CACHE_TX_HASH),
        }
    }
}

/// Iterator over materialized records.
pub struct Iter<'a> {
    snapshot: &'a Materialized,
    keys: im::vector::Iter<'a, PackedKey>,
}

impl Iterator for Iter<'_> {
    type Item = ComponentUpdate;

    fn next(&mut self) -> Option<Self::Item> {
        let snapshot = self.snapshot;
        self.keys.find_map(|key| {
            let value = snapshot.state.get(key)?;
            Some(snapshot.record(*key, value))
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<'a> IntoIterator for &'a Materialized {
    type Item = ComponentUpdate;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
