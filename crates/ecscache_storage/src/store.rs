//! The cache store: interning tables, materialized state, and the watermark.
//!
//! A [`CacheStore`] collapses an ordered stream of [`ComponentUpdate`]s into
//! the latest value per `(entity, component)` pair. State is keyed by
//! [`PackedKey`] in a persistent `im::OrdMap`, and a persistent log records
//! each key the first time it is written. Iteration follows that log, so a
//! pair keeps its position when overwritten, and snapshots for
//! [`CacheStore::materialize`] are O(1).

use std::sync::Arc;

use ecscache_foundation::{Error, Interner, KeyDimension, PackedKey, Result, Value};

use crate::materialize::Materialized;
use crate::update::ComponentUpdate;

/// Materialized current state of an event stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStore {
    /// Component names; index = position.
    components: Interner,
    /// Entity identifiers; index = position.
    entities: Interner,
    /// Latest value per packed `(component, entity)` key.
    state: im::OrdMap<PackedKey, Value>,
    /// Keys of `state` in first-insertion order.
    order: im::Vector<PackedKey>,
    /// Highest source position fully reflected in `state`.
    block_number: u64,
}

impl CacheStore {
    /// Creates an empty store with a watermark of 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from its persisted parts.
    ///
    /// Entries are taken in iteration order, which becomes the store's
    /// insertion order. A repeated key keeps its first position and its last
    /// value.
    ///
    /// # Errors
    ///
    /// Returns a key range error if any key refers to a component or entity
    /// index outside the given interning tables.
    pub fn from_parts<I>(
        components: Interner,
        entities: Interner,
        state: I,
        block_number: u64,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (PackedKey, Value)>,
    {
        let mut map = im::OrdMap::new();
        let mut order = im::Vector::new();
        for (key, value) in state {
            let (component, entity) = key.unpack();
            if component >= components.len() {
                return Err(Error::key_range(
                    KeyDimension::Component,
                    component as u64,
                    components.len() as u64,
                ));
            }
            if entity >= entities.len() {
                return Err(Error::key_range(
                    KeyDimension::Entity,
                    entity as u64,
                    entities.len() as u64,
                ));
            }
            if map.insert(key, value).is_none() {
                order.push_back(key);
            }
        }

        Ok(Self {
            components,
            entities,
            state: map,
            order,
            block_number,
        })
    }

    /// Applies one event from the source stream.
    ///
    /// Interns the event's component and entity, overwrites the stored value
    /// for the pair, and moves the watermark to one below the event's block:
    /// the event's own block may still have unseen events.
    ///
    /// # Errors
    ///
    /// Returns a key range error if interning would exceed the packed key
    /// bounds. The store is left unchanged in that case.
    pub fn store_event(&mut self, event: &ComponentUpdate) -> Result<()> {
        self.apply(&event.component, &event.entity, event.value.clone())?;
        self.block_number = event.block_number.saturating_sub(1);
        Ok(())
    }

    /// Applies a sequence of events in order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first key range error.
    pub fn store_events<'a, I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a ComponentUpdate>,
    {
        for event in events {
            self.store_event(event)?;
        }
        Ok(())
    }

    /// Sets the value for a pair without touching the watermark.
    pub(crate) fn apply(&mut self, component: &str, entity: &str, value: Value) -> Result<()> {
        let key = PackedKey::pack(
            self.components.index_for(component),
            self.entities.index_for(entity),
        )?;

        let c = self.components.intern(component);
        let e = self.entities.intern(entity);
        debug_assert_eq!(key.unpack(), (c, e));

        if self.state.insert(key, value).is_none() {
            self.order.push_back(key);
        }
        Ok(())
    }

    pub(crate) fn set_block_number(&mut self, block_number: u64) {
        self.block_number = block_number;
    }

    /// Returns the watermark: the highest block fully reflected in state.
    #[must_use]
    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    /// Returns the component interning table.
    #[must_use]
    pub fn components(&self) -> &Interner {
        &self.components
    }

    /// Returns the entity interning table.
    #[must_use]
    pub fn entities(&self) -> &Interner {
        &self.entities
    }

    /// Returns the number of `(entity, component)` pairs with a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Returns true if no value has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Gets the current value of a component on an entity.
    #[must_use]
    pub fn get(&self, entity: &str, component: &str) -> Option<&Value> {
        let key = PackedKey::pack(self.components.lookup(component)?, self.entities.lookup(entity)?)
            .ok()?;
        self.state.get(&key)
    }

    /// Iterates over raw `(key, value)` state entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (PackedKey, &Value)> {
        self.order
            .iter()
            .filter_map(|key| self.state.get(key).map(|value| (*key, value)))
    }

    /// Iterates over `(component, entity, value)` in insertion order.
    pub(crate) fn named_entries(&self) -> impl Iterator<Item = (&Arc<str>, &Arc<str>, &Value)> {
        self.entries().filter_map(|(key, value)| {
            let (c, e) = key.unpack();
            Some((self.components.resolve(c)?, self.entities.resolve(e)?, value))
        })
    }

    /// Takes an independent snapshot of the current state.
    ///
    /// The snapshot shares structure with the store and is unaffected by
    /// later calls to [`CacheStore::store_event`].
    #[must_use]
    pub fn materialize(&self) -> Materialized {
        Materialized::new(
            self.components.names(),
            self.entities.names(),
            self.order.clone(),
            self.state.clone(),
            self.block_number,
        )
    }
}
