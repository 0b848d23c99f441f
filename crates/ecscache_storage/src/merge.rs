//! Combining independently built stores.

use ecscache_foundation::Result;
use tracing::debug;

use crate::store::CacheStore;

/// Merges stores into one fresh store.
///
/// Stores are replayed in order, each in its materialization order, into a
/// new store with freshly built interning tables. When several stores hold a
/// value for the same `(entity, component)` pair the later store wins. The
/// merged watermark is the furthest watermark among the inputs, and an empty
/// input yields an empty store.
///
/// # Errors
///
/// Returns a key range error if the union of identifiers exceeds the packed
/// key bounds.
pub fn merge<'a, I>(stores: I) -> Result<CacheStore>
where
    I: IntoIterator<Item = &'a CacheStore>,
{
    let mut merged = CacheStore::new();
    let mut block_number = 0;
    let mut inputs = 0usize;

    for store in stores {
        for (component, entity, value) in store.named_entries() {
            merged.apply(component, entity, value.clone())?;
        }
        block_number = block_number.max(store.block_number());
        inputs += 1;
    }

    merged.set_block_number(block_number);

    debug!(
        inputs,
        entries = merged.len(),
        components = merged.components().len(),
        entities = merged.entities().len(),
        block_number,
        "merged cache stores"
    );

    Ok(merged)
}

impl CacheStore {
    /// Merges stores into one fresh store; see [`merge`].
    ///
    /// # Errors
    ///
    /// Returns a key range error if the union of identifiers exceeds the
    /// packed key bounds.
    pub fn merge<'a, I>(stores: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a CacheStore>,
    {
        merge(stores)
    }
}
