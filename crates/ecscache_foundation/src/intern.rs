//! Append-only string interning for component and entity identifiers.
//!
//! An [`Interner`] assigns each distinct name the next sequential index on
//! first sight. Indices are never reused or reassigned, so the name table and
//! its reverse lookup always stay exact inverses of each other.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Bidirectional name ⇄ index table.
///
/// The name sequence is an `im::Vector`, so [`Interner::names`] hands out an
/// O(1) structurally shared copy that stays valid while the interner grows.
/// It is not thread-safe; use external synchronization if needed.
#[derive(Clone, Debug, Default)]
pub struct Interner {
    /// Names in first-seen order; index = position.
    names: im::Vector<Arc<str>>,
    /// Map from name to index.
    index: HashMap<Arc<str>, usize>,
}

impl Interner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds an interner from names in index order.
    ///
    /// # Errors
    ///
    /// Returns a duplicate name error if any name appears twice, since the
    /// reverse lookup could not be an exact inverse.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let mut interner = Self::new();
        for name in names {
            let name = name.into();
            if interner.index.contains_key(&name) {
                return Err(Error::duplicate_name(&*name));
            }
            interner.push(name);
        }
        Ok(interner)
    }

    /// Returns the index of `name`, interning it first if unseen.
    pub fn intern(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        self.push(name.into())
    }

    /// Returns the index `name` has, or would receive if interned now.
    #[must_use]
    pub fn index_for(&self, name: &str) -> usize {
        self.lookup(name).unwrap_or(self.names.len())
    }

    /// Looks up the index of an already-interned name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Resolves an index back to its name.
    #[must_use]
    pub fn resolve(&self, idx: usize) -> Option<&Arc<str>> {
        self.names.get(idx)
    }

    /// Returns the number of interned names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over names in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(AsRef::as_ref)
    }

    /// Returns a structurally shared copy of the name table.
    #[must_use]
    pub fn names(&self) -> im::Vector<Arc<str>> {
        self.names.clone()
    }

    fn push(&mut self, name: Arc<str>) -> usize {
        let idx = self.names.len();
        self.names.push_back(name.clone());
        self.index.insert(name, idx);
        idx
    }
}

impl PartialEq for Interner {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

impl Eq for Interner {}
