//! Opened caches: saving and loading stores for one identity.

use std::sync::{Mutex, MutexGuard};

use ecscache_foundation::{Error, ErrorContext, Result};
use ecscache_storage::CacheStore;
use tracing::{debug, info, warn};

use crate::backend::SnapshotBackend;
use crate::identity::CacheIdentity;
use crate::snapshot::{from_bytes, peek_block_number, to_bytes};

/// A cache opened on a backend for one [`CacheIdentity`].
///
/// Saves and clears through one handle are serialized. Each save fully
/// replaces the previous snapshot.
#[derive(Debug)]
pub struct CacheHandle<B> {
    backend: B,
    identity: CacheIdentity,
    namespace: String,
    writer: Mutex<()>,
}

impl<B: SnapshotBackend> CacheHandle<B> {
    /// Opens the cache for `identity`, preparing its namespace.
    ///
    /// A new identity starts with no snapshot.
    ///
    /// # Errors
    ///
    /// Returns a storage unavailable error if the backend cannot be reached.
    pub fn open(backend: B, identity: CacheIdentity) -> Result<Self> {
        let namespace = identity.namespace();
        backend
            .open(&namespace)
            .map_err(|e| with_context(e, "open", &namespace))?;
        debug!(namespace = %namespace, "opened cache");
        Ok(Self {
            backend,
            identity,
            namespace,
            writer: Mutex::new(()),
        })
    }

    /// Returns the identity this handle was opened for.
    #[must_use]
    pub fn identity(&self) -> &CacheIdentity {
        &self.identity
    }

    /// Returns the backend namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the underlying backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Saves a snapshot of `store`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a storage unavailable error if the backend cannot be reached;
    /// the previous snapshot is kept in that case.
    pub fn save(&self, store: &CacheStore) -> Result<()> {
        let _guard = self.lock("save")?;
        let bytes = to_bytes(store).map_err(|e| with_context(e, "save", &self.namespace))?;
        self.backend
            .write(&self.namespace, &bytes)
            .map_err(|e| with_context(e, "save", &self.namespace))?;
        info!(
            namespace = %self.namespace,
            entries = store.len(),
            block_number = store.block_number(),
            bytes = bytes.len(),
            "saved cache snapshot"
        );
        Ok(())
    }

    /// Loads the last saved store, or an empty store if none was saved.
    ///
    /// # Errors
    ///
    /// Returns a storage unavailable error if the backend cannot be reached,
    /// or a corrupt snapshot error if the stored snapshot is unreadable.
    pub fn load(&self) -> Result<CacheStore> {
        let Some(bytes) = self
            .backend
            .read(&self.namespace)
            .map_err(|e| with_context(e, "load", &self.namespace))?
        else {
            debug!(namespace = %self.namespace, "no cache snapshot");
            return Ok(CacheStore::new());
        };

        let store = from_bytes(&bytes).map_err(|e| with_context(e, "load", &self.namespace))?;
        info!(
            namespace = %self.namespace,
            entries = store.len(),
            block_number = store.block_number(),
            "loaded cache snapshot"
        );
        Ok(store)
    }

    /// Loads the last saved store, falling back to an empty store on failure.
    ///
    /// A corrupt snapshot is discarded so the next save starts clean.
    #[must_use]
    pub fn load_or_cold_start(&self) -> CacheStore {
        match self.load() {
            Ok(store) => store,
            Err(err) if err.is_corrupt_snapshot() => {
                warn!(namespace = %self.namespace, error = %err, "discarding corrupt cache snapshot");
                if let Err(err) = self.clear() {
                    warn!(namespace = %self.namespace, error = %err, "failed to discard corrupt snapshot");
                }
                CacheStore::new()
            }
            Err(err) => {
                warn!(namespace = %self.namespace, error = %err, "cache unavailable, starting cold");
                CacheStore::new()
            }
        }
    }

    /// Reads the watermark of the stored snapshot without loading it.
    ///
    /// Returns `None` if nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns a storage unavailable error if the backend cannot be reached,
    /// or a corrupt snapshot error if the header is unreadable.
    pub fn block_number(&self) -> Result<Option<u64>> {
        let bytes = self
            .backend
            .read(&self.namespace)
            .map_err(|e| with_context(e, "peek", &self.namespace))?;
        bytes
            .map(|bytes| peek_block_number(&bytes))
            .transpose()
            .map_err(|e| with_context(e, "peek", &self.namespace))
    }

    /// Removes the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns a storage unavailable error if the backend cannot be reached.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.lock("clear")?;
        self.backend
            .remove(&self.namespace)
            .map_err(|e| with_context(e, "clear", &self.namespace))?;
        info!(namespace = %self.namespace, "cleared cache snapshot");
        Ok(())
    }

    fn lock(&self, operation: &str) -> Result<MutexGuard<'_, ()>> {
        self.writer.lock().map_err(|_| {
            with_context(
                Error::storage_unavailable("cache writer lock poisoned"),
                operation,
                &self.namespace,
            )
        })
    }
}

fn with_context(err: Error, operation: &str, namespace: &str) -> Error {
    let context = match err.context.clone() {
        Some(context) => context.with_frame(format!("{operation} of {namespace}")),
        None => ErrorContext::new()
            .with_operation(operation)
            .with_namespace(namespace),
    };
    err.with_context(context)
}
