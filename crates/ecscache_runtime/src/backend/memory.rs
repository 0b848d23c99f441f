//! In-memory backend for tests and cache-less local runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use ecscache_foundation::{Error, Result};
use tracing::debug;

use super::SnapshotBackend;

/// Keeps snapshots in a process-local map.
///
/// Can be taken offline with [`MemoryBackend::set_available`] so callers can
/// exercise their handling of unreachable storage.
#[derive(Debug)]
pub struct MemoryBackend {
    blobs: RwLock<HashMap<String, Arc<[u8]>>>,
    available: AtomicBool,
}

impl MemoryBackend {
    /// Creates an empty, available backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Takes the backend offline or brings it back.
    ///
    /// While offline every operation fails with a storage unavailable error
    /// and stored blobs are kept.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns true if the backend is accepting operations.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(Error::storage_unavailable("memory backend is offline"))
        }
    }

    fn poisoned() -> Error {
        Error::storage_unavailable("memory backend lock poisoned")
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBackend for MemoryBackend {
    fn open(&self, namespace: &str) -> Result<()> {
        self.check_available()?;
        debug!(namespace, "opened memory namespace");
        Ok(())
    }

    fn read(&self, namespace: &str) -> Result<Option<Vec<u8>>> {
        self.check_available()?;
        let blobs = self.blobs.read().map_err(|_| Self::poisoned())?;
        let bytes = blobs.get(namespace).map(|blob| blob.to_vec());
        debug!(
            namespace,
            bytes = bytes.as_ref().map_or(0, Vec::len),
            "read memory snapshot"
        );
        Ok(bytes)
    }

    fn write(&self, namespace: &str, bytes: &[u8]) -> Result<()> {
        self.check_available()?;
        let blob: Arc<[u8]> = Arc::from(bytes);
        let mut blobs = self.blobs.write().map_err(|_| Self::poisoned())?;
        blobs.insert(namespace.to_owned(), blob);
        debug!(namespace, bytes = bytes.len(), "wrote memory snapshot");
        Ok(())
    }

    fn remove(&self, namespace: &str) -> Result<()> {
        self.check_available()?;
        let mut blobs = self.blobs.write().map_err(|_| Self::poisoned())?;
        if blobs.remove(namespace).is_some() {
            debug!(namespace, "removed memory snapshot");
        }
        Ok(())
    }

    fn namespaces(&self) -> Result<Vec<String>> {
        self.check_available()?;
        let blobs = self.blobs.read().map_err(|_| Self::poisoned())?;
        let mut namespaces: Vec<String> = blobs.keys().cloned().collect();
        namespaces.sort_unstable();
        Ok(namespaces)
    }
}
