//! Durable key-value backends for snapshots.
//!
//! A backend stores one opaque byte blob per namespace. Writes replace the
//! whole blob atomically: a reader sees either the previous snapshot or the
//! new one, never a mix.

mod file;
mod memory;

use std::sync::Arc;

use ecscache_foundation::Result;

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Storage for snapshot blobs keyed by namespace.
pub trait SnapshotBackend: Send + Sync {
    /// Prepares the resource for a namespace, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns a storage unavailable error if the backend cannot be reached.
    fn open(&self, namespace: &str) -> Result<()>;

    /// Reads the blob stored for a namespace, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage unavailable error if the backend cannot be reached.
    fn read(&self, namespace: &str) -> Result<Option<Vec<u8>>>;

    /// Replaces the blob stored for a namespace.
    ///
    /// # Errors
    ///
    /// Returns a storage unavailable error if the backend cannot be reached;
    /// the previous blob is left intact in that case.
    fn write(&self, namespace: &str, bytes: &[u8]) -> Result<()>;

    /// Removes the blob stored for a namespace. Removing nothing succeeds.
    ///
    /// # Errors
    ///
    /// Returns a storage unavailable error if the backend cannot be reached.
    fn remove(&self, namespace: &str) -> Result<()>;

    /// Lists namespaces that currently hold a blob, sorted.
    ///
    /// # Errors
    ///
    /// Returns a storage unavailable error if the backend cannot be reached.
    fn namespaces(&self) -> Result<Vec<String>>;
}

impl<B: SnapshotBackend + ?Sized> SnapshotBackend for Arc<B> {
    fn open(&self, namespace: &str) -> Result<()> {
        (**self).open(namespace)
    }

    fn read(&self, namespace: &str) -> Result<Option<Vec<u8>>> {
        (**self).read(namespace)
    }

    fn write(&self, namespace: &str, bytes: &[u8]) -> Result<()> {
        (**self).write(namespace, bytes)
    }

    fn remove(&self, namespace: &str) -> Result<()> {
        (**self).remove(namespace)
    }

    fn namespaces(&self) -> Result<Vec<String>> {
        (**self).namespaces()
    }
}
