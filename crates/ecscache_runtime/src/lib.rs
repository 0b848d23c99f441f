//! Snapshot persistence and configuration for ecscache.
//!
//! This crate provides:
//! - [`CacheIdentity`] - Namespacing of persisted caches
//! - [`SnapshotBackend`] - Durable blob storage ([`MemoryBackend`], [`FileBackend`])
//! - [`CacheHandle`] - Saving and loading stores for one identity
//! - [`CacheConfig`] - Persistence settings from the environment
//! - Snapshot encoding ([`to_bytes`], [`from_bytes`], [`peek_block_number`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod backend;
pub mod config;
pub mod handle;
pub mod identity;
pub mod snapshot;

pub use backend::{FileBackend, MemoryBackend, SnapshotBackend};
pub use config::CacheConfig;
pub use handle::CacheHandle;
pub use identity::CacheIdentity;
pub use snapshot::{FORMAT_VERSION, from_bytes, peek_block_number, to_bytes};
