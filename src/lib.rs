//! ecscache - Event-sourced materialized-state cache for entity-component data
//!
//! This crate re-exports all layers of the ecscache system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: ecscache_runtime    — Snapshots, backends, configuration, CLI
//! Layer 1: ecscache_storage    — Cache store, merging, materialization
//! Layer 0: ecscache_foundation — Core types (Value, PackedKey, Interner, Error)
//! ```

pub use ecscache_foundation as foundation;
pub use ecscache_runtime as runtime;
pub use ecscache_storage as storage;
