//! Event ingestion, merging, and materialization for ecscache.
//!
//! This crate provides:
//! - [`ComponentUpdate`] - One component value change on an entity
//! - [`CacheStore`] - Latest value per `(entity, component)` plus a watermark
//! - [`merge`] - Combining independently built stores
//! - [`Materialized`] - Restartable snapshots replayable as updates

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod materialize;
pub mod merge;
pub mod store;
pub mod update;

pub use materialize::Materialized;
pub use merge::merge;
pub use store::CacheStore;
pub use update::{CACHE_TX_HASH, ComponentUpdate};
