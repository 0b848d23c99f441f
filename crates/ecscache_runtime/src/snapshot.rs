//! Snapshot encoding using `MessagePack`.
//!
//! A snapshot records a store's interning tables, its raw state entries, and
//! its watermark. Interning tables and keys are persisted as-is, so a loaded
//! store materializes exactly the same sequence as the one that was saved.

use std::collections::HashSet;

use ecscache_foundation::{Error, ErrorKind, Interner, PackedKey, Result, Value};
use ecscache_storage::CacheStore;
use serde::{Deserialize, Serialize};

/// Snapshot layout version written by [`to_bytes`].
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    format: u32,
    components: Vec<&'a str>,
    entities: Vec<&'a str>,
    state: Vec<(PackedKey, &'a Value)>,
    block_number: u64,
}

#[derive(Deserialize)]
struct Snapshot {
    format: u32,
    components: Vec<String>,
    entities: Vec<String>,
    state: Vec<(PackedKey, Value)>,
    block_number: u64,
}

#[derive(Deserialize)]
struct SnapshotHeader {
    format: u32,
    block_number: u64,
}

fn check_format(format: u32) -> Result<()> {
    if format == FORMAT_VERSION {
        Ok(())
    } else {
        Err(Error::corrupt_snapshot(format!(
            "unsupported snapshot format {format}, expected {FORMAT_VERSION}"
        )))
    }
}

/// Serializes a store to bytes.
///
/// Uses named serialization to preserve field names.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn to_bytes(store: &CacheStore) -> Result<Vec<u8>> {
    let snapshot = SnapshotRef {
        format: FORMAT_VERSION,
        components: store.components().iter().collect(),
        entities: store.entities().iter().collect(),
        state: store.entries().collect(),
        block_number: store.block_number(),
    };
    rmp_serde::to_vec_named(&snapshot)
        .map_err(|e| Error::new(ErrorKind::Internal(format!("failed to encode snapshot: {e}"))))
}

/// Deserializes a store from snapshot bytes.
///
/// # Errors
///
/// Returns a corrupt snapshot error if the bytes cannot be decoded, were
/// written in another format, repeat an interned name or a key, or hold a
/// key outside the interning tables.
pub fn from_bytes(bytes: &[u8]) -> Result<CacheStore> {
    let snapshot: Snapshot = rmp_serde::from_slice(bytes)
        .map_err(|e| Error::corrupt_snapshot(format!("undecodable snapshot: {e}")))?;
    check_format(snapshot.format)?;

    let components = Interner::from_names(snapshot.components).map_err(corrupt)?;
    let entities = Interner::from_names(snapshot.entities).map_err(corrupt)?;

    let mut seen = HashSet::with_capacity(snapshot.state.len());
    for (key, _) in &snapshot.state {
        if !seen.insert(*key) {
            return Err(Error::corrupt_snapshot(format!("repeated state key {key}")));
        }
    }

    CacheStore::from_parts(components, entities, snapshot.state, snapshot.block_number)
        .map_err(corrupt)
}

/// Reads only the watermark of a snapshot.
///
/// # Errors
///
/// Returns a corrupt snapshot error if the header cannot be decoded or was
/// written in another format.
pub fn peek_block_number(bytes: &[u8]) -> Result<u64> {
    let header: SnapshotHeader = rmp_serde::from_slice(bytes)
        .map_err(|e| Error::corrupt_snapshot(format!("undecodable snapshot header: {e}")))?;
    check_format(header.format)?;
    Ok(header.block_number)
}

fn corrupt(err: Error) -> Error {
    Error::corrupt_snapshot(err.to_string())
}
