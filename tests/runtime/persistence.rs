//! Integration tests for persisting stores
//!
//! Tests save/load through the file backend across handles.

use std::fs;
use std::sync::Arc;

use ecscache_foundation::Value;
use ecscache_runtime::{CacheHandle, CacheIdentity, FileBackend, MemoryBackend, SnapshotBackend};
use ecscache_storage::{CacheStore, ComponentUpdate, merge};
use tempfile::TempDir;

fn identity() -> CacheIdentity {
    CacheIdentity::new(31337, "0x5FbDB2315678afecb367f032d93F642f64180aa3", 1)
}

fn sample_store() -> CacheStore {
    let mut store = CacheStore::new();
    store
        .store_events(&[
            ComponentUpdate::new("0x0", "Position", Value::map([("x", 1), ("y", 2)]), 1),
            ComponentUpdate::new("0x1", "Health", Value::map([("value", 1)]), 2),
            ComponentUpdate::new(
                "0x1",
                "Inventory",
                Value::map([
                    ("items", Value::from(vec!["sword", "shield"])),
                    ("gold", Value::Int(-3)),
                    ("weight", Value::Float(0.25)),
                    ("meta", Value::map([("owner", Value::Nil), ("new", Value::Bool(true))])),
                ]),
                5,
            ),
        ])
        .unwrap();
    store
}

// =============================================================================
// File Backend
// =============================================================================

#[test]
fn file_round_trip_across_handles() {
    let dir = TempDir::new().unwrap();
    let store = sample_store();

    {
        let handle = CacheHandle::open(FileBackend::new(dir.path()).unwrap(), identity()).unwrap();
        handle.save(&store).unwrap();
    }

    let handle = CacheHandle::open(FileBackend::new(dir.path()).unwrap(), identity()).unwrap();
    let loaded = handle.load().unwrap();
    assert_eq!(loaded.materialize().to_vec(), store.materialize().to_vec());
    assert_eq!(loaded.block_number(), 4);
    assert_eq!(handle.block_number().unwrap(), Some(4));
}

#[test]
fn never_saved_identity_is_empty() {
    let dir = TempDir::new().unwrap();
    let handle = CacheHandle::open(FileBackend::new(dir.path()).unwrap(), identity()).unwrap();
    assert_eq!(handle.load().unwrap(), CacheStore::new());
    assert_eq!(handle.block_number().unwrap(), None);
}

#[test]
fn snapshot_file_is_named_after_namespace() {
    let dir = TempDir::new().unwrap();
    let backend = FileBackend::new(dir.path()).unwrap();
    let handle = CacheHandle::open(backend.clone(), identity()).unwrap();
    handle.save(&sample_store()).unwrap();

    let path = dir
        .path()
        .join("ECSCache-31337-0x5FbDB2315678afecb367f032d93F642f64180aa3-v1.msgpack");
    assert!(path.exists());
    assert_eq!(backend.namespaces().unwrap(), [handle.namespace()]);
}

#[test]
fn corrupt_file_degrades_to_cold_start() {
    let dir = TempDir::new().unwrap();
    let backend = FileBackend::new(dir.path()).unwrap();
    let handle = CacheHandle::open(backend.clone(), identity()).unwrap();
    handle.save(&sample_store()).unwrap();

    let path = backend.snapshot_path(handle.namespace());
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() / 3]).unwrap();

    assert!(handle.load().unwrap_err().is_corrupt_snapshot());
    assert!(handle.load_or_cold_start().is_empty());
    assert!(!path.exists());

    handle.save(&sample_store()).unwrap();
    assert_eq!(handle.load().unwrap(), sample_store());
}

// =============================================================================
// Workflows
// =============================================================================

#[test]
fn resume_ingestion_after_load() {
    let backend = Arc::new(MemoryBackend::new());
    let handle = CacheHandle::open(Arc::clone(&backend), identity()).unwrap();

    let mut live = CacheStore::new();
    live.store_event(&ComponentUpdate::new("0x0", "Position", 1, 10))
        .unwrap();
    handle.save(&live).unwrap();

    let mut resumed = handle.load().unwrap();
    for store in [&mut live, &mut resumed] {
        store
            .store_event(&ComponentUpdate::new("0x1", "Health", 7, 11))
            .unwrap();
    }
    assert_eq!(resumed, live);
}

#[test]
fn merged_store_persists() {
    let backend = Arc::new(MemoryBackend::new());
    let handle = CacheHandle::open(Arc::clone(&backend), identity()).unwrap();

    let mut a = CacheStore::new();
    a.store_event(&ComponentUpdate::new("0x0", "Position", 1, 3))
        .unwrap();
    let merged = merge([&a, &sample_store()]).unwrap();

    handle.save(&merged).unwrap();
    assert_eq!(
        handle.load().unwrap().materialize().to_vec(),
        merged.materialize().to_vec()
    );
}

#[test]
fn unavailable_storage_is_recoverable() {
    let backend = Arc::new(MemoryBackend::new());
    let handle = CacheHandle::open(Arc::clone(&backend), identity()).unwrap();
    handle.save(&sample_store()).unwrap();

    backend.set_available(false);
    let err = handle.save(&CacheStore::new()).unwrap_err();
    assert!(err.is_recoverable());
    assert!(handle.load_or_cold_start().is_empty());

    backend.set_available(true);
    assert_eq!(handle.load().unwrap(), sample_store());
}
