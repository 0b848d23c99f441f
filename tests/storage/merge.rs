//! Integration tests for merging
//!
//! Tests conflict resolution, watermarks, and table rebuilding.

use ecscache_foundation::Value;
use ecscache_storage::{CACHE_TX_HASH, CacheStore, ComponentUpdate, merge};

fn store_of(events: &[ComponentUpdate]) -> CacheStore {
    let mut store = CacheStore::new();
    store.store_events(events).unwrap();
    store
}

#[test]
fn merge_two_stores() {
    let a = store_of(&[
        ComponentUpdate::new("0x0", "Position", Value::map([("x", 1), ("y", 2)]), 1),
        ComponentUpdate::new("0x1", "Health", Value::map([("value", 1)]), 2),
    ]);
    let b = store_of(&[
        ComponentUpdate::new("0x0", "Position", Value::map([("x", 3), ("y", 2)]), 3),
        ComponentUpdate::new("0x0", "Speed", Value::map([("value", 10)]), 4),
    ]);

    let merged = merge([&a, &b]).unwrap();
    let records = merged.materialize().to_vec();

    let summary: Vec<_> = records
        .iter()
        .map(|r| (r.component.to_string(), r.entity.to_string(), r.value.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Position".to_owned(), "0x0".to_owned(), Value::map([("x", 3), ("y", 2)])),
            ("Health".to_owned(), "0x1".to_owned(), Value::map([("value", 1)])),
            ("Speed".to_owned(), "0x0".to_owned(), Value::map([("value", 10)])),
        ]
    );
    assert!(records.iter().all(|r| r.block_number == 3));
    assert!(records.iter().all(|r| &*r.tx_hash == CACHE_TX_HASH));
}

#[test]
fn merge_of_nothing_is_empty() {
    let stores: Vec<CacheStore> = Vec::new();
    assert_eq!(merge(&stores).unwrap(), CacheStore::new());
}

#[test]
fn merge_order_matters_for_conflicts() {
    let a = store_of(&[ComponentUpdate::new("0x0", "Position", 1, 1)]);
    let b = store_of(&[ComponentUpdate::new("0x0", "Position", 2, 1)]);

    assert_eq!(merge([&a, &b]).unwrap().get("0x0", "Position"), Some(&Value::Int(2)));
    assert_eq!(merge([&b, &a]).unwrap().get("0x0", "Position"), Some(&Value::Int(1)));
}

#[test]
fn merged_store_keeps_ingesting() {
    let a = store_of(&[ComponentUpdate::new("0x0", "Position", 1, 10)]);
    let b = store_of(&[ComponentUpdate::new("0x1", "Position", 2, 20)]);
    let mut merged = merge([&a, &b]).unwrap();

    merged
        .store_event(&ComponentUpdate::new("0x2", "Health", 5, 21))
        .unwrap();
    assert_eq!(merged.block_number(), 20);
    assert_eq!(merged.len(), 3);
    assert_eq!(merged.entities().iter().collect::<Vec<_>>(), ["0x0", "0x1", "0x2"]);
}
