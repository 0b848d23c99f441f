//! Integration tests for persistent collections
//!
//! Tests structural sharing and iteration order of lists and maps.

use ecscache_foundation::{Value, ValueList, ValueMap};

#[test]
fn list_clone_is_independent() {
    let original: ValueList = (0..100).map(Value::Int).collect();
    let extended = original.push_back(Value::Int(100));

    assert_eq!(original.len(), 100);
    assert_eq!(extended.len(), 101);
    assert_eq!(extended.get(100), Some(&Value::Int(100)));
    assert_eq!(original.get(100), None);
}

#[test]
fn map_builds_from_pairs() {
    let map: ValueMap = [("b", Value::Int(2)), ("a", Value::Int(1)), ("b", Value::Int(3))]
        .into_iter()
        .collect();

    assert_eq!(map.len(), 2);
    assert_eq!(map.get("b"), Some(&Value::Int(3)));
    assert_eq!(
        map.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>(),
        ["b=3", "a=1"]
    );
}

#[test]
fn map_equality_ignores_insertion_order() {
    let a = ValueMap::new().insert("x", Value::Int(1)).insert("y", Value::Int(2));
    let b = ValueMap::new().insert("y", Value::Int(2)).insert("x", Value::Int(1));
    assert_eq!(a, b);
}
