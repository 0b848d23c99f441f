//! Integration tests for interning tables
//!
//! Tests first-seen ordering, reverse lookups, and rebuilding from names.

use ecscache_foundation::{ErrorKind, Interner};

#[test]
fn first_seen_order() {
    let mut interner = Interner::new();
    for name in ["0x2", "0x1", "0x2", "0x3", "0x1"] {
        interner.intern(name);
    }
    assert_eq!(interner.iter().collect::<Vec<_>>(), ["0x2", "0x1", "0x3"]);
    assert_eq!(interner.len(), 3);
}

#[test]
fn lookups_are_inverse() {
    let mut interner = Interner::new();
    let names = ["Position", "Health", "Speed"];
    for name in names {
        interner.intern(name);
    }
    for (idx, name) in names.iter().enumerate() {
        assert_eq!(interner.lookup(name), Some(idx));
        assert_eq!(interner.resolve(idx).map(AsRef::as_ref), Some(*name));
    }
    assert_eq!(interner.lookup("Inventory"), None);
    assert_eq!(interner.resolve(3), None);
}

#[test]
fn rebuild_from_names() {
    let rebuilt = Interner::from_names(["a", "b", "c"]).unwrap();
    let mut built = Interner::new();
    for name in ["a", "b", "c"] {
        built.intern(name);
    }
    assert_eq!(rebuilt, built);
}

#[test]
fn rebuild_rejects_duplicates() {
    let err = Interner::from_names(["a", "b", "a"]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateName(ref name) if name == "a"));
}

#[test]
fn names_snapshot_is_independent() {
    let mut interner = Interner::new();
    interner.intern("a");
    let names = interner.names();
    interner.intern("b");
    assert_eq!(names.len(), 1);
    assert_eq!(interner.len(), 2);
}
