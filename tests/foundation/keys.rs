//! Integration tests for packed keys
//!
//! Tests bounds, ordering, and the numeric representation of keys.

use ecscache_foundation::{
    COMPONENT_BITS, ENTITY_BITS, ErrorKind, KeyDimension, MAX_COMPONENTS, MAX_ENTITIES, PackedKey,
    pack, unpack,
};

#[allow(clippy::cast_possible_truncation)]
const COMPONENTS: usize = MAX_COMPONENTS as usize;
#[allow(clippy::cast_possible_truncation)]
const ENTITIES: usize = MAX_ENTITIES as usize;

// =============================================================================
// Bounds
// =============================================================================

#[test]
fn bit_layout() {
    assert_eq!(COMPONENT_BITS, 20);
    assert_eq!(ENTITY_BITS, 32);
    assert_eq!(MAX_COMPONENTS, 1 << 20);
    assert_eq!(MAX_ENTITIES, 1 << 32);
}

#[test]
fn largest_key_is_exact_as_double() {
    let key = pack(COMPONENTS - 1, ENTITIES - 1).unwrap();
    let raw = key.raw();
    assert_eq!(raw, (1u64 << 52) - 1);
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let round_trip = (raw as f64) as u64;
    assert_eq!(round_trip, raw);
}

#[test]
fn component_overflow() {
    let err = pack(COMPONENTS, 0).unwrap_err();
    match err.kind {
        ErrorKind::KeyRange {
            dimension, limit, ..
        } => {
            assert_eq!(dimension, KeyDimension::Component);
            assert_eq!(limit, MAX_COMPONENTS);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn entity_overflow() {
    let err = pack(0, ENTITIES).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::KeyRange {
            dimension: KeyDimension::Entity,
            ..
        }
    ));
}

#[test]
fn raw_outside_key_space_is_rejected() {
    assert!(PackedKey::from_raw(1 << 52).is_err());
    assert!(PackedKey::try_from(u64::MAX).is_err());
    assert!(PackedKey::from_raw((1 << 52) - 1).is_ok());
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn ordered_by_component_first() {
    let a = pack(0, ENTITIES - 1).unwrap();
    let b = pack(1, 0).unwrap();
    assert!(a < b);
    assert!(pack(1, 1).unwrap() < pack(1, 2).unwrap());
}

#[test]
fn unpack_inverts_pack() {
    for (c, e) in [(0, 0), (0, 1), (1, 0), (7, 123_456), (COMPONENTS - 1, ENTITIES - 1)] {
        assert_eq!(unpack(pack(c, e).unwrap()), (c, e));
    }
}

#[test]
fn raw_round_trip() {
    let key = pack(3, 9).unwrap();
    assert_eq!(u64::from(key), (3 << 32) | 9);
    assert_eq!(PackedKey::try_from(u64::from(key)).unwrap(), key);
}
