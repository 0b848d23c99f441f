//! Integration tests for Error types
//!
//! Tests error construction, display, context, and classification.

use ecscache_foundation::{Error, ErrorContext, ErrorKind, KeyDimension};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_key_range() {
    let err = Error::key_range(KeyDimension::Entity, 1 << 32, 1 << 32);
    assert!(matches!(err.kind, ErrorKind::KeyRange { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("entity"));
    assert!(msg.contains("4294967296"));
}

#[test]
fn error_storage_unavailable() {
    let err = Error::storage_unavailable("disk full");
    assert!(matches!(err.kind, ErrorKind::StorageUnavailable(_)));
    assert!(format!("{err}").contains("disk full"));
}

#[test]
fn error_corrupt_snapshot() {
    let err = Error::corrupt_snapshot("bad header");
    assert!(err.is_corrupt_snapshot());
    assert!(format!("{err}").contains("bad header"));
}

#[test]
fn error_duplicate_name() {
    let err = Error::duplicate_name("Position");
    assert!(matches!(err.kind, ErrorKind::DuplicateName(ref name) if name == "Position"));
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn persistence_errors_are_recoverable() {
    assert!(Error::storage_unavailable("offline").is_recoverable());
    assert!(Error::corrupt_snapshot("garbage").is_recoverable());
}

#[test]
fn contract_violations_are_not_recoverable() {
    assert!(!Error::key_range(KeyDimension::Component, 1 << 20, 1 << 20).is_recoverable());
    assert!(!Error::duplicate_name("x").is_recoverable());
    assert!(!Error::new(ErrorKind::Internal("bug".into())).is_recoverable());
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_display() {
    let context = ErrorContext::new()
        .with_operation("save")
        .with_namespace("ECSCache-1-0xabc-v1")
        .with_frame("write of ECSCache-1-0xabc-v1");
    assert_eq!(
        context.to_string(),
        "during save of ECSCache-1-0xabc-v1\n  in write of ECSCache-1-0xabc-v1"
    );
}

#[test]
fn context_is_attached() {
    let err = Error::storage_unavailable("offline")
        .with_context(ErrorContext::new().with_operation("load"));
    let context = err.context.expect("context attached");
    assert_eq!(context.operation.as_deref(), Some("load"));
    assert!(context.namespace.is_none());
}
