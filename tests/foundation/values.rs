//! Integration tests for the Value type
//!
//! Tests construction, accessors, equality, and display.

use ecscache_foundation::Value;

// =============================================================================
// Construction
// =============================================================================

#[test]
fn from_conversions() {
    assert_eq!(Value::from(true), Value::Bool(true));
    assert_eq!(Value::from(7), Value::Int(7));
    assert_eq!(Value::from(7i64), Value::Int(7));
    assert_eq!(Value::from(1.5), Value::Float(1.5));
    assert_eq!(Value::from("hi").as_str(), Some("hi"));
    assert_eq!(Value::from(String::from("hi")).as_str(), Some("hi"));
}

#[test]
fn nested_map() {
    let value = Value::map([
        ("position", Value::map([("x", 1), ("y", 2)])),
        ("tags", Value::from(vec!["a", "b"])),
        ("owner", Value::Nil),
    ]);

    let position = value.get("position").unwrap();
    assert_eq!(position.get("x").and_then(Value::as_int), Some(1));
    assert_eq!(value.get("tags").and_then(Value::as_list).map(|l| l.len()), Some(2));
    assert!(value.get("owner").unwrap().is_nil());
    assert_eq!(value.get("missing"), None);
    assert_eq!(Value::Int(1).get("x"), None);
}

// =============================================================================
// Equality
// =============================================================================

#[test]
fn float_equality_is_bitwise() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    assert_ne!(Value::Int(1), Value::Float(1.0));
}

#[test]
fn structural_equality() {
    assert_eq!(
        Value::map([("x", 3), ("y", 2)]),
        Value::map([("y", 2), ("x", 3)])
    );
    assert_ne!(Value::map([("x", 3)]), Value::map([("x", 4)]));
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn display() {
    let value = Value::map([("x", Value::Int(1)), ("tags", Value::from(vec!["a"]))]);
    assert_eq!(value.to_string(), "{x: 1, tags: [a]}");
    assert_eq!(Value::Nil.to_string(), "nil");
}
