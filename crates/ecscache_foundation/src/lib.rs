//! Core types for ecscache.
//!
//! This crate provides:
//! - [`Value`] - Opaque structured component values
//! - [`Interner`] - Append-only name ⇄ index tables
//! - [`PackedKey`] - Collision-free `(component, entity)` key packing
//! - [`Error`] - Rich error types with context
//! - Persistent collections ([`ValueList`], [`ValueMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod intern;
pub mod key;
pub mod value;

pub use collections::{ValueList, ValueMap};
pub use error::{Error, ErrorContext, ErrorKind, KeyDimension, Result};
pub use intern::Interner;
pub use key::{COMPONENT_BITS, ENTITY_BITS, MAX_COMPONENTS, MAX_ENTITIES, PackedKey, pack, unpack};
pub use value::Value;
