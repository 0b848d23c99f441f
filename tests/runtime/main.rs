//! Integration tests for Layer 2: Runtime
//!
//! Tests for snapshot persistence, backends, event decoding, and configuration.

mod config;
mod persistence;
