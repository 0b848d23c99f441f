//! Integration tests for Layer 1: Storage
//!
//! Tests for event ingestion, materialization, and merging of cache stores.

mod merge;
