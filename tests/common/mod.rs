//! Common test utilities for concept map integration tests
//!
//! Shared fixtures, logging setup and the structural invariant checks every
//! scenario ends with.

#![allow(dead_code)]

pub mod fixtures;
pub mod invariants;

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
