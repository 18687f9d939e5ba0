//! Shared helpers for study-cli integration tests.

pub mod fixtures;
