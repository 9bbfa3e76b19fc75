//! Shared test utilities used across the feynman crates.

pub mod fixtures;
pub mod tracing;
