//! # Arena Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Connectivity oracle independent of the generator's own search
//! - Determinism test harness
//! - Fixture builders
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod connectivity;
pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
