//! Mock filesystem implementations for testing.
//!
//! This module provides `MockFs` and pre-built cgroup scenarios for testing
//! the collector without access to a real cgroup hierarchy.

mod filesystem;
pub mod scenarios;

pub use filesystem::MockFs;
