//! cgroup v1 blkio statistics.
//!
//! Reads the four `*_recursive` accounting files of a cgroup and merges them
//! into a single [`BlkioStats`](crate::model::BlkioStats).

mod collector;
pub mod parser;

pub use collector::{BlkioCollector, stats};
