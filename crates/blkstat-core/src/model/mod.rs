//! Data models for block I/O accounting.
//!
//! - [`blkio`]: the per-cgroup snapshot ([`BlkioStats`]) and the vocabulary
//!   naming its source files ([`StatFile`]) and operation classes ([`OpClass`])

mod blkio;

pub use blkio::{BlkioStats, OpClass, StatFile};
