//! blkstat-core — block I/O accounting for cgroups.
//!
//! Provides:
//! - `collector` — reads the `blkio.*_recursive` files of a cgroup through a
//!   [`collector::FileSystem`] and assembles a [`BlkioStats`] snapshot
//! - `model` — the snapshot type and the file/operation vocabulary
//! - `rates` — per-second rates between two snapshots
//! - `error` — the error type shared by all of the above

pub mod collector;
pub mod error;
pub mod model;
pub mod rates;

pub use collector::{BlkioCollector, CgroupDir};
pub use error::BlkioError;
pub use model::{BlkioStats, OpClass, StatFile};
pub use rates::BlkioRates;
