//! Block I/O accounting collector for cgroups.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                BlkioCollector                │
//! │  blkio.sectors_recursive           ─┐        │
//! │  blkio.io_service_bytes_recursive   ├─ parser│
//! │  blkio.io_serviced_recursive        │        │
//! │  blkio.io_queued_recursive         ─┘        │
//! │                    │                         │
//! │             ┌──────▼──────┐                  │
//! │             │  CgroupDir  │                  │
//! │             └──────┬──────┘                  │
//! │             ┌──────▼──────┐                  │
//! │             │  FileSystem │ (trait)          │
//! │             └──────┬──────┘                  │
//! └────────────────────┼─────────────────────────┘
//!              ┌───────┴───────┐
//!       ┌──────▼──────┐ ┌──────▼──────┐
//!       │   RealFs    │ │   MockFs    │
//!       │  (Linux)    │ │  (Testing)  │
//!       └─────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production (Linux)
//!
//! ```ignore
//! use blkstat_core::collector::{BlkioCollector, RealFs};
//!
//! let collector = BlkioCollector::new(RealFs::new(), "/sys/fs/cgroup/blkio");
//! let stats = collector.stats()?;
//! ```
//!
//! ## Testing (with MockFs)
//!
//! ```
//! use blkstat_core::collector::{BlkioCollector, MockFs};
//!
//! let fs = MockFs::blkio_cgroup("/sys/fs/cgroup/blkio");
//! let collector = BlkioCollector::new(fs, "/sys/fs/cgroup/blkio");
//! let stats = collector.stats().unwrap();
//! assert_eq!(stats.sectors["blkio.sectors_recursive:8:0"], 1024);
//! ```

pub mod blkio;
mod cgroup;
pub mod mock;
pub mod traits;

pub use blkio::BlkioCollector;
pub use cgroup::CgroupDir;
pub use mock::MockFs;
pub use traits::{FileSystem, RealFs};
