//! cgroup v1 blkio collector.

use std::path::PathBuf;

use tracing::debug;

use crate::collector::cgroup::CgroupDir;
use crate::collector::traits::FileSystem;
use crate::error::BlkioError;
use crate::model::{BlkioStats, StatFile};

use super::parser;

/// Collects block I/O statistics for one cgroup.
///
/// Every call reads all four accounting files again; nothing is cached
/// between calls.
pub struct BlkioCollector<F: FileSystem> {
    cgroup: CgroupDir<F>,
}

impl<F: FileSystem> BlkioCollector<F> {
    /// Creates a new BlkioCollector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation
    /// * `cgroup_path` - Path to the cgroup directory (e.g., "/sys/fs/cgroup/blkio/docker/<id>")
    pub fn new(fs: F, cgroup_path: impl Into<PathBuf>) -> Self {
        Self {
            cgroup: CgroupDir::new(fs, cgroup_path),
        }
    }

    /// Reads and parses all blkio accounting files.
    ///
    /// Fails on the first missing file or malformed line.
    pub fn stats(&self) -> Result<BlkioStats, BlkioError> {
        stats(&self.cgroup)
    }
}

/// Reads and parses all blkio accounting files of `cgroup`.
///
/// The snapshot is built locally and returned only once every file has been
/// read and parsed, so a failure never leaks a partially filled value.
pub fn stats<F: FileSystem>(cgroup: &CgroupDir<F>) -> Result<BlkioStats, BlkioError> {
    let mut stats = BlkioStats::default();

    for file in StatFile::ALL {
        let content = cgroup.read_file(file.file_name())?;
        *stats.map_mut(file) = parser::parse_stat_file(file, &content)?;
    }

    debug!(
        cgroup = %cgroup.path().display(),
        sectors = stats.sectors.len(),
        service_bytes = stats.service_bytes.len(),
        serviced = stats.serviced.len(),
        queued = stats.queued.len(),
        "collected blkio stats"
    );

    Ok(stats)
}
