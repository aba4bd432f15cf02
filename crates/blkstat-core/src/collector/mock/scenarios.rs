//! Pre-built cgroup directories for tests and demos.
//!
//! The contents mirror what a cgroup v1 blkio controller exposes for a
//! container doing I/O on a single disk (`8:0`).

use std::path::Path;

use super::MockFs;
use crate::model::StatFile;

pub const SECTORS_RECURSIVE: &str = "8:0 1024";

pub const SERVICE_BYTES_RECURSIVE: &str = "8:0 Read 100
8:0 Write 400
8:0 Sync 200
8:0 Async 300
8:0 Total 500
Total 500";

pub const SERVICED_RECURSIVE: &str = "8:0 Read 10
8:0 Write 40
8:0 Sync 20
8:0 Async 30
8:0 Total 50
Total 50";

pub const QUEUED_RECURSIVE: &str = "8:0 Read 1
8:0 Write 4
8:0 Sync 2
8:0 Async 3
8:0 Total 5
Total 5";

/// Fixture contents for a file kind.
pub fn contents(file: StatFile) -> &'static str {
    match file {
        StatFile::Sectors => SECTORS_RECURSIVE,
        StatFile::ServiceBytes => SERVICE_BYTES_RECURSIVE,
        StatFile::Serviced => SERVICED_RECURSIVE,
        StatFile::Queued => QUEUED_RECURSIVE,
    }
}

impl MockFs {
    /// Creates a filesystem with a complete blkio cgroup at `cgroup_path`.
    pub fn blkio_cgroup(cgroup_path: impl AsRef<Path>) -> Self {
        let mut fs = MockFs::new();
        fs.add_blkio_cgroup(cgroup_path);
        fs
    }

    /// Writes the four blkio accounting files under `cgroup_path`.
    pub fn add_blkio_cgroup(&mut self, cgroup_path: impl AsRef<Path>) {
        let base = cgroup_path.as_ref();
        for file in StatFile::ALL {
            self.add_file(base.join(file.file_name()), contents(file));
        }
    }
}
