//! Handle to a single cgroup directory.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collector::traits::FileSystem;
use crate::error::BlkioError;

/// A cgroup directory read through a [`FileSystem`].
///
/// This is the only place the collector touches the filesystem: it turns a
/// file name into the file's contents, or into [`BlkioError::MissingFile`]
/// when the kernel does not expose it.
#[derive(Debug, Clone)]
pub struct CgroupDir<F: FileSystem> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> CgroupDir<F> {
    /// Creates a handle for the cgroup at `path`
    /// (e.g. `/sys/fs/cgroup/blkio/docker/<id>`).
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full contents of `name` inside this cgroup.
    pub fn read_file(&self, name: &str) -> Result<String, BlkioError> {
        let path = self.path.join(name);
        match self.fs.read_to_string(&path) {
            Ok(content) => {
                debug!(file = name, bytes = content.len(), "read cgroup file");
                Ok(content)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(BlkioError::MissingFile {
                file: name.to_string(),
            }),
            Err(source) => Err(BlkioError::Io {
                file: name.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::MockFs;

    #[test]
    fn test_read_file() {
        let mut fs = MockFs::new();
        fs.add_file("/sys/fs/cgroup/blkio/blkio.sectors_recursive", "8:0 1024\n");
        let dir = CgroupDir::new(fs, "/sys/fs/cgroup/blkio");

        assert_eq!(dir.read_file("blkio.sectors_recursive").unwrap(), "8:0 1024\n");
    }

    #[test]
    fn test_missing_file() {
        let dir = CgroupDir::new(MockFs::new(), "/sys/fs/cgroup/blkio");

        let err = dir.read_file("blkio.sectors_recursive").unwrap_err();
        assert!(matches!(err, BlkioError::MissingFile { ref file } if file == "blkio.sectors_recursive"));
    }

    #[test]
    fn test_other_io_error() {
        let mut fs = MockFs::new();
        fs.add_unreadable("/cg/blkio.io_serviced_recursive");
        let dir = CgroupDir::new(fs, "/cg");

        let err = dir.read_file("blkio.io_serviced_recursive").unwrap_err();
        assert!(matches!(err, BlkioError::Io { .. }));
        assert!(!err.is_missing());
    }
}
