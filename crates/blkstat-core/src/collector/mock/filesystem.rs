//! In-memory mock filesystem for testing collectors without a real cgroupfs.

use crate::collector::traits::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory filesystem for testing.
///
/// Stores files in memory, allowing tests to simulate cgroup directories
/// with missing, malformed, or unreadable accounting files.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Paths that exist but fail to read with `PermissionDenied`.
    unreadable: HashSet<PathBuf>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content, replacing any previous content.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        self.unreadable.remove(&path);
        self.files.insert(path, content.into());
    }

    /// Adds a file that exists but cannot be read.
    pub fn add_unreadable(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.files.remove(&path);
        self.unreadable.insert(path);
    }

    /// Removes a file. Returns `true` if it existed.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let had_file = self.files.remove(path).is_some();
        self.unreadable.remove(path) || had_file
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        if self.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {:?}", path),
            ));
        }
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }
}
