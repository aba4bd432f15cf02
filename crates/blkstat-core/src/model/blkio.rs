//! Block I/O statistics for a single cgroup.
//!
//! Source files (cgroup v1 blkio controller):
//! - `blkio.sectors_recursive` - sectors transferred per device
//! - `blkio.io_service_bytes_recursive` - bytes transferred per device and operation
//! - `blkio.io_serviced_recursive` - requests issued per device and operation
//! - `blkio.io_queued_recursive` - requests queued per device and operation

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four accounting files read for a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatFile {
    Sectors,
    ServiceBytes,
    Serviced,
    Queued,
}

impl StatFile {
    /// All files, in the order they are read.
    pub const ALL: [StatFile; 4] = [
        StatFile::Sectors,
        StatFile::ServiceBytes,
        StatFile::Serviced,
        StatFile::Queued,
    ];

    /// File name inside the cgroup directory.
    pub fn file_name(self) -> &'static str {
        match self {
            StatFile::Sectors => "blkio.sectors_recursive",
            StatFile::ServiceBytes => "blkio.io_service_bytes_recursive",
            StatFile::Serviced => "blkio.io_serviced_recursive",
            StatFile::Queued => "blkio.io_queued_recursive",
        }
    }

    /// Prefix of the synthesized keys for this file.
    ///
    /// Sectors keys keep the controller's `blkio.` prefix, the others do not.
    pub fn key_prefix(self) -> &'static str {
        match self {
            StatFile::Sectors => "blkio.sectors_recursive",
            StatFile::ServiceBytes => "io_service_bytes_recursive",
            StatFile::Serviced => "io_serviced_recursive",
            StatFile::Queued => "io_queued_recursive",
        }
    }

    /// Whether values only grow. `io_queued_recursive` is a queue depth
    /// and can go down between samples.
    pub fn is_counter(self) -> bool {
        !matches!(self, StatFile::Queued)
    }

    /// Whether lines carry an operation class between device and value.
    pub fn has_op_class(self) -> bool {
        !matches!(self, StatFile::Sectors)
    }

    /// Builds the map key for a device (and class, for per-operation files).
    pub fn key(self, device: &str, class: Option<&str>) -> String {
        match class {
            Some(class) => format!("{}:{}:{}", self.key_prefix(), device, class),
            None => format!("{}:{}", self.key_prefix(), device),
        }
    }
}

impl fmt::Display for StatFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Operation class of a per-operation counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpClass {
    Read,
    Write,
    Sync,
    Async,
    Total,
}

impl OpClass {
    pub const ALL: [OpClass; 5] = [
        OpClass::Read,
        OpClass::Write,
        OpClass::Sync,
        OpClass::Async,
        OpClass::Total,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OpClass::Read => "Read",
            OpClass::Write => "Write",
            OpClass::Sync => "Sync",
            OpClass::Async => "Async",
            OpClass::Total => "Total",
        }
    }
}

impl FromStr for OpClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OpClass::ALL
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| format!("unknown operation class '{}'", s))
    }
}

impl fmt::Display for OpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Block I/O counters of one cgroup, one map per source file.
///
/// Keys are `"blkio.sectors_recursive:<device>"` for sectors and `"<file>:<device>:<class>"`
/// for the rest (see [`StatFile::key`]), so entries from different files
/// never collide. Device and class are kept exactly as the kernel wrote them.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct BlkioStats {
    /// From `blkio.sectors_recursive`.
    pub sectors: BTreeMap<String, u64>,
    /// From `blkio.io_service_bytes_recursive`.
    pub service_bytes: BTreeMap<String, u64>,
    /// From `blkio.io_serviced_recursive`.
    pub serviced: BTreeMap<String, u64>,
    /// From `blkio.io_queued_recursive`.
    pub queued: BTreeMap<String, u64>,
}

impl BlkioStats {
    /// Map holding the counters read from `file`.
    pub fn map(&self, file: StatFile) -> &BTreeMap<String, u64> {
        match file {
            StatFile::Sectors => &self.sectors,
            StatFile::ServiceBytes => &self.service_bytes,
            StatFile::Serviced => &self.serviced,
            StatFile::Queued => &self.queued,
        }
    }

    pub(crate) fn map_mut(&mut self, file: StatFile) -> &mut BTreeMap<String, u64> {
        match file {
            StatFile::Sectors => &mut self.sectors,
            StatFile::ServiceBytes => &mut self.service_bytes,
            StatFile::Serviced => &mut self.serviced,
            StatFile::Queued => &mut self.queued,
        }
    }

    /// Looks up a single counter.
    ///
    /// `class` is ignored for [`StatFile::Sectors`].
    pub fn get(&self, file: StatFile, device: &str, class: Option<OpClass>) -> Option<u64> {
        let class = class.filter(|_| file.has_op_class()).map(OpClass::as_str);
        self.map(file).get(&file.key(device, class)).copied()
    }

    /// Total number of counters across all files.
    pub fn len(&self) -> usize {
        StatFile::ALL.iter().map(|&f| self.map(f).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Device identifiers seen in any file, sorted.
    pub fn devices(&self) -> Vec<String> {
        let mut devices = BTreeSet::new();
        for file in StatFile::ALL {
            for key in self.map(file).keys() {
                let Some(rest) = key
                    .strip_prefix(file.key_prefix())
                    .and_then(|rest| rest.strip_prefix(':'))
                else {
                    continue;
                };
                // Device ids contain a ':' themselves, the class (if any) follows the last one.
                let device = if file.has_op_class() {
                    rest.rsplit_once(':').map_or(rest, |(device, _)| device)
                } else {
                    rest
                };
                devices.insert(device.to_string());
            }
        }
        devices.into_iter().collect()
    }

    /// Counter increments from `prev` to `self`.
    ///
    /// Only keys present in both snapshots are kept. A counter that went
    /// backwards (stats reset, device re-attached) is dropped. The queue
    /// depth is not a counter and is left empty.
    pub fn delta(&self, prev: &BlkioStats) -> BlkioStats {
        let mut out = BlkioStats::default();
        for file in StatFile::ALL.into_iter().filter(|f| f.is_counter()) {
            let prev_map = prev.map(file);
            let out_map = out.map_mut(file);
            for (key, &curr) in self.map(file) {
                if let Some(diff) = prev_map.get(key).and_then(|&p| curr.checked_sub(p)) {
                    out_map.insert(key.clone(), diff);
                }
            }
        }
        out
    }
}
