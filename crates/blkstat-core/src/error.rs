//! Error type for blkio collection.

use std::io;

/// Error type for collection failures.
///
/// Every variant is fatal for the `stats()` call that produced it; no
/// partially filled snapshot is returned alongside.
#[derive(Debug, thiserror::Error)]
pub enum BlkioError {
    /// One of the required accounting files does not exist.
    #[error("required file {file} not found")]
    MissingFile { file: String },

    /// The file exists but could not be read.
    #[error("I/O error reading {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: io::Error,
    },

    /// A line has an unexpected number of whitespace-separated fields.
    #[error("{file}:{line_no}: unexpected number of fields ({fields}) in {line:?}")]
    MalformedLine {
        file: String,
        line_no: usize,
        fields: usize,
        line: String,
    },

    /// The trailing field of a line is not an unsigned base-10 integer.
    #[error("{file}: invalid value {value:?} for {key}: expected an unsigned 64-bit integer")]
    InvalidValue {
        file: String,
        key: String,
        value: String,
    },
}

impl BlkioError {
    /// Name of the file the error is attributed to.
    pub fn file(&self) -> &str {
        match self {
            BlkioError::MissingFile { file }
            | BlkioError::Io { file, .. }
            | BlkioError::MalformedLine { file, .. }
            | BlkioError::InvalidValue { file, .. } => file,
        }
    }

    /// Returns `true` if the error reports an absent file.
    ///
    /// Callers that want to skip I/O accounting on kernels without the
    /// blkio controller check this instead of matching on the variant.
    pub fn is_missing(&self) -> bool {
        matches!(self, BlkioError::MissingFile { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_missing_file() {
        let err = BlkioError::MissingFile {
            file: "blkio.sectors_recursive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "required file blkio.sectors_recursive not found"
        );
        assert!(err.is_missing());
        assert_eq!(err.file(), "blkio.sectors_recursive");
    }

    #[test]
    fn test_display_malformed_line() {
        let err = BlkioError::MalformedLine {
            file: "blkio.io_queued_recursive".to_string(),
            line_no: 3,
            fields: 4,
            line: "8:0 Read 1 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "blkio.io_queued_recursive:3: unexpected number of fields (4) in \"8:0 Read 1 1\""
        );
        assert!(!err.is_missing());
    }

    #[test]
    fn test_display_invalid_value() {
        let err = BlkioError::InvalidValue {
            file: "blkio.io_serviced_recursive".to_string(),
            key: "io_serviced_recursive:8:0:Read".to_string(),
            value: "Write".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "blkio.io_serviced_recursive: invalid value \"Write\" for io_serviced_recursive:8:0:Read: expected an unsigned 64-bit integer"
        );
        assert_eq!(err.file(), "blkio.io_serviced_recursive");
    }
}
