//! Parsers for blkio accounting files.
//!
//! Two line shapes exist:
//! - `blkio.sectors_recursive`: `MAJOR:MINOR VALUE`
//! - the per-operation files: `MAJOR:MINOR CLASS VALUE`, closed by a
//!   `Total VALUE` line summing all devices
//!
//! Unlike the lenient cgroup v2 parsers, every line is validated: a wrong
//! field count or a non-numeric value fails the whole file.

use std::collections::BTreeMap;

use tracing::trace;

use crate::error::BlkioError;
use crate::model::StatFile;

/// Parses the contents of `file` into its keyed counters.
pub fn parse_stat_file(file: StatFile, content: &str) -> Result<BTreeMap<String, u64>, BlkioError> {
    if file.has_op_class() {
        parse_op_stats(file, content)
    } else {
        parse_sectors(file, content)
    }
}

/// Parses a device-only file such as `blkio.sectors_recursive`.
///
/// Format: `MAJOR:MINOR VALUE`, one device per line.
pub fn parse_sectors(file: StatFile, content: &str) -> Result<BTreeMap<String, u64>, BlkioError> {
    let mut entries = BTreeMap::new();

    for (idx, line) in content.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => continue,
            [device, value] => {
                let key = file.key(device, None);
                let value = parse_value(file, &key, value)?;
                entries.insert(key, value);
            }
            _ => return Err(malformed(file, idx, &fields, line)),
        }
    }

    Ok(entries)
}

/// Parses a per-operation file such as `blkio.io_serviced_recursive`.
///
/// Format: `MAJOR:MINOR CLASS VALUE` per device and class, plus a final
/// `Total VALUE` line. The grand total is validated but not stored.
pub fn parse_op_stats(file: StatFile, content: &str) -> Result<BTreeMap<String, u64>, BlkioError> {
    let mut entries = BTreeMap::new();

    for (idx, line) in content.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => continue,
            [device, class, value] => {
                let key = file.key(device, Some(*class));
                let value = parse_value(file, &key, value)?;
                entries.insert(key, value);
            }
            ["Total", value] => {
                let key = format!("{}:Total", file.key_prefix());
                let total = parse_value(file, &key, value)?;
                trace!(file = file.file_name(), total, "skipping grand total");
            }
            _ => return Err(malformed(file, idx, &fields, line)),
        }
    }

    Ok(entries)
}

fn parse_value(file: StatFile, key: &str, value: &str) -> Result<u64, BlkioError> {
    let invalid = || BlkioError::InvalidValue {
        file: file.file_name().to_string(),
        key: key.to_string(),
        value: value.to_string(),
    };
    // `u64::from_str` also takes a leading '+'.
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

fn malformed(file: StatFile, idx: usize, fields: &[&str], line: &str) -> BlkioError {
    BlkioError::MalformedLine {
        file: file.file_name().to_string(),
        line_no: idx + 1,
        fields: fields.len(),
        line: line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::scenarios;

    #[test]
    fn test_parse_sectors() {
        let parsed = parse_sectors(StatFile::Sectors, "8:0 1024\n8:16 2048\n").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["blkio.sectors_recursive:8:0"], 1024);
        assert_eq!(parsed["blkio.sectors_recursive:8:16"], 2048);
    }

    #[test]
    fn test_parse_sectors_skips_blank_lines() {
        let parsed = parse_sectors(StatFile::Sectors, "\n  \n8:0 1024\n\n").unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_parse_sectors_wrong_field_count() {
        let err = parse_sectors(StatFile::Sectors, "8:0 1024\n8:16 Read 2048\n").unwrap_err();
        match err {
            BlkioError::MalformedLine {
                file,
                line_no,
                fields,
                ..
            } => {
                assert_eq!(file, "blkio.sectors_recursive");
                assert_eq!(line_no, 2);
                assert_eq!(fields, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(parse_sectors(StatFile::Sectors, "8:0\n").is_err());
    }

    #[test]
    fn test_parse_op_stats() {
        let parsed =
            parse_op_stats(StatFile::ServiceBytes, scenarios::SERVICE_BYTES_RECURSIVE).unwrap();
        // Grand total line is not stored.
        assert_eq!(parsed.len(), 5);
        assert_eq!(parsed["io_service_bytes_recursive:8:0:Read"], 100);
        assert_eq!(parsed["io_service_bytes_recursive:8:0:Write"], 400);
        assert_eq!(parsed["io_service_bytes_recursive:8:0:Sync"], 200);
        assert_eq!(parsed["io_service_bytes_recursive:8:0:Async"], 300);
        assert_eq!(parsed["io_service_bytes_recursive:8:0:Total"], 500);
        assert!(!parsed.contains_key("io_service_bytes_recursive:Total"));
    }

    #[test]
    fn test_parse_op_stats_keeps_names_verbatim() {
        let parsed = parse_op_stats(StatFile::Queued, "253:1 Discard 7\n8:0 read 3\n").unwrap();
        assert_eq!(parsed["io_queued_recursive:253:1:Discard"], 7);
        assert_eq!(parsed["io_queued_recursive:8:0:read"], 3);
    }

    #[test]
    fn test_parse_op_stats_extra_field() {
        let err = parse_op_stats(StatFile::ServiceBytes, "8:0 Read 100 100").unwrap_err();
        assert!(matches!(err, BlkioError::MalformedLine { fields: 4, .. }));
    }

    #[test]
    fn test_parse_op_stats_two_fields_not_total() {
        let err = parse_op_stats(StatFile::Serviced, "8:0 10\n").unwrap_err();
        assert!(matches!(err, BlkioError::MalformedLine { fields: 2, .. }));
    }

    #[test]
    fn test_parse_op_stats_non_numeric_value() {
        let err = parse_op_stats(StatFile::ServiceBytes, "8:0 Read Write").unwrap_err();
        match err {
            BlkioError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "io_service_bytes_recursive:8:0:Read");
                assert_eq!(value, "Write");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_op_stats_negative_value() {
        let err = parse_op_stats(StatFile::Queued, "8:0 Read -1").unwrap_err();
        assert!(matches!(err, BlkioError::InvalidValue { .. }));
    }

    #[test]
    fn test_parse_op_stats_signed_value() {
        let err = parse_op_stats(StatFile::Queued, "8:0 Read +5\n").unwrap_err();
        match err {
            BlkioError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "io_queued_recursive:8:0:Read");
                assert_eq!(value, "+5");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(parse_sectors(StatFile::Sectors, "8:0 +1024").is_err());
    }

    #[test]
    fn test_parse_value_overflow() {
        let err = parse_sectors(StatFile::Sectors, "8:0 18446744073709551616").unwrap_err();
        assert!(matches!(err, BlkioError::InvalidValue { .. }));
        let max = parse_sectors(StatFile::Sectors, "8:0 18446744073709551615").unwrap();
        assert_eq!(max["blkio.sectors_recursive:8:0"], u64::MAX);
    }

    #[test]
    fn test_parse_tabs_and_crlf() {
        let parsed = parse_op_stats(
            StatFile::ServiceBytes,
            "8:0\tRead\t100\r\n8:0  Write \t 400\r\nTotal\t500\r\n",
        )
        .unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["io_service_bytes_recursive:8:0:Read"], 100);
        assert_eq!(parsed["io_service_bytes_recursive:8:0:Write"], 400);

        let sectors = parse_sectors(StatFile::Sectors, "8:0\t1024\r\n").unwrap();
        assert_eq!(sectors["blkio.sectors_recursive:8:0"], 1024);
    }

    #[test]
    fn test_parse_op_stats_invalid_grand_total() {
        let err = parse_op_stats(StatFile::Serviced, "8:0 Read 10\nTotal many\n").unwrap_err();
        match err {
            BlkioError::InvalidValue { key, .. } => assert_eq!(key, "io_serviced_recursive:Total"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_stat_file_dispatch() {
        let sectors = parse_stat_file(StatFile::Sectors, scenarios::SECTORS_RECURSIVE).unwrap();
        assert_eq!(sectors["blkio.sectors_recursive:8:0"], 1024);

        // A sectors-shaped line is malformed in a per-operation file.
        assert!(parse_stat_file(StatFile::Queued, scenarios::SECTORS_RECURSIVE).is_err());
    }

    #[test]
    fn test_parse_empty_file() {
        assert!(parse_op_stats(StatFile::Queued, "").unwrap().is_empty());
        assert!(parse_sectors(StatFile::Sectors, "\n").unwrap().is_empty());
    }
}
