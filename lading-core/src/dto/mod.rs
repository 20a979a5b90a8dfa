//! Data Transfer Objects for the remote APIs
//!
//! Wire representations of the warehouse (REST v2), object storage and
//! resource manager resources. They mirror the JSON bodies exactly
//! (camelCase, 64-bit integers encoded as strings) and are converted into
//! [`crate::domain`] types at the edge.

pub mod dataset;
pub mod job;
pub mod object;
pub mod project;
pub mod table;

use chrono::{DateTime, Utc};

/// A wire resource that could not be mapped to a domain type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError(pub String);

impl std::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConversionError {}

/// Parse a millisecond epoch timestamp encoded as a string
pub(crate) fn parse_millis(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis)
}

/// Parse an int64 encoded as a string
pub(crate) fn parse_u64(value: Option<&str>) -> Option<u64> {
    value.and_then(|s| s.parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_millis() {
        let ts = parse_millis(Some("1469566456000")).unwrap();
        assert_eq!(ts.timestamp(), 1_469_566_456);
        assert!(parse_millis(Some("soon")).is_none());
        assert!(parse_millis(None).is_none());
    }

    #[test]
    fn test_parse_u64() {
        assert_eq!(parse_u64(Some("1000000")), Some(1_000_000));
        assert_eq!(parse_u64(Some("-1")), None);
    }
}
