//! Timestamp formatting utilities
//!
//! Provides standardized, configurable timestamp formats for log output.
//! Entries are stamped in local time; every format renders that local
//! instant, with an explicit offset where the format carries one.

use chrono::{DateTime, SecondsFormat, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Standardized timestamp format options
///
/// # Examples
///
/// ```
/// use chrono::{Local, TimeZone};
/// use rust_structured_logger::core::TimestampFormat;
///
/// let at = Local.with_ymd_and_hms(2025, 11, 17, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::Simple.format(&at), "2025-11-17 10:30:45");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Date and time without zone: `2025-11-17 10:30:45`
    ///
    /// Default for text output.
    Simple,

    /// ISO 8601 with milliseconds and offset: `2025-11-17T10:30:45.123+01:00`
    ///
    /// Default for JSON output.
    #[default]
    Iso8601,

    /// RFC 3339 with seconds precision: `2025-11-17T10:30:45+01:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1763371845`
    Unix,

    /// Unix timestamp in milliseconds: `1763371845123`
    UnixMillis,

    /// Custom strftime format
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_structured_logger::core::TimestampFormat;
    ///
    /// // Apache log format
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a timestamp according to this format
    #[must_use]
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        match self {
            TimestampFormat::Simple => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339_opts(SecondsFormat::Secs, false),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// Check if this is a Unix-based numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::Unix | TimestampFormat::UnixMillis)
    }

    /// JSON value for a timestamp: numbers for Unix formats, strings otherwise
    pub fn to_json_value<Tz>(&self, datetime: &DateTime<Tz>) -> serde_json::Value
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        match self {
            TimestampFormat::Unix => serde_json::Value::Number(datetime.timestamp().into()),
            TimestampFormat::UnixMillis => {
                serde_json::Value::Number(datetime.timestamp_millis().into())
            }
            _ => serde_json::Value::String(self.format(datetime)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_simple_format() {
        let result = TimestampFormat::Simple.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08 10:30:45");
    }

    #[test]
    fn test_iso8601_format() {
        let result = TimestampFormat::Iso8601.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123+00:00");
    }

    #[test]
    fn test_iso8601_keeps_offset() {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let local = fixed_datetime().with_timezone(&offset);
        let result = TimestampFormat::Iso8601.format(&local);
        assert_eq!(result, "2025-01-08T19:30:45.123+09:00");
    }

    #[test]
    fn test_rfc3339_format() {
        let result = TimestampFormat::Rfc3339.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45+00:00");
    }

    #[test]
    fn test_unix_formats() {
        let secs: i64 = TimestampFormat::Unix
            .format(&fixed_datetime())
            .parse()
            .expect("valid unix timestamp");
        let millis: i64 = TimestampFormat::UnixMillis
            .format(&fixed_datetime())
            .parse()
            .expect("valid unix millis timestamp");
        assert_eq!(secs, 1736332245);
        assert_eq!(millis, 1736332245123);
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2025/01/08 10:30");
    }

    #[test]
    fn test_json_value() {
        assert_eq!(
            TimestampFormat::Unix.to_json_value(&fixed_datetime()),
            serde_json::json!(1736332245)
        );
        assert_eq!(
            TimestampFormat::Simple.to_json_value(&fixed_datetime()),
            serde_json::json!("2025-01-08 10:30:45")
        );
    }

    #[test]
    fn test_is_numeric() {
        assert!(!TimestampFormat::Simple.is_numeric());
        assert!(!TimestampFormat::Iso8601.is_numeric());
        assert!(!TimestampFormat::Rfc3339.is_numeric());
        assert!(TimestampFormat::Unix.is_numeric());
        assert!(TimestampFormat::UnixMillis.is_numeric());
        assert!(!TimestampFormat::Custom("%Y".to_string()).is_numeric());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let json = serde_json::to_string(&TimestampFormat::Iso8601).expect("serialize");
        assert_eq!(json, "\"Iso8601\"");

        let format: TimestampFormat =
            serde_json::from_str(r#"{"Custom":"%Y-%m-%d"}"#).expect("deserialize Custom");
        assert_eq!(format, TimestampFormat::Custom("%Y-%m-%d".to_string()));
    }
}
