//! Timestamp formatting utilities
//!
//! Provides the configurable leading field of every formatted message.
//! Supports RFC 3339, ISO 8601, Unix timestamps, and custom formats.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use alog::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::default();
/// let timestamp = format.format(&Utc::now());
/// // Output: "2025-01-08T10:30:45.123456000Z"
/// assert!(timestamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// RFC 3339 with nanoseconds: `2025-01-08T10:30:45.123456000Z`
    ///
    /// This is the default format.
    #[default]
    Rfc3339Nanos,

    /// RFC 3339 with whole seconds: `2025-01-08T10:30:45Z`
    Rfc3339,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Unix timestamp in microseconds: `1736332245123456`
    UnixMicros,

    /// Custom strftime format
    ///
    /// # Examples
    ///
    /// ```
    /// use alog::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Build a format from a configuration string; empty means default.
    ///
    /// An invalid strftime string is reported on stderr and also yields the
    /// default.
    pub fn from_config(format: &str) -> Self {
        if format.is_empty() {
            return TimestampFormat::default();
        }
        let custom = TimestampFormat::Custom(format.to_string());
        match custom.validate() {
            Ok(()) => custom,
            Err(e) => {
                eprintln!("[LOGGER WARNING] {}; using the default timestamp format", e);
                TimestampFormat::default()
            }
        }
    }

    /// Reject custom strftime strings chrono cannot render
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            TimestampFormat::Custom(format_str) => {
                if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
                    Err(format!("invalid timestamp format '{}'", format_str))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Rfc3339Nanos => datetime.to_rfc3339_opts(SecondsFormat::Nanos, true),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339_opts(SecondsFormat::Secs, true),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().to_string(),
            TimestampFormat::Custom(format_str) => {
                let mut out = String::new();
                // chrono reports an invalid specifier as fmt::Error
                if write!(out, "{}", datetime.format(format_str)).is_err() {
                    return datetime.to_rfc3339_opts(SecondsFormat::Nanos, true);
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_rfc3339_nanos_is_default() {
        assert_eq!(TimestampFormat::default(), TimestampFormat::Rfc3339Nanos);
        let result = TimestampFormat::default().format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123456000Z");
    }

    #[test]
    fn test_rfc3339_format() {
        let result = TimestampFormat::Rfc3339.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45Z");
    }

    #[test]
    fn test_iso8601_formats() {
        assert_eq!(
            TimestampFormat::Iso8601.format(&fixed_datetime()),
            "2025-01-08T10:30:45.123Z"
        );
        assert_eq!(
            TimestampFormat::Iso8601Micros.format(&fixed_datetime()),
            "2025-01-08T10:30:45.123456Z"
        );
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
        let micros: i64 = TimestampFormat::UnixMicros
            .format(&fixed_datetime())
            .parse()
            .expect("valid unix micros timestamp");
        assert_eq!(millis / 1000, secs);
        assert_eq!(micros / 1000, millis);
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2025/01/08 10:30");
    }

    #[test]
    fn test_from_config() {
        assert_eq!(TimestampFormat::from_config(""), TimestampFormat::Rfc3339Nanos);
        assert_eq!(
            TimestampFormat::from_config("%H:%M"),
            TimestampFormat::Custom("%H:%M".to_string())
        );
    }

    #[test]
    fn test_invalid_custom_format_falls_back() {
        for bad in ["%Y-%Q", "%H:%M %"] {
            let format = TimestampFormat::Custom(bad.to_string());
            assert!(format.validate().is_err(), "{} should be rejected", bad);
            assert_eq!(
                format.format(&fixed_datetime()),
                "2025-01-08T10:30:45.123456000Z"
            );
            assert_eq!(TimestampFormat::from_config(bad), TimestampFormat::Rfc3339Nanos);
        }
        assert!(TimestampFormat::Custom("%d/%b/%Y".to_string()).validate().is_ok());
        assert!(TimestampFormat::Unix.validate().is_ok());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&TimestampFormat::Rfc3339Nanos).expect("serialize");
        assert_eq!(json, "\"Rfc3339Nanos\"");

        let format: TimestampFormat =
            serde_json::from_str(r#"{"Custom":"%Y-%m-%d"}"#).expect("deserialize Custom");
        assert_eq!(format, TimestampFormat::Custom("%Y-%m-%d".to_string()));
    }
}
