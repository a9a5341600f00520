//! Environment-driven configuration
//!
//! The first lookup in a process loads an optional `.env` file from the
//! current directory; variables already present in the environment win.

use crate::core::{LogBuilder, TimestampFormat, DEFAULT_CHANNEL_CAPACITY};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

/// File path of the default Info file strategy
pub const LOGGER_INFO: &str = "ALOG_LOGGER_INFO";
/// File path of the default Warning file strategy
pub const LOGGER_WARNING: &str = "ALOG_LOGGER_WARNING";
/// File path of the default Error file strategy
pub const LOGGER_ERROR: &str = "ALOG_LOGGER_ERROR";
/// strftime string for timestamps
pub const TIME_FORMAT: &str = "ALOG_TIME_FORMAT";
pub const IGNORE_FILE_LINE: &str = "ALOG_IGNORE_FILE_LINE";
pub const CHANNEL_CAPACITY: &str = "ALOG_CHANNEL_CAPACITY";

// a missing .env file is not an error
static DOTENV: Lazy<()> = Lazy::new(|| {
    let _ = dotenv::dotenv();
});

/// Read `key` from the environment, loading `.env` on first use.
pub fn get_env(key: &str) -> Option<String> {
    Lazy::force(&DOTENV);
    env::var(key).ok()
}

/// Like [`get_env`], with an empty string for missing or non-unicode values.
pub fn get_env_str(key: &str) -> String {
    get_env(key).unwrap_or_default()
}

/// Facade-wide settings that can come from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub time_format: TimestampFormat,
    pub ignore_file_line: bool,
    pub channel_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_format: TimestampFormat::default(),
            ignore_file_line: false,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Settings {
    /// Apply the `ALOG_*` keys over the defaults
    pub fn from_env() -> Self {
        Self::from_lookup(get_env)
    }

    /// Apply keys from an arbitrary lookup; unparsable values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(format) = lookup(TIME_FORMAT) {
            settings.time_format = TimestampFormat::from_config(format.trim());
        }
        if let Some(ignore) = lookup(IGNORE_FILE_LINE).and_then(|v| parse_bool(&v)) {
            settings.ignore_file_line = ignore;
        }
        if let Some(capacity) = lookup(CHANNEL_CAPACITY).and_then(|v| v.trim().parse().ok()) {
            settings.channel_capacity = capacity;
        }

        settings
    }

    /// A builder preloaded with the formatting settings
    pub fn builder(&self) -> LogBuilder {
        LogBuilder::new()
            .time_format(self.time_format.clone())
            .ignore_file_line(self.ignore_file_line)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
