//! Message formatting
//!
//! A message is fully formatted before it is handed to a channel:
//! `timestamp;[file:line;]text\n`, and for debug errors a captured stack
//! trace followed by a `---` separator.

use super::timestamp::TimestampFormat;
use chrono::{DateTime, Utc};
use std::backtrace::Backtrace;
use std::panic::Location;

/// Turns caller text into the wire form delivered to strategies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFormatter {
    time_format: TimestampFormat,
    ignore_file_line: bool,
}

impl MessageFormatter {
    pub fn new(time_format: TimestampFormat, ignore_file_line: bool) -> Self {
        Self {
            time_format,
            ignore_file_line,
        }
    }

    pub fn time_format(&self) -> &TimestampFormat {
        &self.time_format
    }

    pub fn ignore_file_line(&self) -> bool {
        self.ignore_file_line
    }

    /// Format `msg` as of `now`.
    ///
    /// With `ignore_file_line` the call-site is left out entirely. Otherwise
    /// it is embedded as `file:line`, or left as an empty field when the
    /// location is not known.
    pub fn prepare(
        &self,
        now: &DateTime<Utc>,
        msg: &str,
        location: Option<&Location<'_>>,
    ) -> String {
        let timestamp = self.time_format.format(now);
        if self.ignore_file_line {
            return format!("{};{}\n", timestamp, msg);
        }
        self.prepare_with_location(&timestamp, msg, location)
    }

    /// Debug-error form: always carries the call-site field, then the stack.
    pub fn prepare_with_stack(
        &self,
        now: &DateTime<Utc>,
        msg: &str,
        location: Option<&Location<'_>>,
        stack: &Backtrace,
    ) -> String {
        let timestamp = self.time_format.format(now);
        format!(
            "{}\n{}\n---\n\n",
            self.prepare_with_location(&timestamp, msg, location),
            stack
        )
    }

    fn prepare_with_location(
        &self,
        timestamp: &str,
        msg: &str,
        location: Option<&Location<'_>>,
    ) -> String {
        match location {
            Some(location) => format!(
                "{};{}:{};{}\n",
                timestamp,
                location.file(),
                location.line(),
                msg
            ),
            None => format!("{};;{}\n", timestamp, msg),
        }
    }
}
