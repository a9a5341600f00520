//! Logging macros for ergonomic log message formatting.
//!
//! These macros forward `format_args!` to the `*_fmt` facade methods, so the
//! recorded call-site is the macro invocation itself.
//!
//! # Examples
//!
//! ```
//! use alog::prelude::*;
//! use alog::{info, warning};
//!
//! let log = Log::unconfigured();
//!
//! // Basic logging
//! info!(log, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! warning!(log, "Port {} is already in use, retrying", port);
//! ```

/// Record an info message.
///
/// ```
/// # use alog::prelude::*;
/// # let log = Log::unconfigured();
/// use alog::info;
/// info!(log, "Application started");
/// info!(log, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($log:expr, $($arg:tt)+) => {
        $log.info_fmt(format_args!($($arg)+))
    };
}

/// Record a warning message.
///
/// ```
/// # use alog::prelude::*;
/// # let log = Log::unconfigured();
/// use alog::warning;
/// warning!(log, "Retry attempt {} of {}", 1, 3);
/// ```
#[macro_export]
macro_rules! warning {
    ($log:expr, $($arg:tt)+) => {
        $log.warning_fmt(format_args!($($arg)+))
    };
}

/// Record an error message.
///
/// ```
/// # use alog::prelude::*;
/// # let log = Log::unconfigured();
/// use alog::error;
/// error!(log, "Failed to connect to database: {}", "timeout");
/// ```
#[macro_export]
macro_rules! error {
    ($log:expr, $($arg:tt)+) => {
        $log.error_fmt(format_args!($($arg)+))
    };
}
