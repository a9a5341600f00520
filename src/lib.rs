//! # alog
//!
//! An asynchronous, multi-channel logging facade.
//!
//! Each severity (Info, Warning, Error) owns a bounded FIFO channel drained
//! by one background delivery loop, which fans every message out to an
//! ordered list of pluggable output strategies.
//!
//! ## Features
//!
//! - **Non-blocking callers**: formatting happens on the caller, delivery on
//!   the channel's own thread; callers only wait while a queue is full
//! - **Ordered fan-out**: per-severity FIFO, strategies written in
//!   attachment order, a failing strategy never blocks its siblings
//! - **Pluggable strategies**: console, file, email template, in-memory, or
//!   anything implementing [`Strategy`]
//! - **Never fails the caller**: unconfigured severities and strategy
//!   failures go to a diagnostic side-channel
//!
//! ## Example
//!
//! ```
//! use alog::prelude::*;
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemoryStrategy::new());
//! let log = Log::builder()
//!     .channel(Severity::Error, ChannelConfig::new(100).shared_strategy(memory.clone()))
//!     .build()
//!     .expect("start delivery loops");
//!
//! log.error(std::fs::read("/no/such/file").err());
//! log.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
//! assert_eq!(memory.len(), 1);
//! ```

pub mod config;
pub mod core;
pub mod global;
pub mod macros;
pub mod strategies;

pub mod prelude {
    pub use crate::core::{
        ChannelConfig, Diagnostic, DiagnosticCallback, Log, LogBuilder, LoggerError,
        LoggerMetrics, Result, Severity, SeverityWriter, SharedStrategy, Strategy,
        TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::strategies::MemoryStrategy;
    #[cfg(feature = "console")]
    pub use crate::strategies::ConsoleStrategy;
    #[cfg(feature = "file")]
    pub use crate::strategies::FileStrategy;
}

pub use config::Settings;
pub use core::{
    ChannelConfig, Diagnostic, DiagnosticCallback, Diagnostics, Log, LogBuilder, LoggerError,
    LoggerMetrics, MessageFormatter, Result, Severity, SeverityChannel, SeverityWriter,
    SharedStrategy, Strategy, TimestampFormat, DEFAULT_CHANNEL_CAPACITY,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use global::{default_log, global, set_global};
