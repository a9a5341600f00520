//! Core logger types and traits

pub mod channel;
pub mod diagnostics;
pub mod error;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod severity;
pub mod strategy;
pub mod timestamp;
pub mod writer;

pub use channel::{SeverityChannel, DEFAULT_CHANNEL_CAPACITY};
pub use diagnostics::{Diagnostic, DiagnosticCallback, Diagnostics};
pub use error::{LoggerError, Result};
pub use logger::{ChannelConfig, Log, LogBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use message::MessageFormatter;
pub use metrics::LoggerMetrics;
pub use severity::Severity;
pub use strategy::{SharedStrategy, Strategy};
pub use timestamp::TimestampFormat;
pub use writer::SeverityWriter;
