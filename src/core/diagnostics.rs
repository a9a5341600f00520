//! Diagnostic side-channel
//!
//! Conditions that must never reach the caller as an error (unconfigured
//! severities, failing strategies) are reported here instead: echoed to
//! stderr and passed to an optional user callback.

use super::severity::Severity;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Callback type for diagnostic notifications
pub type DiagnosticCallback = Arc<dyn Fn(&Diagnostic) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A facade call targeted a severity with no channel
    NotConfigured {
        severity: Severity,
        location: Option<&'static Location<'static>>,
        /// Error text that could not be routed, if any
        message: Option<String>,
    },

    /// A strategy returned an error for one message
    StrategyWriteFailed {
        severity: Severity,
        strategy: String,
        index: usize,
        written: usize,
        error: String,
    },

    /// A strategy panicked while writing one message
    StrategyPanicked {
        severity: Severity,
        strategy: String,
        index: usize,
        panic: String,
    },

    /// A facade call hit a closed channel
    ChannelClosed {
        severity: Severity,
        location: Option<&'static Location<'static>>,
    },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::NotConfigured { severity, .. }
            | Diagnostic::StrategyWriteFailed { severity, .. }
            | Diagnostic::StrategyPanicked { severity, .. }
            | Diagnostic::ChannelClosed { severity, .. } => *severity,
        }
    }

    /// Bracketed prefix used on stderr
    pub fn prefix(&self) -> &'static str {
        match self {
            Diagnostic::NotConfigured { .. } => "[LOGGER WARNING]",
            Diagnostic::StrategyWriteFailed { .. } | Diagnostic::ChannelClosed { .. } => {
                "[LOGGER ERROR]"
            }
            Diagnostic::StrategyPanicked { .. } => "[LOGGER CRITICAL]",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NotConfigured {
                severity,
                location,
                message,
            } => {
                if let Some(location) = location {
                    write!(f, "{}:{} ", location.file(), location.line())?;
                }
                write!(f, "Logger {} not configured", severity)?;
                if let Some(message) = message {
                    write!(f, ": {}", message)?;
                }
                Ok(())
            }
            Diagnostic::StrategyWriteFailed {
                severity,
                strategy,
                index,
                written,
                error,
            } => write!(
                f,
                "{} strategy #{} ({}): {} characters have been written. {}",
                severity, index, strategy, written, error
            ),
            Diagnostic::StrategyPanicked {
                severity,
                strategy,
                index,
                panic,
            } => write!(
                f,
                "{} strategy #{} ({}) panicked: {}. Other strategies continue to function.",
                severity, index, strategy, panic
            ),
            Diagnostic::ChannelClosed { severity, location } => {
                if let Some(location) = location {
                    write!(f, "{}:{} ", location.file(), location.line())?;
                }
                write!(f, "the {} channel was closed for recording", severity)
            }
        }
    }
}

/// Where diagnostics go: stderr and/or a callback.
#[derive(Clone)]
pub struct Diagnostics {
    echo_stderr: bool,
    callback: Option<DiagnosticCallback>,
}

impl Diagnostics {
    pub fn new(echo_stderr: bool, callback: Option<DiagnosticCallback>) -> Self {
        Self {
            echo_stderr,
            callback,
        }
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        if self.echo_stderr {
            eprintln!("{} {}", diagnostic.prefix(), diagnostic);
        }
        if let Some(ref callback) = self.callback {
            // runs on delivery threads, which must outlive a faulty callback
            let result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| callback(&diagnostic)));
            if let Err(payload) = result {
                eprintln!(
                    "[LOGGER CRITICAL] diagnostic callback panicked: {}",
                    panic_message(payload.as_ref())
                );
            }
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(true, None)
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("echo_stderr", &self.echo_stderr)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Extract a readable message from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
