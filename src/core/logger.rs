//! Log facade
//!
//! Maps severity-named calls onto per-severity channels. Formatting happens
//! on the caller's thread; everything after the enqueue happens on the
//! channel's delivery loop.

use super::{
    channel::{SeverityChannel, DEFAULT_CHANNEL_CAPACITY},
    diagnostics::{Diagnostic, DiagnosticCallback, Diagnostics},
    error::{LoggerError, Result},
    message::MessageFormatter,
    metrics::LoggerMetrics,
    severity::Severity,
    strategy::{SharedStrategy, Strategy},
    timestamp::TimestampFormat,
    writer::SeverityWriter,
};
use chrono::Utc;
use std::backtrace::Backtrace;
use std::collections::HashMap;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// This timeout is used when the facade is dropped without explicit shutdown.
/// For custom timeout control, use the `shutdown()` method instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Queue capacity and ordered strategy list of one severity channel
pub struct ChannelConfig {
    capacity: usize,
    strategies: Vec<SharedStrategy>,
}

impl ChannelConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            strategies: Vec::new(),
        }
    }

    /// Attach a strategy owned by this channel only
    #[must_use = "builder methods return a new value"]
    pub fn strategy<S: Strategy + 'static>(mut self, strategy: S) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// Attach a strategy that may also be attached to other channels
    #[must_use = "builder methods return a new value"]
    pub fn shared_strategy(mut self, strategy: SharedStrategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

/// The public logger object.
///
/// Every call returns `&Self` so calls can be chained, and none of them
/// fails: unconfigured severities and closed channels are reported on the
/// diagnostic side-channel.
///
/// # Example
///
/// ```
/// use alog::prelude::*;
/// use std::sync::Arc;
///
/// let memory = Arc::new(MemoryStrategy::new());
/// let log = Log::builder()
///     .channel(Severity::Info, ChannelConfig::new(10).shared_strategy(memory.clone()))
///     .build()
///     .expect("start delivery loops");
///
/// log.info("service started").warning("no warning channel, reported on stderr");
/// log.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
/// assert_eq!(memory.len(), 1);
/// ```
pub struct Log {
    channels: HashMap<Severity, Arc<SeverityChannel>>,
    formatter: MessageFormatter,
    metrics: Arc<LoggerMetrics>,
    diagnostics: Diagnostics,
}

impl Log {
    /// Create a builder for Log
    #[must_use]
    pub fn builder() -> LogBuilder {
        LogBuilder::new()
    }

    /// A facade with no channels; every call only emits a diagnostic.
    pub fn unconfigured() -> Self {
        Self {
            channels: HashMap::new(),
            formatter: MessageFormatter::default(),
            metrics: Arc::new(LoggerMetrics::new()),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn is_configured(&self, severity: Severity) -> bool {
        self.channels.contains_key(&severity)
    }

    pub fn channel(&self, severity: Severity) -> Option<&Arc<SeverityChannel>> {
        self.channels.get(&severity)
    }

    pub fn formatter(&self) -> &MessageFormatter {
        &self.formatter
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    #[track_caller]
    pub fn info(&self, msg: impl AsRef<str>) -> &Self {
        self.emit(Severity::Info, &msg.as_ref(), Location::caller(), false);
        self
    }

    #[track_caller]
    pub fn info_fmt(&self, args: fmt::Arguments<'_>) -> &Self {
        self.emit(Severity::Info, &args, Location::caller(), false);
        self
    }

    #[track_caller]
    pub fn warning(&self, msg: impl AsRef<str>) -> &Self {
        self.emit(Severity::Warning, &msg.as_ref(), Location::caller(), false);
        self
    }

    #[track_caller]
    pub fn warning_fmt(&self, args: fmt::Arguments<'_>) -> &Self {
        self.emit(Severity::Warning, &args, Location::caller(), false);
        self
    }

    /// Record an error; `None` is a no-op.
    ///
    /// ```
    /// # use alog::Log;
    /// let log = Log::unconfigured();
    /// log.error(std::fs::read("/definitely/missing").err());
    /// log.error(None::<std::io::Error>);
    /// ```
    #[track_caller]
    pub fn error<E: fmt::Display>(&self, err: Option<E>) -> &Self {
        if let Some(err) = err {
            self.emit(Severity::Error, &err, Location::caller(), false);
        }
        self
    }

    #[track_caller]
    pub fn error_fmt(&self, args: fmt::Arguments<'_>) -> &Self {
        self.emit(Severity::Error, &args, Location::caller(), false);
        self
    }

    /// Record an error with a captured stack trace; `None` is a no-op.
    #[track_caller]
    pub fn error_debug<E: fmt::Display>(&self, err: Option<E>) -> &Self {
        if let Some(err) = err {
            self.emit(Severity::Error, &err, Location::caller(), true);
        }
        self
    }

    /// Format and enqueue `text`, surfacing routing failures.
    ///
    /// Unlike the severity-named calls, this returns `NotConfigured` or
    /// `ChannelClosed` instead of reporting them.
    #[track_caller]
    pub fn try_log(&self, severity: Severity, text: impl AsRef<str>) -> Result<usize> {
        let location = Location::caller();
        let Some(channel) = self.channels.get(&severity) else {
            self.metrics.record_not_configured();
            return Err(LoggerError::not_configured(severity));
        };
        let message = self
            .formatter
            .prepare(&Utc::now(), text.as_ref(), Some(location));
        channel.enqueue(message)
    }

    /// Expose a severity channel as a generic byte sink.
    ///
    /// An unconfigured severity yields [`SeverityWriter::Discard`].
    pub fn writer_by_severity(&self, severity: Severity) -> SeverityWriter {
        match self.channels.get(&severity) {
            Some(channel) => SeverityWriter::Channel(Arc::clone(channel)),
            None => SeverityWriter::Discard,
        }
    }

    fn emit(
        &self,
        severity: Severity,
        text: &dyn fmt::Display,
        location: &'static Location<'static>,
        with_stack: bool,
    ) {
        let Some(channel) = self.channels.get(&severity) else {
            self.metrics.record_not_configured();
            // an error that cannot be routed is at least shown on stderr
            let message = (severity == Severity::Error).then(|| text.to_string());
            self.diagnostics.report(Diagnostic::NotConfigured {
                severity,
                location: Some(location),
                message,
            });
            return;
        };

        let now = Utc::now();
        let text = text.to_string();
        let message = if with_stack {
            let stack = Backtrace::force_capture();
            self.formatter
                .prepare_with_stack(&now, &text, Some(location), &stack)
        } else {
            self.formatter.prepare(&now, &text, Some(location))
        };

        if channel.enqueue(message).is_err() {
            self.diagnostics.report(Diagnostic::ChannelClosed {
                severity,
                location: Some(location),
            });
        }
    }

    /// Close every channel and wait for the delivery loops to drain.
    ///
    /// Returns `true` if all loops finished within `timeout`. Calls made
    /// afterwards emit a `ChannelClosed` diagnostic.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        for channel in self.channels.values() {
            channel.close();
        }

        let start = Instant::now();
        let mut finished = true;
        for channel in self.channels.values() {
            let remaining = timeout.saturating_sub(start.elapsed());
            finished &= channel.join(remaining);
        }
        finished
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::unconfigured()
    }
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Log")
            .field("channels", &self.channels)
            .field("formatter", &self.formatter)
            .finish()
    }
}

impl Drop for Log {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        let dropped = self.metrics.dropped();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} messages not delivered to every strategy",
                dropped
            );
        }
    }
}

/// Builder for constructing Log with a fluent API
///
/// # Example
/// ```
/// use alog::prelude::*;
/// use std::sync::Arc;
///
/// let log = Log::builder()
///     .custom_time_format("%Y-%m-%d %H:%M:%S")
///     .ignore_file_line(true)
///     .channel(Severity::Error, ChannelConfig::new(100).strategy(MemoryStrategy::new()))
///     .on_diagnostic(Arc::new(|d: &Diagnostic| eprintln!("ALERT: {}", d)))
///     .build()
///     .expect("start delivery loops");
/// ```
pub struct LogBuilder {
    time_format: TimestampFormat,
    ignore_file_line: bool,
    channels: HashMap<Severity, ChannelConfig>,
    echo_diagnostics: bool,
    on_diagnostic: Option<DiagnosticCallback>,
}

impl LogBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            time_format: TimestampFormat::default(),
            ignore_file_line: false,
            channels: HashMap::new(),
            echo_diagnostics: true,
            on_diagnostic: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_format(mut self, format: TimestampFormat) -> Self {
        self.time_format = format;
        self
    }

    /// Set a custom timestamp format using a strftime-compatible format string
    #[must_use = "builder methods return a new value"]
    pub fn custom_time_format(mut self, format_str: &str) -> Self {
        self.time_format = TimestampFormat::Custom(format_str.to_string());
        self
    }

    /// Leave the caller's `file:line` out of formatted messages
    #[must_use = "builder methods return a new value"]
    pub fn ignore_file_line(mut self, ignore: bool) -> Self {
        self.ignore_file_line = ignore;
        self
    }

    /// Configure the channel of `severity`; a later call replaces an earlier one
    #[must_use = "builder methods return a new value"]
    pub fn channel(mut self, severity: Severity, config: ChannelConfig) -> Self {
        self.channels.insert(severity, config);
        self
    }

    /// Echo diagnostics to stderr (default: on)
    #[must_use = "builder methods return a new value"]
    pub fn echo_diagnostics(mut self, echo: bool) -> Self {
        self.echo_diagnostics = echo;
        self
    }

    /// Set a callback for diagnostic notifications
    #[must_use = "builder methods return a new value"]
    pub fn on_diagnostic(mut self, callback: DiagnosticCallback) -> Self {
        self.on_diagnostic = Some(callback);
        self
    }

    /// Build the Log, starting one delivery loop per configured channel
    ///
    /// Fails with `InvalidConfiguration` for a custom timestamp format chrono
    /// cannot render.
    pub fn build(self) -> Result<Log> {
        self.time_format
            .validate()
            .map_err(|e| LoggerError::config("TimestampFormat", e))?;

        let metrics = Arc::new(LoggerMetrics::new());
        let diagnostics = Diagnostics::new(self.echo_diagnostics, self.on_diagnostic);

        let mut channels = HashMap::with_capacity(self.channels.len());
        for (severity, config) in self.channels {
            let channel = SeverityChannel::spawn(
                severity,
                config.capacity,
                config.strategies,
                Arc::clone(&metrics),
                diagnostics.clone(),
            )?;
            channels.insert(severity, channel);
        }

        Ok(Log {
            channels,
            formatter: MessageFormatter::new(self.time_format, self.ignore_file_line),
            metrics,
            diagnostics,
        })
    }
}

impl Default for LogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::MemoryStrategy;
    use parking_lot::Mutex;

    fn recording() -> (DiagnosticCallback, Arc<Mutex<Vec<Diagnostic>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let callback: DiagnosticCallback = Arc::new(move |d: &Diagnostic| {
            seen_clone.lock().push(d.clone());
        });
        (callback, seen)
    }

    fn memory_log(severity: Severity) -> (Log, Arc<MemoryStrategy>) {
        let memory = Arc::new(MemoryStrategy::new());
        let log = Log::builder()
            .time_format(TimestampFormat::Rfc3339)
            .echo_diagnostics(false)
            .channel(severity, ChannelConfig::new(8).shared_strategy(memory.clone()))
            .build()
            .expect("build log");
        (log, memory)
    }

    #[test]
    fn test_builder_default() {
        let log = LogBuilder::default().build().expect("build log");
        for severity in Severity::ALL {
            assert!(!log.is_configured(severity));
        }
        assert_eq!(log.formatter(), &MessageFormatter::default());
    }

    #[test]
    fn test_info_is_formatted_with_call_site() {
        let (log, memory) = memory_log(Severity::Info);
        let line = line!() + 1;
        log.info("Hello, ALog!");
        assert!(log.shutdown(DEFAULT_SHUTDOWN_TIMEOUT));

        let messages = memory.messages();
        assert_eq!(messages.len(), 1);
        let expected_suffix = format!(";{}:{};Hello, ALog!\n", file!(), line);
        assert!(
            messages[0].ends_with(&expected_suffix),
            "unexpected message {:?}",
            messages[0]
        );
    }

    #[test]
    fn test_ignore_file_line() {
        let memory = Arc::new(MemoryStrategy::new());
        let log = Log::builder()
            .ignore_file_line(true)
            .channel(Severity::Warning, ChannelConfig::new(1).shared_strategy(memory.clone()))
            .build()
            .expect("build log");

        log.warning_fmt(format_args!("disk {}% full", 91));
        log.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        let messages = memory.messages();
        let (_, rest) = messages[0].split_once(';').expect("timestamp field");
        assert_eq!(rest, "disk 91% full\n");
    }

    #[test]
    fn test_calls_are_chainable() {
        let (log, memory) = memory_log(Severity::Info);
        log.info("one").info_fmt(format_args!("two {}", 2)).info("three");
        log.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        assert_eq!(memory.len(), 3);
    }

    #[test]
    fn test_not_configured_is_reported_not_raised() {
        let (callback, seen) = recording();
        let log = Log::builder()
            .echo_diagnostics(false)
            .on_diagnostic(callback)
            .build()
            .expect("build log");

        let returned = log.warning("x");
        assert!(std::ptr::eq(returned, &log));
        assert_eq!(log.metrics().not_configured(), 1);
        assert_eq!(log.metrics().enqueued(), 0);

        let seen = seen.lock();
        assert!(matches!(
            seen[0],
            Diagnostic::NotConfigured {
                severity: Severity::Warning,
                location: Some(_),
                message: None,
            }
        ));
    }

    #[test]
    fn test_unrouted_error_keeps_text() {
        let (callback, seen) = recording();
        let log = Log::builder()
            .echo_diagnostics(false)
            .on_diagnostic(callback)
            .build()
            .expect("build log");

        log.error(Some("boom"));
        let seen = seen.lock();
        assert!(seen[0].to_string().ends_with("Logger Error not configured: boom"));
    }

    #[test]
    fn test_error_none_is_noop() {
        let (callback, seen) = recording();
        let memory = Arc::new(MemoryStrategy::new());
        let log = Log::builder()
            .echo_diagnostics(false)
            .on_diagnostic(callback)
            .channel(Severity::Error, ChannelConfig::new(4).shared_strategy(memory.clone()))
            .build()
            .expect("build log");

        log.error(None::<std::io::Error>).error_debug(None::<String>);
        log.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        assert!(memory.is_empty());
        assert_eq!(log.metrics().enqueued(), 0);
        assert!(seen.lock().is_empty());

        // not even a diagnostic when the error channel is missing
        let bare = Log::builder().echo_diagnostics(false).build().expect("build log");
        bare.error(None::<&str>);
        assert_eq!(bare.metrics().not_configured(), 0);
    }

    #[test]
    fn test_error_debug_appends_stack() {
        let (log, memory) = memory_log(Severity::Error);
        log.error_debug(Some("boom"));
        log.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        let messages = memory.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains(";boom\n\n"));
        assert!(messages[0].ends_with("\n---\n\n"));
    }

    #[test]
    fn test_try_log_surfaces_errors() {
        let (log, _memory) = memory_log(Severity::Info);

        let err = log.try_log(Severity::Error, "nowhere").unwrap_err();
        assert!(matches!(err, LoggerError::NotConfigured { severity: Severity::Error }));

        assert!(log.try_log(Severity::Info, "ok").expect("enqueue") > 0);

        log.channel(Severity::Info).expect("info channel").close();
        let err = log.try_log(Severity::Info, "late").unwrap_err();
        assert!(err.is_channel_closed());
    }

    #[test]
    fn test_calls_after_shutdown_do_not_panic() {
        let (callback, seen) = recording();
        let log = Log::builder()
            .echo_diagnostics(false)
            .on_diagnostic(callback)
            .channel(Severity::Info, ChannelConfig::new(1).strategy(MemoryStrategy::new()))
            .build()
            .expect("build log");

        assert!(log.shutdown(DEFAULT_SHUTDOWN_TIMEOUT));
        log.info("after shutdown");

        assert_eq!(log.metrics().closed_rejections(), 1);
        assert!(matches!(
            seen.lock()[0],
            Diagnostic::ChannelClosed { severity: Severity::Info, .. }
        ));
    }

    #[test]
    fn test_writer_by_severity() {
        let (log, memory) = memory_log(Severity::Info);

        assert!(log.writer_by_severity(Severity::Error).is_discard());

        let writer = log.writer_by_severity(Severity::Info);
        assert!(!writer.is_discard());
        Strategy::write(&writer, b"raw bytes").expect("write");

        log.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        assert_eq!(memory.messages(), vec!["raw bytes"]);
    }

    #[test]
    fn test_invalid_time_format_is_rejected_at_build() {
        let err = Log::builder()
            .custom_time_format("%Y-%Q")
            .channel(Severity::Info, ChannelConfig::new(1).strategy(MemoryStrategy::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_unvalidated_time_format_does_not_panic_caller() {
        // a formatter built directly skips builder validation
        let memory = Arc::new(MemoryStrategy::new());
        let mut log = Log::builder()
            .echo_diagnostics(false)
            .channel(Severity::Info, ChannelConfig::new(2).shared_strategy(memory.clone()))
            .build()
            .expect("build log");
        log.formatter = MessageFormatter::new(TimestampFormat::Custom("%Y-%Q".to_string()), true);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            log.info("x");
        }));
        assert!(result.is_ok());
        log.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        let messages = memory.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].ends_with("Z;x\n"));
    }

    #[test]
    fn test_later_channel_config_replaces_earlier() {
        let log = Log::builder()
            .echo_diagnostics(false)
            .channel(Severity::Info, ChannelConfig::new(1))
            .channel(Severity::Info, ChannelConfig::new(7).strategy(MemoryStrategy::new()))
            .build()
            .expect("build log");

        let channel = log.channel(Severity::Info).expect("info channel");
        assert_eq!(channel.capacity(), 7);
        assert_eq!(channel.strategy_names(), ["memory"]);
    }
}
