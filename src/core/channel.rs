//! Severity channel and its delivery loop
//!
//! Each configured severity owns a bounded FIFO drained by exactly one
//! background thread. The single consumer keeps per-severity ordering
//! without further locking on the strategy list.

use super::{
    diagnostics::{panic_message, Diagnostic, Diagnostics},
    error::{LoggerError, Result},
    metrics::LoggerMetrics,
    severity::Severity,
    strategy::SharedStrategy,
};
use crossbeam_channel::{bounded, select, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default queue capacity of a severity channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// An ordered, bounded message queue for one severity, paired with the
/// delivery loop that fans each message out to the attached strategies.
pub struct SeverityChannel {
    severity: Severity,
    capacity: usize,
    strategy_names: Vec<String>,
    /// `None` once closed; enqueue holds the read side while sending
    sender: RwLock<Option<Sender<String>>>,
    /// Dropped on close to wake producers suspended on a full queue
    close_signal: Mutex<Option<Sender<()>>>,
    closed: Receiver<()>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
    metrics: Arc<LoggerMetrics>,
}

impl SeverityChannel {
    /// Create the channel and start its delivery loop.
    pub fn spawn(
        severity: Severity,
        capacity: usize,
        strategies: Vec<SharedStrategy>,
        metrics: Arc<LoggerMetrics>,
        diagnostics: Diagnostics,
    ) -> Result<Arc<Self>> {
        let (sender, receiver) = bounded(capacity);
        let (close_signal, closed) = bounded(0);
        let strategy_names = strategies.iter().map(|s| s.name().to_string()).collect();

        let delivery = DeliveryLoop {
            severity,
            receiver,
            strategies,
            metrics: Arc::clone(&metrics),
            diagnostics,
        };
        let handle = thread::Builder::new()
            .name(format!("alog-{}", severity.name().to_lowercase()))
            .spawn(move || delivery.run())
            .map_err(LoggerError::ThreadSpawn)?;

        Ok(Arc::new(Self {
            severity,
            capacity,
            strategy_names,
            sender: RwLock::new(Some(sender)),
            close_signal: Mutex::new(Some(close_signal)),
            closed,
            handle: Mutex::new(Some(handle)),
            metrics,
        }))
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Names of the attached strategies, in delivery order
    pub fn strategy_names(&self) -> &[String] {
        &self.strategy_names
    }

    /// Number of messages waiting for the delivery loop
    pub fn len(&self) -> usize {
        self.sender.read().as_ref().map_or(0, |s| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }

    /// Place `message` at the tail of the queue.
    ///
    /// Suspends while the queue is full. Returns the number of bytes
    /// accepted, or `ChannelClosed` if the channel is closed before or
    /// while waiting for space.
    pub fn enqueue(&self, message: String) -> Result<usize> {
        let len = message.len();
        let guard = self.sender.read();
        let Some(sender) = guard.as_ref() else {
            return Err(self.reject());
        };

        let sent = select! {
            send(sender, message) -> res => res.is_ok(),
            recv(self.closed) -> _ => false,
        };
        drop(guard);

        if sent {
            self.metrics.record_enqueued();
            Ok(len)
        } else {
            Err(self.reject())
        }
    }

    fn reject(&self) -> LoggerError {
        self.metrics.record_closed_rejection();
        LoggerError::channel_closed(self.severity)
    }

    /// Close the queue for recording.
    ///
    /// Producers waiting for space are released with `ChannelClosed`;
    /// everything already queued is still delivered. Idempotent.
    pub fn close(&self) {
        drop(self.close_signal.lock().take());
        drop(self.sender.write().take());
    }

    /// Wait for the delivery loop to drain and exit after `close`.
    ///
    /// Returns `false` if the loop is still running when `timeout` expires.
    pub fn join(&self, timeout: Duration) -> bool {
        let Some(handle) = self.handle.lock().take() else {
            return true;
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!(
                        "[LOGGER ERROR] {} delivery thread panicked during shutdown: {:?}",
                        self.severity, e
                    );
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] {} delivery thread did not finish within {:?}. \
                     Some logs may be lost.",
                    self.severity, timeout
                );
                // put it back so a later join can still wait for it
                *self.handle.lock() = Some(handle);
                return false;
            }

            thread::sleep(Duration::from_millis(5));
        }
    }
}

impl std::fmt::Debug for SeverityChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeverityChannel")
            .field("severity", &self.severity)
            .field("capacity", &self.capacity)
            .field("strategies", &self.strategy_names)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Single consumer of one severity channel.
struct DeliveryLoop {
    severity: Severity,
    receiver: Receiver<String>,
    strategies: Vec<SharedStrategy>,
    metrics: Arc<LoggerMetrics>,
    diagnostics: Diagnostics,
}

impl DeliveryLoop {
    /// Runs until the channel is closed and drained.
    fn run(self) {
        // recv blocks while empty and only fails once disconnected and empty
        while let Ok(message) = self.receiver.recv() {
            self.deliver(message.as_bytes());
        }

        for strategy in &self.strategies {
            if let Err(e) = strategy.flush() {
                eprintln!(
                    "[LOGGER ERROR] {} strategy '{}' flush failed: {}",
                    self.severity,
                    strategy.name(),
                    e
                );
            }
        }
    }

    /// Write one message to every strategy in attachment order.
    ///
    /// A failing or panicking strategy is reported and skipped; siblings
    /// still receive the message.
    fn deliver(&self, bytes: &[u8]) {
        let mut has_error = false;

        for (index, strategy) in self.strategies.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                strategy.write(bytes)
            }));

            match result {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    has_error = true;
                    let written = match e {
                        LoggerError::StrategyWriteFailed { written, .. } => written,
                        _ => 0,
                    };
                    self.metrics.record_strategy_failure();
                    self.diagnostics.report(Diagnostic::StrategyWriteFailed {
                        severity: self.severity,
                        strategy: strategy.name().to_string(),
                        index,
                        written,
                        error: e.to_string(),
                    });
                }
                Err(payload) => {
                    has_error = true;
                    self.metrics.record_strategy_failure();
                    self.diagnostics.report(Diagnostic::StrategyPanicked {
                        severity: self.severity,
                        strategy: strategy.name().to_string(),
                        index,
                        panic: panic_message(payload.as_ref()),
                    });
                }
            }
        }

        if has_error {
            self.metrics.record_dropped();
        }
        self.metrics.record_delivered();
    }
}
