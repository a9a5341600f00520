//! Logger metrics for observability
//!
//! Counters shared by the facade and all of its delivery loops.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use alog::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_enqueued();
/// metrics.record_delivered();
///
/// assert_eq!(metrics.enqueued(), 1);
/// assert_eq!(metrics.delivered(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Messages accepted by a severity channel
    enqueued: AtomicU64,

    /// Messages whose fan-out completed
    delivered: AtomicU64,

    /// Individual strategy writes that failed or panicked
    strategy_failures: AtomicU64,

    /// Messages whose fan-out had at least one failing strategy
    dropped: AtomicU64,

    /// Facade calls for a severity without a channel
    not_configured: AtomicU64,

    /// Enqueue attempts rejected because the channel was closed
    closed_rejections: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            strategy_failures: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            not_configured: AtomicU64::new(0),
            closed_rejections: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn strategy_failures(&self) -> u64 {
        self.strategy_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn not_configured(&self) -> u64 {
        self.not_configured.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn closed_rejections(&self) -> u64 {
        self.closed_rejections.load(Ordering::Relaxed)
    }

    /// Messages accepted but not yet fanned out
    pub fn pending(&self) -> u64 {
        self.enqueued().saturating_sub(self.delivered())
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_strategy_failure(&self) -> u64 {
        self.strategy_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_not_configured(&self) -> u64 {
        self.not_configured.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_closed_rejection(&self) -> u64 {
        self.closed_rejections.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.enqueued.store(0, Ordering::Relaxed);
        self.delivered.store(0, Ordering::Relaxed);
        self.strategy_failures.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
        self.not_configured.store(0, Ordering::Relaxed);
        self.closed_rejections.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            delivered: AtomicU64::new(self.delivered()),
            strategy_failures: AtomicU64::new(self.strategy_failures()),
            dropped: AtomicU64::new(self.dropped()),
            not_configured: AtomicU64::new(self.not_configured()),
            closed_rejections: AtomicU64::new(self.closed_rejections()),
        }
    }
}
