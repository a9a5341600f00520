//! In-memory strategy
//!
//! Keeps every delivered payload; handy for tests and for callers that want
//! to inspect what a channel produced.

use crate::core::{Result, Strategy};
use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct MemoryStrategy {
    messages: Mutex<Vec<String>>,
    arrived: Condvar,
}

impl MemoryStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the received payloads, in arrival order
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }

    /// Block until at least `count` payloads arrived or `timeout` expired.
    ///
    /// Returns whether the count was reached.
    pub fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut messages = self.messages.lock();
        while messages.len() < count {
            if self.arrived.wait_until(&mut messages, deadline).timed_out() {
                return messages.len() >= count;
            }
        }
        true
    }
}

impl Strategy for MemoryStrategy {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        self.messages
            .lock()
            .push(String::from_utf8_lossy(buf).into_owned());
        self.arrived.notify_all();
        Ok(buf.len())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
