//! Strategy trait for log output destinations

use super::error::Result;
use std::sync::Arc;

/// A pluggable output sink.
///
/// A single strategy instance may be attached to several severity channels,
/// in which case several delivery loops call `write` concurrently. Hence
/// `&self` receivers: implementations guard their own resource.
pub trait Strategy: Send + Sync {
    /// Consume one fully formatted message, returning the number of bytes
    /// accepted.
    fn write(&self, buf: &[u8]) -> Result<usize>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

/// Strategy handle stored by channels; cloning shares the sink.
pub type SharedStrategy = Arc<dyn Strategy>;

impl<S: Strategy + ?Sized> Strategy for Arc<S> {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
