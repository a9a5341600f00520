//! Generic byte-sink view of a severity channel
//!
//! Lets third-party components that only know `std::io::Write` (or
//! [`Strategy`]) feed a severity channel directly.

use super::{channel::SeverityChannel, error::Result, strategy::Strategy};
use std::io;
use std::sync::Arc;

/// Writer returned by [`Log::writer_by_severity`](super::Log::writer_by_severity).
///
/// Bytes are enqueued as-is, without timestamp or call-site. An
/// unconfigured severity yields `Discard`, which accepts and drops
/// everything.
#[derive(Debug, Clone)]
pub enum SeverityWriter {
    Channel(Arc<SeverityChannel>),
    Discard,
}

impl SeverityWriter {
    pub fn is_discard(&self) -> bool {
        matches!(self, SeverityWriter::Discard)
    }

    fn enqueue(&self, buf: &[u8]) -> Result<usize> {
        match self {
            SeverityWriter::Channel(channel) => {
                channel.enqueue(String::from_utf8_lossy(buf).into_owned())?;
                Ok(buf.len())
            }
            SeverityWriter::Discard => Ok(buf.len()),
        }
    }
}

impl io::Write for SeverityWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.enqueue(buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Strategy for SeverityWriter {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        self.enqueue(buf)
    }

    fn name(&self) -> &str {
        match self {
            SeverityWriter::Channel(_) => "severity-channel",
            SeverityWriter::Discard => "discard",
        }
    }
}
