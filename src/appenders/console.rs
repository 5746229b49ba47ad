//! Serialized console stream

use crate::core::appender::WriteSyncer;
use crate::core::error::{LoggerError, Result};
use parking_lot::Mutex;
use std::io::{self, Write};

/// Wraps any [`Write`] so concurrent records never interleave.
///
/// Each record is written and flushed under the lock; nothing is buffered
/// between calls.
pub struct LockedWriter<W: Write + Send> {
    inner: Mutex<W>,
}

impl LockedWriter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl LockedWriter<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> LockedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W: Write + Send> WriteSyncer for LockedWriter<W> {
    fn write_all(&self, buf: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock();
        inner
            .write_all(buf)
            .and_then(|_| inner.flush())
            .map_err(|e| LoggerError::writer(format!("console write failed: {}", e)))
    }

    fn sync(&self) -> Result<()> {
        self.inner
            .lock()
            .flush()
            .map_err(|e| LoggerError::writer(format!("console flush failed: {}", e)))
    }
}
