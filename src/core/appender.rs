//! Appender trait for log output destinations
//!
//! An appender is one filtered sink: it decides whether a level is wanted,
//! encodes accepted records and hands the bytes to a [`WriteSyncer`].

use super::encoder::EncoderConfig;
use super::error::Result;
use super::level::Level;
use super::output_format::OutputFormat;
use super::record::Record;
use std::sync::Arc;

pub trait Appender: Send + Sync {
    /// Whether a record at `level` would be written by this appender.
    fn enabled(&self, level: Level) -> bool;
    fn append(&self, record: &Record) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}

/// A byte destination that can be forced to persist what it was given.
///
/// Implementations synchronise internally; every method takes `&self`.
pub trait WriteSyncer: Send + Sync {
    fn write_all(&self, buf: &[u8]) -> Result<()>;
    fn sync(&self) -> Result<()>;
}

/// Releases an owned resource such as an open log file.
pub trait Closer: Send + Sync {
    fn close(&self) -> Result<()>;
}

/// Level predicate guarding an appender.
pub trait LevelEnabler: Send + Sync {
    fn enabled(&self, level: Level) -> bool;
}

/// A level enables itself and everything above it.
impl LevelEnabler for Level {
    fn enabled(&self, level: Level) -> bool {
        level >= *self
    }
}

impl<F> LevelEnabler for F
where
    F: Fn(Level) -> bool + Send + Sync,
{
    fn enabled(&self, level: Level) -> bool {
        self(level)
    }
}

/// Encodes records with one [`OutputFormat`] and writes them to one writer.
pub struct WriterAppender {
    name: String,
    format: OutputFormat,
    config: EncoderConfig,
    writer: Arc<dyn WriteSyncer>,
    enabler: Box<dyn LevelEnabler>,
}

impl WriterAppender {
    pub fn new(
        name: impl Into<String>,
        format: OutputFormat,
        config: EncoderConfig,
        writer: Arc<dyn WriteSyncer>,
        enabler: impl LevelEnabler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            format,
            config,
            writer,
            enabler: Box::new(enabler),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }
}

impl Appender for WriterAppender {
    fn enabled(&self, level: Level) -> bool {
        self.enabler.enabled(level)
    }

    fn append(&self, record: &Record) -> Result<()> {
        let line = self.format.encode(record, &self.config);
        self.writer.write_all(line.as_bytes())
    }

    fn flush(&self) -> Result<()> {
        self.writer.sync()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
