//! Fan-out of one record to every interested appender

use super::appender::Appender;
use super::error::{LoggerError, Result};
use super::error_list::ErrorList;
use super::level::Level;
use super::record::Record;

/// A fixed set of appenders written together.
///
/// Built once; the set never changes afterwards. One failing appender
/// does not stop the others from receiving the record.
#[derive(Default)]
pub struct Pipeline {
    appenders: Vec<Box<dyn Appender>>,
}

impl Pipeline {
    pub fn new(appenders: Vec<Box<dyn Appender>>) -> Self {
        Self { appenders }
    }

    pub fn len(&self) -> usize {
        self.appenders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appenders.is_empty()
    }

    pub fn appender_names(&self) -> Vec<&str> {
        self.appenders.iter().map(|a| a.name()).collect()
    }

    /// True if at least one appender accepts `level`.
    pub fn enabled(&self, level: Level) -> bool {
        self.appenders.iter().any(|a| a.enabled(level))
    }

    /// Hand the record to each appender whose level predicate accepts it.
    ///
    /// Write failures are reported on stderr; the call itself cannot fail.
    pub fn append(&self, record: &Record) {
        for appender in self.appenders.iter() {
            if !appender.enabled(record.level) {
                continue;
            }
            if let Err(e) = appender.append(record) {
                eprintln!(
                    "[LOGGER ERROR] Appender '{}' failed: {}",
                    appender.name(),
                    e
                );
            }
        }
    }

    /// Flush every appender, even after a failure.
    pub fn flush(&self) -> Result<()> {
        let mut errors = ErrorList::new();
        for appender in self.appenders.iter() {
            if let Err(e) = appender.flush() {
                errors.push(e);
            }
        }
        LoggerError::from_list(errors)
    }
}
