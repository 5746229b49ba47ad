//! Error types for the logger

use super::error_list::ErrorList;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Level text that names none of the known levels
    #[error("unrecognized level: {0:?}")]
    UnrecognizedLevel(String),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File appender error with path
    #[error("File appender error for '{path}': {message}")]
    FileAppenderError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// The file resource was already released
    #[error("log file '{path}' already closed")]
    AlreadyClosed { path: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Several sinks failed at once
    #[error("{0}")]
    Multiple(ErrorList),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file appender error
    pub fn file_appender(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileAppenderError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn already_closed(path: impl Into<String>) -> Self {
        LoggerError::AlreadyClosed { path: path.into() }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Collapse a list of failures: `Ok` when empty, the single error when
    /// there is exactly one, `Multiple` otherwise.
    pub fn from_list(errors: ErrorList) -> Result<()> {
        match errors.count() {
            0 => Ok(()),
            1 => {
                let only = errors
                    .into_iter()
                    .next()
                    .map(|e| match e.downcast::<LoggerError>() {
                        Ok(err) => *err,
                        Err(other) => LoggerError::Other(other.to_string()),
                    })
                    .unwrap_or_else(|| LoggerError::other("empty error list"));
                Err(only)
            }
            _ => Err(LoggerError::Multiple(errors)),
        }
    }
}
