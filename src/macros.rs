//! Template-style logging macros.
//!
//! Each macro takes either a logger expression followed by a format string,
//! or just a format string, in which case the global logger is used.
//! Formatting is skipped when no sink accepts the level.
//!
//! # Examples
//!
//! ```
//! use teelog::{infof, warnf, Logger, Options};
//!
//! let logger = Logger::builder(Options::default())
//!     .with_console_writer(std::io::sink())
//!     .build()
//!     .unwrap();
//!
//! let port = 8080;
//! infof!(logger, "listening on port {}", port);
//! warnf!(logger, "retry {} of {}", 3, 5);
//!
//! // The global logger
//! infof!("started in {} ms", 12);
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __log_fmt {
    ($method:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::global::logger().$method(::std::format_args!($fmt $(, $arg)*))
    };
    ($method:ident, $logger:expr, $($arg:tt)+) => {
        $logger.$method(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at an explicit level.
///
/// ```
/// # use teelog::{Logger, Options};
/// # let logger = Logger::builder(Options::default()).with_console_writer(std::io::sink()).build().unwrap();
/// use teelog::{logf, Level};
/// logf!(logger, Level::Error, "error code: {}", 500);
/// ```
#[macro_export]
macro_rules! logf {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.at_level_fmt($level, ::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at `Debug`.
#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::__log_fmt!(debug_fmt, $($arg)+)
    };
}

/// Log a formatted message at `Info`.
#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::__log_fmt!(info_fmt, $($arg)+)
    };
}

/// Log a formatted message at `Warn`.
#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => {
        $crate::__log_fmt!(warn_fmt, $($arg)+)
    };
}

/// Log a formatted message at `Error`.
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::__log_fmt!(error_fmt, $($arg)+)
    };
}

/// Log a formatted message at `Panic`, then panic with it.
#[macro_export]
macro_rules! panicf {
    ($($arg:tt)+) => {
        $crate::__log_fmt!(panic_fmt, $($arg)+)
    };
}

/// Log a formatted message at `Fatal`, then exit the process.
#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)+) => {
        $crate::__log_fmt!(fatal_fmt, $($arg)+)
    };
}

/// Build an alternating key/value list for the `*_kv` methods.
///
/// ```
/// use teelog::{kv, FieldValue};
/// let pairs: Vec<FieldValue> = kv!["user", "alice", "attempts", 3];
/// assert_eq!(pairs.len(), 4);
/// ```
#[macro_export]
macro_rules! kv {
    ($($item:expr),* $(,)?) => {
        ::std::vec![$($crate::FieldValue::from($item)),*]
    };
}
