//! Process-wide default logger
//!
//! The slot starts with a console-only logger built from
//! [`Options::default`]. Reconfiguring builds a complete new [`Logger`] and
//! swaps it in; calls already running keep the logger they started with.
//!
//! ```
//! use teelog::global;
//!
//! teelog::info("using the default console logger");
//!
//! let previous = global::replace(
//!     teelog::Logger::builder(teelog::Options::default())
//!         .with_console_writer(std::io::sink())
//!         .build()
//!         .unwrap(),
//! );
//! teelog::warn("goes to the new logger");
//! let _ = global::replace((*previous).clone());
//! ```

use crate::core::{
    Disposition, Field, FieldValue, Level, LevelCode, Logger, Options, Result,
};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

static GLOBAL: Lazy<RwLock<Arc<Logger>>> =
    Lazy::new(|| RwLock::new(Arc::new(Logger::new(Options::default()))));

/// The current process-wide logger.
pub fn logger() -> Arc<Logger> {
    Arc::clone(&GLOBAL.read())
}

/// Install `logger`, returning the one it replaces.
///
/// The previous logger is not closed; close it once nothing else uses it.
pub fn replace(logger: Logger) -> Arc<Logger> {
    std::mem::replace(&mut *GLOBAL.write(), Arc::new(logger))
}

/// Build a logger from `options` and install it.
///
/// # Panics
///
/// Panics if the log file cannot be opened; see [`try_configure`].
pub fn configure(options: Options) {
    if let Err(e) = try_configure(options) {
        panic!("failed to configure global logger: {}", e);
    }
}

/// Build a logger from `options` and install it. On error the current
/// logger stays in place.
pub fn try_configure(options: Options) -> Result<()> {
    let logger = Logger::try_new(options)?;
    let previous = replace(logger);
    let _ = previous.flush();
    Ok(())
}

macro_rules! global_level_fns {
    ($plain:ident, $fields:ident, $fmt:ident, $kv:ident) => {
        #[track_caller]
        pub fn $plain(msg: impl Into<String>) {
            logger().$plain(msg)
        }

        #[track_caller]
        pub fn $fields(msg: impl Into<String>, fields: impl IntoIterator<Item = Field>) {
            logger().$fields(msg, fields)
        }

        #[track_caller]
        pub fn $fmt(args: fmt::Arguments<'_>) {
            logger().$fmt(args)
        }

        #[track_caller]
        pub fn $kv(msg: impl Into<String>, key_values: impl IntoIterator<Item = FieldValue>) {
            logger().$kv(msg, key_values)
        }
    };
}

global_level_fns!(debug, debug_fields, debug_fmt, debug_kv);
global_level_fns!(info, info_fields, info_fmt, info_kv);
global_level_fns!(warn, warn_fields, warn_fmt, warn_kv);
global_level_fns!(error, error_fields, error_fmt, error_kv);
global_level_fns!(panic, panic_fields, panic_fmt, panic_kv);
global_level_fns!(fatal, fatal_fields, fatal_fmt, fatal_kv);

#[track_caller]
pub fn log(level: Level, msg: impl Into<String>, fields: impl IntoIterator<Item = Field>) -> Disposition {
    logger().log(level, msg, fields)
}

#[track_caller]
pub fn at_level(level: impl Into<LevelCode>, msg: impl Into<String>) {
    logger().at_level(level, msg)
}

#[track_caller]
pub fn at_level_fields(
    level: impl Into<LevelCode>,
    msg: impl Into<String>,
    fields: impl IntoIterator<Item = Field>,
) {
    logger().at_level_fields(level, msg, fields)
}

#[track_caller]
pub fn at_level_fmt(level: impl Into<LevelCode>, args: fmt::Arguments<'_>) {
    logger().at_level_fmt(level, args)
}

#[track_caller]
pub fn at_level_kv(
    level: impl Into<LevelCode>,
    msg: impl Into<String>,
    key_values: impl IntoIterator<Item = FieldValue>,
) {
    logger().at_level_kv(level, msg, key_values)
}

#[track_caller]
pub fn print(msg: impl fmt::Display) {
    logger().print(msg)
}

#[track_caller]
pub fn println(msg: impl fmt::Display) {
    logger().println(msg)
}

#[track_caller]
pub fn printf(args: fmt::Arguments<'_>) {
    logger().printf(args)
}

pub fn enabled(level: Level) -> bool {
    logger().enabled(level)
}

/// A child of the current global logger with `fields` bound.
pub fn with_values(fields: impl IntoIterator<Item = Field>) -> Logger {
    logger().with_values(fields)
}

pub fn named(name: &str) -> Logger {
    logger().named(name)
}

pub fn flush() -> Result<()> {
    logger().flush()
}

/// Close the current global logger. It stays installed; file writes after
/// this fail until a new logger is configured.
pub fn close() -> Result<()> {
    logger().close()
}
