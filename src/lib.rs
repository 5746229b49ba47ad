//! # teelog
//!
//! Leveled structured logging to the console and to an optionally rotating
//! log file, configured from a single [`Options`] value.
//!
//! ## Features
//!
//! - **Tee'd sinks**: console and file each have their own level threshold and encoding
//! - **Three call styles**: typed fields, format templates and alternating key/values
//! - **JSON or human-readable** file records
//! - **Rotation**: size, age and backup-count limits with optional gzip
//! - **Global logger**: swappable at runtime without racing in-flight calls
//!
//! ## Quick start
//!
//! ```no_run
//! use teelog::{Field, Options};
//!
//! teelog::configure(
//!     Options::default()
//!         .with_console_level("debug")
//!         .with_file("/var/log/myapp")
//!         .with_rotation(100, 7, 5),
//! );
//!
//! teelog::info_fields("server started", [Field::int("port", 8080)]);
//! teelog::infof!("ready in {} ms", 42);
//! teelog::close().ok();
//! ```

pub mod appenders;
pub mod core;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{LockedWriter, RotatingFileWriter, RotationPolicy, SyncFile};
    pub use crate::core::{
        Appender, Caller, CallerEncoder, Disposition, EncoderConfig, ErrorList, Field,
        FieldValue, FilenameEncoder, Level, LevelCode, LevelEncoder, Logger, LoggerError,
        Options, OutputFormat, PipelineBuilder, Record, Result, TimeEncoder, TimestampFormat,
    };
    pub use crate::{debugf, errorf, fatalf, infof, kv, logf, panicf, warnf};
}

pub use self::appenders::{LockedWriter, RotatingFileWriter, RotationPolicy, SyncFile};
pub use self::core::{
    Appender, Caller, CallerEncoder, CapitalColorLevelEncoder, CapitalLevelEncoder, Closer,
    DefaultFilenameEncoder, Disposition, EncoderConfig, Encoders, ErrorList, Field, FieldValue,
    FilenameEncoder, FullCallerEncoder, LevelCode, LevelEnabler, LevelEncoder, Level, Logger,
    LoggerError, LowercaseColorLevelEncoder, LowercaseLevelEncoder, Options, OutputFormat,
    Pipeline, PipelineBuilder, Record, Result, ShortCallerEncoder, TimeEncoder, TimestampFormat,
    WriteSyncer, WriterAppender, DEFAULT_CALLER_SKIP,
};
pub use self::global::{
    at_level, at_level_fields, at_level_fmt, at_level_kv, close, configure, debug, debug_fields,
    debug_fmt, debug_kv, enabled, error, error_fields, error_fmt, error_kv, fatal, fatal_fields,
    fatal_fmt, fatal_kv, flush, info, info_fields, info_fmt, info_kv, log, logger, named, panic,
    panic_fields, panic_fmt, panic_kv, print, printf, println, replace, try_configure, warn,
    warn_fields, warn_fmt, warn_kv, with_values,
};
