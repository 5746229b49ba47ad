//! Logger configuration

use super::encoder::{CallerEncoder, FilenameEncoder, LevelEncoder, TimeEncoder};
use super::error::LoggerError;
use super::error_list::ErrorList;
use super::level::Level;
use crate::appenders::RotationPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Value used for `caller_skip` when it is unset or negative.
pub const DEFAULT_CALLER_SKIP: i32 = 1;

/// Formatting overrides. Unset entries use the built-in defaults.
#[derive(Clone, Default)]
pub struct Encoders {
    pub filename: Option<Arc<dyn FilenameEncoder>>,
    pub time: Option<Arc<dyn TimeEncoder>>,
    pub level: Option<Arc<dyn LevelEncoder>>,
    pub caller: Option<Arc<dyn CallerEncoder>>,
}

impl fmt::Debug for Encoders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoders")
            .field("filename", &self.filename.is_some())
            .field("time", &self.time.is_some())
            .field("level", &self.level.is_some())
            .field("caller", &self.caller.is_some())
            .finish()
    }
}

/// Configuration for logging.
///
/// Field names map to kebab-case keys, so a configuration section like
/// the following deserializes directly; missing keys keep their defaults:
///
/// ```
/// use teelog::Options;
///
/// let opts: Options = serde_json::from_str(r#"{
///     "console-level": "debug",
///     "disable-file": false,
///     "output": "/var/log/app"
/// }"#).unwrap();
///
/// assert_eq!(opts.console_level, "debug");
/// assert!(!opts.disable_file);
/// assert!(opts.disable_rotate);
/// assert!(opts.validate().is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Options {
    /// Whether to log to console
    pub disable_console: bool,
    /// Force disabling colors
    pub disable_console_color: bool,
    /// Whether to add a time to console records
    pub disable_console_time: bool,
    /// Whether to add a level to console records
    pub disable_console_level: bool,
    /// Whether to add caller info to console records
    pub disable_console_caller: bool,
    /// Minimum console level
    pub console_level: String,

    /// Whether to log to file
    pub disable_file: bool,
    /// Write the file as human-readable lines instead of JSON
    pub disable_file_json: bool,
    /// Whether to add a time to file records
    pub disable_file_time: bool,
    /// Whether to add caller info to file records
    pub disable_file_caller: bool,
    /// Minimum file level
    pub file_level: String,

    /// Whether to rotate the log file
    pub disable_rotate: bool,
    /// Max size in MB of the log file before it's rolled
    pub max_size: u64,
    /// Max age in days to keep a rolled file
    pub max_age: u64,
    /// Max number of rolled files to keep
    pub max_backups: usize,
    /// Gzip rolled files
    pub compress: bool,

    /// Directory for the log file when file logging is enabled
    pub output: String,

    /// Kept for configuration compatibility and exposed through
    /// [`Logger::caller_skip`](crate::Logger::caller_skip). It does not move
    /// the reported call site: that is the nearest caller not marked
    /// `#[track_caller]`, so wrappers around the logger should carry that
    /// attribute to report their own callers.
    pub caller_skip: i32,

    #[serde(skip)]
    pub encoders: Encoders,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            disable_console: false,
            disable_console_color: false,
            disable_console_time: false,
            disable_console_level: false,
            disable_console_caller: true,
            console_level: Level::Info.as_lowercase_str().to_string(),
            disable_file: true,
            disable_file_json: false,
            disable_file_time: false,
            disable_file_caller: false,
            file_level: Level::Info.as_lowercase_str().to_string(),
            disable_rotate: true,
            max_size: 0,
            max_age: 0,
            max_backups: 0,
            compress: false,
            output: String::new(),
            caller_skip: DEFAULT_CALLER_SKIP,
            encoders: Encoders::default(),
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every configuration problem. An empty list means valid.
    ///
    /// Order: console level, file level, no enabled sink, missing output.
    pub fn validate(&self) -> ErrorList {
        let mut errs = ErrorList::new();

        for text in [&self.console_level, &self.file_level] {
            if !text.is_empty() {
                if let Err(e) = text.parse::<Level>() {
                    errs.push(e);
                }
            }
        }

        if self.disable_console && self.disable_file {
            errs.push(LoggerError::config(
                "Options",
                "no enabled logger, one or more of (disable-console, disable-file) must be set to false",
            ));
        }

        if !self.disable_file && self.output.is_empty() {
            errs.push(LoggerError::config(
                "Options",
                "no log output, 'output' must be set",
            ));
        }

        errs
    }

    /// Rotation limits taken from `max_size`, `max_age`, `max_backups` and `compress`.
    pub fn rotation_policy(&self) -> RotationPolicy {
        RotationPolicy::new()
            .with_max_size(self.max_size)
            .with_max_age(self.max_age)
            .with_max_backups(self.max_backups)
            .with_compression(self.compress)
    }

    /// `caller_skip`, with negative values replaced by the default.
    pub fn effective_caller_skip(&self) -> usize {
        if self.caller_skip < 0 {
            DEFAULT_CALLER_SKIP as usize
        } else {
            self.caller_skip as usize
        }
    }

    pub fn with_console(mut self, enabled: bool) -> Self {
        self.disable_console = !enabled;
        self
    }

    pub fn with_console_color(mut self, enabled: bool) -> Self {
        self.disable_console_color = !enabled;
        self
    }

    pub fn with_console_time(mut self, enabled: bool) -> Self {
        self.disable_console_time = !enabled;
        self
    }

    pub fn with_console_caller(mut self, enabled: bool) -> Self {
        self.disable_console_caller = !enabled;
        self
    }

    pub fn with_console_level(mut self, level: impl Into<String>) -> Self {
        self.console_level = level.into();
        self
    }

    /// Enable file logging into `output`.
    pub fn with_file(mut self, output: impl Into<String>) -> Self {
        self.disable_file = false;
        self.output = output.into();
        self
    }

    pub fn with_file_json(mut self, enabled: bool) -> Self {
        self.disable_file_json = !enabled;
        self
    }

    pub fn with_file_level(mut self, level: impl Into<String>) -> Self {
        self.file_level = level.into();
        self
    }

    /// Enable rotation with the given limits (MB, days, count; zero is unbounded).
    pub fn with_rotation(mut self, max_size: u64, max_age: u64, max_backups: usize) -> Self {
        self.disable_rotate = false;
        self.max_size = max_size;
        self.max_age = max_age;
        self.max_backups = max_backups;
        self
    }

    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_caller_skip(mut self, skip: i32) -> Self {
        self.caller_skip = skip;
        self
    }

    pub fn with_filename_encoder(mut self, encoder: impl FilenameEncoder + 'static) -> Self {
        self.encoders.filename = Some(Arc::new(encoder));
        self
    }

    pub fn with_time_encoder(mut self, encoder: impl TimeEncoder + 'static) -> Self {
        self.encoders.time = Some(Arc::new(encoder));
        self
    }

    pub fn with_level_encoder(mut self, encoder: impl LevelEncoder + 'static) -> Self {
        self.encoders.level = Some(Arc::new(encoder));
        self
    }

    pub fn with_caller_encoder(mut self, encoder: impl CallerEncoder + 'static) -> Self {
        self.encoders.caller = Some(Arc::new(encoder));
        self
    }
}

/// Parse a level leniently: empty text is `Info` without complaint, bad
/// text is `Info` plus the parse error.
pub(crate) fn resolve_level(text: &str) -> (Level, Option<LoggerError>) {
    if text.is_empty() {
        return (Level::Info, None);
    }
    match text.parse() {
        Ok(level) => (level, None),
        Err(e) => (Level::Info, Some(e)),
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
