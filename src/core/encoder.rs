//! Pluggable formatting strategies
//!
//! Each concern (file name, timestamp, level text, caller text) is a trait
//! with a single method. Plain closures implement the traits too, so a
//! one-off format does not need a named type:
//!
//! ```
//! use teelog::{Caller, CallerEncoder, Level, LevelEncoder};
//!
//! let level = |level: Level| format!("<{}>", level.as_lowercase_str());
//! assert_eq!(LevelEncoder::encode(&level, Level::Warn), "<warn>");
//!
//! let caller = |c: &Caller| format!("line {}", c.line);
//! let here = Caller { file: "src/main.rs", line: 7, column: 1 };
//! assert_eq!(CallerEncoder::encode(&caller, &here), "line 7");
//! ```

use super::level::Level;
use super::record::Caller;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Local};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Produces the log file name (without directory).
pub trait FilenameEncoder: Send + Sync {
    fn encode(&self) -> String;
}

/// Renders a record timestamp.
pub trait TimeEncoder: Send + Sync {
    fn encode(&self, time: &DateTime<Local>) -> String;

    /// Value placed in JSON records. Defaults to the text form.
    fn encode_json(&self, time: &DateTime<Local>) -> serde_json::Value {
        serde_json::Value::String(self.encode(time))
    }
}

/// Renders a record level.
pub trait LevelEncoder: Send + Sync {
    fn encode(&self, level: Level) -> String;
}

/// Renders a call-site location.
pub trait CallerEncoder: Send + Sync {
    fn encode(&self, caller: &Caller) -> String;
}

impl<F> FilenameEncoder for F
where
    F: Fn() -> String + Send + Sync,
{
    fn encode(&self) -> String {
        self()
    }
}

impl<F> TimeEncoder for F
where
    F: Fn(&DateTime<Local>) -> String + Send + Sync,
{
    fn encode(&self, time: &DateTime<Local>) -> String {
        self(time)
    }
}

impl<F> LevelEncoder for F
where
    F: Fn(Level) -> String + Send + Sync,
{
    fn encode(&self, level: Level) -> String {
        self(level)
    }
}

impl<F> CallerEncoder for F
where
    F: Fn(&Caller) -> String + Send + Sync,
{
    fn encode(&self, caller: &Caller) -> String {
        self(caller)
    }
}

/// `<process-name>-<YYYYMMDD>.log`, dated with today's local date.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFilenameEncoder;

impl DefaultFilenameEncoder {
    /// Base name of the running program, as invoked.
    pub fn process_name() -> String {
        std::env::args_os()
            .next()
            .and_then(|arg0| {
                Path::new(&arg0)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "app".to_string())
    }

    pub fn filename_for(date: &DateTime<Local>) -> String {
        format!("{}-{}.log", Self::process_name(), date.format("%Y%m%d"))
    }
}

impl FilenameEncoder for DefaultFilenameEncoder {
    fn encode(&self) -> String {
        Self::filename_for(&Local::now())
    }
}

/// `INFO`
#[derive(Debug, Clone, Copy, Default)]
pub struct CapitalLevelEncoder;

/// `info`
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseLevelEncoder;

/// `INFO` wrapped in the level's ANSI colour.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapitalColorLevelEncoder;

/// `info` wrapped in the level's ANSI colour.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseColorLevelEncoder;

fn paint(level: Level, text: &str) -> String {
    // Escapes are written unconditionally; the sink decided colour is wanted.
    format!("\x1b[{}m{}\x1b[0m", level.color().to_fg_str(), text)
}

impl LevelEncoder for CapitalLevelEncoder {
    fn encode(&self, level: Level) -> String {
        level.as_str().to_string()
    }
}

impl LevelEncoder for LowercaseLevelEncoder {
    fn encode(&self, level: Level) -> String {
        level.as_lowercase_str().to_string()
    }
}

impl LevelEncoder for CapitalColorLevelEncoder {
    fn encode(&self, level: Level) -> String {
        paint(level, level.as_str())
    }
}

impl LevelEncoder for LowercaseColorLevelEncoder {
    fn encode(&self, level: Level) -> String {
        paint(level, level.as_lowercase_str())
    }
}

/// `core/logger.rs:42`
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortCallerEncoder;

/// `/home/me/project/src/core/logger.rs:42`
#[derive(Debug, Clone, Copy, Default)]
pub struct FullCallerEncoder;

impl CallerEncoder for ShortCallerEncoder {
    fn encode(&self, caller: &Caller) -> String {
        format!("{}:{}", caller.short_path(), caller.line)
    }
}

impl CallerEncoder for FullCallerEncoder {
    fn encode(&self, caller: &Caller) -> String {
        caller.to_string()
    }
}

/// Element names and strategies shared by a sink's record encoder.
///
/// A key set to `None` drops that element from the output.
#[derive(Clone)]
pub struct EncoderConfig {
    pub message_key: Option<String>,
    pub level_key: Option<String>,
    pub time_key: Option<String>,
    pub caller_key: Option<String>,
    pub name_key: Option<String>,
    pub stacktrace_key: Option<String>,
    pub line_ending: String,
    pub console_separator: String,
    pub time_encoder: Arc<dyn TimeEncoder>,
    pub level_encoder: Arc<dyn LevelEncoder>,
    pub caller_encoder: Arc<dyn CallerEncoder>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            message_key: Some("msg".to_string()),
            level_key: Some("level".to_string()),
            time_key: Some("time".to_string()),
            caller_key: Some("caller".to_string()),
            name_key: Some("logger".to_string()),
            stacktrace_key: Some("stack".to_string()),
            line_ending: "\n".to_string(),
            console_separator: " ".to_string(),
            time_encoder: Arc::new(TimestampFormat::Standard),
            level_encoder: Arc::new(CapitalLevelEncoder),
            caller_encoder: Arc::new(ShortCallerEncoder),
        }
    }
}

impl fmt::Debug for EncoderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderConfig")
            .field("message_key", &self.message_key)
            .field("level_key", &self.level_key)
            .field("time_key", &self.time_key)
            .field("caller_key", &self.caller_key)
            .field("name_key", &self.name_key)
            .field("stacktrace_key", &self.stacktrace_key)
            .field("line_ending", &self.line_ending)
            .field("console_separator", &self.console_separator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_level_encoders() {
        assert_eq!(CapitalLevelEncoder.encode(Level::Info), "INFO");
        assert_eq!(LowercaseLevelEncoder.encode(Level::Fatal), "fatal");
    }

    #[test]
    fn test_color_level_encoders() {
        assert_eq!(
            CapitalColorLevelEncoder.encode(Level::Info),
            "\x1b[34mINFO\x1b[0m"
        );
        assert_eq!(
            CapitalColorLevelEncoder.encode(Level::Debug),
            "\x1b[35mDEBUG\x1b[0m"
        );
        assert_eq!(
            CapitalColorLevelEncoder.encode(Level::Warn),
            "\x1b[33mWARN\x1b[0m"
        );
        assert_eq!(
            LowercaseColorLevelEncoder.encode(Level::Error),
            "\x1b[31merror\x1b[0m"
        );
    }

    #[test]
    fn test_caller_encoders() {
        let caller = Caller {
            file: "/srv/app/src/net/conn.rs",
            line: 88,
            column: 5,
        };
        assert_eq!(ShortCallerEncoder.encode(&caller), "net/conn.rs:88");
        assert_eq!(FullCallerEncoder.encode(&caller), "/srv/app/src/net/conn.rs:88");
    }

    #[test]
    fn test_default_filename_pattern() {
        let date = Local.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let name = DefaultFilenameEncoder::filename_for(&date);
        assert!(name.ends_with("-20240309.log"));
        assert!(name.starts_with(&DefaultFilenameEncoder::process_name()));
    }

    #[test]
    fn test_closure_encoders() {
        let filename = || "fixed.log".to_string();
        assert_eq!(FilenameEncoder::encode(&filename), "fixed.log");

        let time = |t: &DateTime<Local>| t.format("%H").to_string();
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 0, 0).unwrap();
        assert_eq!(TimeEncoder::encode(&time, &at), "07");
        assert_eq!(time.encode_json(&at), serde_json::json!("07"));
    }

    #[test]
    fn test_default_config_keys() {
        let config = EncoderConfig::default();
        assert_eq!(config.message_key.as_deref(), Some("msg"));
        assert_eq!(config.name_key.as_deref(), Some("logger"));
        assert_eq!(config.stacktrace_key.as_deref(), Some("stack"));
        assert_eq!(config.console_separator, " ");
        assert_eq!(config.line_ending, "\n");
    }
}
