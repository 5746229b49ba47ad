//! Built-in record time encodings
//!
//! [`TimestampFormat`] is the stock [`TimeEncoder`]. Formats are named by
//! short text so they can be picked from configuration; anything that is
//! not a known name is taken as a strftime pattern, which must be one chrono
//! can render.

use super::encoder::TimeEncoder;
use super::error::LoggerError;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;

const STANDARD_PATTERN: &str = "%Y-%m-%d %H:%M:%S%.3f";
const ISO8601_PATTERN: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";
const ISO8601_MICROS_PATTERN: &str = "%Y-%m-%dT%H:%M:%S%.6f%:z";

/// How a record's local time is rendered.
///
/// | name          | example                            |
/// |---------------|------------------------------------|
/// | `standard`    | `2025-01-08 10:30:45.123`          |
/// | `iso8601`     | `2025-01-08T10:30:45.123+01:00`    |
/// | `iso8601-us`  | `2025-01-08T10:30:45.123456+01:00` |
/// | `rfc3339`     | `2025-01-08T10:30:45.123456789+01:00` |
/// | `unix`        | `1736332245`                       |
/// | `unix-ms`     | `1736332245123`                    |
/// | `unix-us`     | `1736332245123456`                 |
///
/// Unix variants are written as numbers in JSON records.
///
/// ```
/// use teelog::{TimeEncoder, TimestampFormat};
/// use chrono::{Local, TimeZone};
///
/// let at = Local.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::Standard.encode(&at), "2025-01-08 10:30:45.000");
///
/// let apache: TimestampFormat = "%d/%b/%Y:%H:%M:%S".parse().unwrap();
/// assert_eq!(apache.encode(&at), "08/Jan/2025:10:30:45");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TimestampFormat {
    #[default]
    Standard,
    Iso8601,
    Iso8601Micros,
    Rfc3339,
    Unix,
    UnixMillis,
    UnixMicros,
    /// A strftime pattern.
    Custom(String),
}

impl TimestampFormat {
    /// Configuration name, or the pattern itself for [`Custom`](Self::Custom).
    pub fn name(&self) -> &str {
        match self {
            TimestampFormat::Standard => "standard",
            TimestampFormat::Iso8601 => "iso8601",
            TimestampFormat::Iso8601Micros => "iso8601-us",
            TimestampFormat::Rfc3339 => "rfc3339",
            TimestampFormat::Unix => "unix",
            TimestampFormat::UnixMillis => "unix-ms",
            TimestampFormat::UnixMicros => "unix-us",
            TimestampFormat::Custom(pattern) => pattern,
        }
    }

    /// Seconds, milliseconds or microseconds since the epoch for the Unix
    /// variants; `None` for textual formats.
    pub fn epoch(&self, datetime: &DateTime<Local>) -> Option<i64> {
        match self {
            TimestampFormat::Unix => Some(datetime.timestamp()),
            TimestampFormat::UnixMillis => Some(datetime.timestamp_millis()),
            TimestampFormat::UnixMicros => Some(datetime.timestamp_micros()),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TimestampFormat::Unix | TimestampFormat::UnixMillis | TimestampFormat::UnixMicros
        )
    }

    #[must_use]
    pub fn format(&self, datetime: &DateTime<Local>) -> String {
        if let Some(epoch) = self.epoch(datetime) {
            return epoch.to_string();
        }
        let pattern = match self {
            TimestampFormat::Rfc3339 => return datetime.to_rfc3339(),
            TimestampFormat::Iso8601 => ISO8601_PATTERN,
            TimestampFormat::Iso8601Micros => ISO8601_MICROS_PATTERN,
            TimestampFormat::Custom(pattern) => pattern.as_str(),
            _ => STANDARD_PATTERN,
        };
        let mut out = String::new();
        if write!(out, "{}", datetime.format(pattern)).is_err() {
            // A directly constructed Custom pattern may be malformed.
            out.clear();
            let _ = write!(out, "{}", datetime.format(STANDARD_PATTERN));
        }
        out
    }
}

/// Rejects patterns chrono cannot render, such as `%Q` or a trailing `%`.
fn check_pattern(pattern: &str) -> Result<(), LoggerError> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(LoggerError::config(
            "TimestampFormat",
            format!("invalid strftime pattern {:?}", pattern),
        ));
    }
    Ok(())
}

impl FromStr for TimestampFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s.to_ascii_lowercase().as_str() {
            "" | "standard" => TimestampFormat::Standard,
            "iso8601" => TimestampFormat::Iso8601,
            "iso8601-us" => TimestampFormat::Iso8601Micros,
            "rfc3339" => TimestampFormat::Rfc3339,
            "unix" => TimestampFormat::Unix,
            "unix-ms" => TimestampFormat::UnixMillis,
            "unix-us" => TimestampFormat::UnixMicros,
            _ if s.contains('%') => {
                check_pattern(s)?;
                TimestampFormat::Custom(s.to_string())
            }
            _ => {
                return Err(LoggerError::config(
                    "TimestampFormat",
                    format!("unknown time format {:?}", s),
                ))
            }
        };
        Ok(format)
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<TimestampFormat> for String {
    fn from(format: TimestampFormat) -> Self {
        format.name().to_string()
    }
}

impl TryFrom<String> for TimestampFormat {
    type Error = LoggerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TimeEncoder for TimestampFormat {
    fn encode(&self, time: &DateTime<Local>) -> String {
        self.format(time)
    }

    fn encode_json(&self, time: &DateTime<Local>) -> serde_json::Value {
        match self.epoch(time) {
            Some(epoch) => epoch.into(),
            None => serde_json::Value::String(self.format(time)),
        }
    }
}
