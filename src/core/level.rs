//! Log level definitions

use super::error::LoggerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Ordered log severity.
///
/// Filtering compares by rank: a sink configured at `Warn` accepts `Warn`,
/// `Error`, `Panic` and `Fatal` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    Debug = 0,
    #[default]
    Info = 1,
    Warn = 2,
    Error = 3,
    /// Recorded, then the calling thread panics with the message.
    Panic = 4,
    /// Recorded, then the process exits with status 1.
    Fatal = 5,
}

impl Level {
    /// All recognized levels, lowest first.
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Panic,
        Level::Fatal,
    ];

    /// Canonical uppercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Panic => "PANIC",
            Level::Fatal => "FATAL",
        }
    }

    pub fn as_lowercase_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
        }
    }

    /// Numeric rank of this level.
    pub fn code(&self) -> i8 {
        *self as i8
    }

    pub fn from_code(code: i8) -> Option<Self> {
        Self::ALL.iter().copied().find(|level| level.code() == code)
    }

    /// Whether logging at this level ends normal control flow.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Level::Panic | Level::Fatal)
    }

    pub fn color(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Level::Debug => Magenta,
            Level::Info => Blue,
            Level::Warn => Yellow,
            Level::Error | Level::Panic | Level::Fatal => Red,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            "PANIC" => Ok(Level::Panic),
            "FATAL" => Ok(Level::Fatal),
            _ => Err(LoggerError::UnrecognizedLevel(s.to_string())),
        }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_lowercase_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// A raw level value as accepted by the `at_level*` dispatchers.
///
/// Values that do not name one of the six levels are still accepted; the
/// logger reports them and falls back to `Warn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelCode(pub i8);

impl LevelCode {
    pub fn level(&self) -> Option<Level> {
        Level::from_code(self.0)
    }
}

impl From<Level> for LevelCode {
    fn from(level: Level) -> Self {
        LevelCode(level.code())
    }
}

impl From<i8> for LevelCode {
    fn from(code: i8) -> Self {
        LevelCode(code)
    }
}

impl fmt::Display for LevelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level() {
            Some(level) => write!(f, "{}", level),
            None => write!(f, "Level({})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("debug".parse::<Level>().unwrap(), Level::Debug);
        assert_eq!("Info".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("WARN".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("eRRoR".parse::<Level>().unwrap(), Level::Error);
        assert_eq!("panic".parse::<Level>().unwrap(), Level::Panic);
        assert_eq!("FATAL".parse::<Level>().unwrap(), Level::Fatal);
    }

    #[test]
    fn test_parse_rejects_unknown_text() {
        let err = "failed".parse::<Level>().unwrap_err();
        assert_eq!(err.to_string(), r#"unrecognized level: "failed""#);

        assert!("".parse::<Level>().is_err());
        assert!("warning".parse::<Level>().is_err());
        assert!("trace".parse::<Level>().is_err());
    }

    #[test]
    fn test_ordering_follows_rank() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Panic);
        assert!(Level::Panic < Level::Fatal);
    }

    #[test]
    fn test_codes_round_trip() {
        for level in Level::ALL {
            assert_eq!(Level::from_code(level.code()), Some(level));
        }
        assert_eq!(Level::from_code(-1), None);
        assert_eq!(Level::from_code(42), None);
    }

    #[test]
    fn test_level_code_display() {
        assert_eq!(LevelCode::from(Level::Warn).to_string(), "WARN");
        assert_eq!(LevelCode(42).to_string(), "Level(42)");
    }

    #[test]
    fn test_terminal_levels() {
        assert!(Level::Panic.is_terminal());
        assert!(Level::Fatal.is_terminal());
        assert!(!Level::Error.is_terminal());
    }

    #[test]
    fn test_serde_as_text() {
        let json = serde_json::to_string(&Level::Warn).unwrap();
        assert_eq!(json, r#""warn""#);
        let level: Level = serde_json::from_str(r#""ERROR""#).unwrap();
        assert_eq!(level, Level::Error);
        assert!(serde_json::from_str::<Level>(r#""loud""#).is_err());
    }
}
