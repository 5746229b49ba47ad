//! Log record structure

use super::field::Field;
use super::level::Level;
use chrono::{DateTime, Local};
use std::fmt;
use std::panic::Location;

/// Source location of a log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl Caller {
    /// Location of the nearest caller not marked `#[track_caller]`.
    #[track_caller]
    pub fn here() -> Self {
        Location::caller().into()
    }

    /// The last directory component and file name, e.g. `core/logger.rs`.
    pub fn short_path(&self) -> &'static str {
        let file = self.file;
        let mut seps = file
            .char_indices()
            .rev()
            .filter(|(_, c)| *c == '/' || *c == '\\')
            .map(|(idx, _)| idx);
        let _last = seps.next();
        match seps.next() {
            Some(idx) => &file[idx + 1..],
            None => file,
        }
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One log event as handed to every appender.
#[derive(Debug, Clone)]
pub struct Record {
    pub level: Level,
    pub time: DateTime<Local>,
    pub logger_name: Option<String>,
    pub caller: Caller,
    pub message: String,
    pub fields: Vec<Field>,
    pub stack: Option<String>,
}

impl Record {
    pub fn new(level: Level, message: impl Into<String>, caller: Caller) -> Self {
        Self {
            level,
            time: Local::now(),
            logger_name: None,
            caller,
            message: message.into(),
            fields: Vec::new(),
            stack: None,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.logger_name = name;
        self
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_stack(mut self, stack: Option<String>) -> Self {
        self.stack = stack;
        self
    }

    pub fn with_time(mut self, time: DateTime<Local>) -> Self {
        self.time = time;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_path() {
        let caller = Caller {
            file: "src/core/logger.rs",
            line: 10,
            column: 1,
        };
        assert_eq!(caller.short_path(), "core/logger.rs");

        let caller = Caller {
            file: "main.rs",
            line: 1,
            column: 1,
        };
        assert_eq!(caller.short_path(), "main.rs");

        let caller = Caller {
            file: "src\\main.rs",
            line: 1,
            column: 1,
        };
        assert_eq!(caller.short_path(), "src\\main.rs");
    }

    #[test]
    fn test_here_points_at_this_file() {
        let caller = Caller::here();
        assert!(caller.file.ends_with("record.rs"));
        assert_eq!(caller.to_string(), format!("{}:{}", caller.file, caller.line));
    }

    #[test]
    fn test_record_builders() {
        let record = Record::new(Level::Warn, "disk low", Caller::here())
            .with_name(Some("storage".into()))
            .with_fields(vec![Field::int("free_mb", 12)]);
        assert_eq!(record.level, Level::Warn);
        assert_eq!(record.logger_name.as_deref(), Some("storage"));
        assert_eq!(record.fields.len(), 1);
        assert!(record.stack.is_none());
    }
}
