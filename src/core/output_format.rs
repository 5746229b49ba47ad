//! Record encodings
//!
//! - Console: human-readable, elements joined by the configured separator
//! - Json: one JSON object per line

use super::encoder::EncoderConfig;
use super::field::FieldValue;
use super::record::Record;

/// Output format for log records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format (default)
    ///
    /// Example: `2025-01-08 10:30:45.123 INFO request served status=200`
    #[default]
    Console,

    /// JSON format for machine processing
    ///
    /// Example: `{"level":"INFO","time":"2025-01-08 10:30:45.123","msg":"request served","status":200}`
    Json,
}

impl OutputFormat {
    /// Encode a record, line ending included.
    pub fn encode(&self, record: &Record, config: &EncoderConfig) -> String {
        let mut line = match self {
            OutputFormat::Console => self.encode_console(record, config),
            OutputFormat::Json => self.encode_json(record, config),
        };
        line.push_str(&config.line_ending);
        line
    }

    fn encode_console(&self, record: &Record, config: &EncoderConfig) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(5 + record.fields.len());

        if config.time_key.is_some() {
            parts.push(config.time_encoder.encode(&record.time));
        }
        if config.level_key.is_some() {
            parts.push(config.level_encoder.encode(record.level));
        }
        if let (Some(_), Some(name)) = (&config.name_key, &record.logger_name) {
            parts.push(name.clone());
        }
        if config.caller_key.is_some() {
            parts.push(config.caller_encoder.encode(&record.caller));
        }
        if config.message_key.is_some() {
            parts.push(sanitize_message(&record.message));
        }
        for field in &record.fields {
            parts.push(format!(
                "{}={}",
                field.key,
                console_value(&field.value)
            ));
        }

        let mut line = parts.join(&config.console_separator);
        if let (Some(_), Some(stack)) = (&config.stacktrace_key, &record.stack) {
            line.push('\n');
            line.push_str(stack.trim_end());
        }
        line
    }

    fn encode_json(&self, record: &Record, config: &EncoderConfig) -> String {
        let mut json_obj = serde_json::Map::new();

        if let Some(key) = &config.level_key {
            json_obj.insert(
                key.clone(),
                serde_json::Value::String(config.level_encoder.encode(record.level)),
            );
        }
        if let Some(key) = &config.time_key {
            json_obj.insert(key.clone(), config.time_encoder.encode_json(&record.time));
        }
        if let (Some(key), Some(name)) = (&config.name_key, &record.logger_name) {
            json_obj.insert(key.clone(), serde_json::Value::String(name.clone()));
        }
        if let Some(key) = &config.caller_key {
            json_obj.insert(
                key.clone(),
                serde_json::Value::String(config.caller_encoder.encode(&record.caller)),
            );
        }
        if let Some(key) = &config.message_key {
            json_obj.insert(key.clone(), serde_json::Value::String(record.message.clone()));
        }
        for field in &record.fields {
            json_obj.insert(field.key.clone(), field.value.to_json_value());
        }
        if let (Some(key), Some(stack)) = (&config.stacktrace_key, &record.stack) {
            json_obj.insert(key.clone(), serde_json::Value::String(stack.clone()));
        }

        serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
    }
}

/// Escape control characters so one record cannot masquerade as several.
fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn console_value(value: &FieldValue) -> String {
    match value {
        FieldValue::String(s) if needs_quotes(s) => quote_value(s),
        other => other.to_string(),
    }
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '"' || c == '=')
}

fn quote_value(value: &str) -> String {
    format!(
        "\"{}\"",
        sanitize_message(&value.replace('\\', "\\\\").replace('"', "\\\""))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoder::{CapitalColorLevelEncoder, FullCallerEncoder};
    use crate::core::{Caller, Field, Level};
    use chrono::{Local, TimeZone};
    use std::sync::Arc;

    fn record(level: Level, message: &str) -> Record {
        Record::new(
            level,
            message,
            Caller {
                file: "src/app/main.rs",
                line: 12,
                column: 5,
            },
        )
        .with_time(Local.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap())
    }

    #[test]
    fn test_console_element_order() {
        let entry = record(Level::Info, "Test message")
            .with_name(Some("api".into()))
            .with_fields(vec![Field::int("user_id", 123), Field::string("action", "login")]);
        let result = OutputFormat::Console.encode(&entry, &EncoderConfig::default());

        assert_eq!(
            result,
            "2025-01-08 10:30:45.000 INFO api app/main.rs:12 Test message user_id=123 action=login\n"
        );
    }

    #[test]
    fn test_console_omits_disabled_elements() {
        let config = EncoderConfig {
            time_key: None,
            caller_key: None,
            level_encoder: Arc::new(CapitalColorLevelEncoder),
            ..EncoderConfig::default()
        };
        let result = OutputFormat::Console.encode(&record(Level::Info, "Hello, world2"), &config);
        assert_eq!(result, "\x1b[34mINFO\x1b[0m Hello, world2\n");
    }

    #[test]
    fn test_console_quotes_and_escapes() {
        let entry = record(Level::Warn, "line one\nINFO forged")
            .with_fields(vec![Field::string("query", "SELECT * FROM users WHERE id=1")]);
        let config = EncoderConfig {
            time_key: None,
            caller_key: None,
            ..EncoderConfig::default()
        };
        let result = OutputFormat::Console.encode(&entry, &config);

        assert_eq!(result.lines().count(), 1);
        assert!(result.contains("line one\\nINFO forged"));
        assert!(result.contains("query=\"SELECT * FROM users WHERE id=1\""));
    }

    #[test]
    fn test_console_stack_on_following_lines() {
        let entry = record(Level::Panic, "boom").with_stack(Some("frame 0\nframe 1\n".into()));
        let result = OutputFormat::Console.encode(&entry, &EncoderConfig::default());
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("boom"));
        assert_eq!(lines[1], "frame 0");
    }

    #[test]
    fn test_json_format() {
        let entry = record(Level::Error, "Error occurred")
            .with_fields(vec![Field::string("request_id", "abc-123"), Field::int("latency_ms", 42)]);
        let config = EncoderConfig {
            caller_encoder: Arc::new(FullCallerEncoder),
            ..EncoderConfig::default()
        };
        let result = OutputFormat::Json.encode(&entry, &config);
        assert!(result.ends_with('\n'));

        let parsed: serde_json::Value = serde_json::from_str(result.trim_end()).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["msg"], "Error occurred");
        assert_eq!(parsed["time"], "2025-01-08 10:30:45.000");
        assert_eq!(parsed["caller"], "src/app/main.rs:12");
        assert_eq!(parsed["request_id"], "abc-123");
        assert_eq!(parsed["latency_ms"], 42);
        assert!(parsed.get("logger").is_none());
    }

    #[test]
    fn test_json_key_order() {
        let entry = record(Level::Info, "ordered")
            .with_name(Some("svc".into()))
            .with_fields(vec![Field::bool("z", true), Field::bool("a", false)]);
        let result = OutputFormat::Json.encode(&entry, &EncoderConfig::default());
        let parsed: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(result.trim_end()).unwrap();
        let keys: Vec<&str> = parsed.keys().map(String::as_str).collect();
        assert_eq!(keys, ["level", "time", "logger", "caller", "msg", "z", "a"]);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Console);
    }
}
