//! Main logger implementation
//!
//! Every severity is reachable in four styles:
//!
//! | style      | example                                              |
//! |------------|------------------------------------------------------|
//! | plain      | `logger.info("started")`                             |
//! | fields     | `logger.info_fields("started", [Field::int("port", 80)])` |
//! | template   | `logger.info_fmt(format_args!("port {}", 80))`       |
//! | key-value  | `logger.info_kv("started", kv!["port", 80])`         |
//!
//! All of them funnel into [`Logger::log`], which records and reports
//! whether the call must end in a panic or a process exit.

use super::appender::Closer;
use super::builder::PipelineBuilder;
use super::error::Result;
use super::field::{Field, FieldValue};
use super::level::{Level, LevelCode};
use super::options::Options;
use super::pipeline::Pipeline;
use super::record::{Caller, Record};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What the caller must do after a record has been written.
#[must_use = "a terminal disposition must be enforced"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Continue,
    /// Unwind with the message as payload.
    Panic(String),
    /// Exit the process with status 1.
    Fatal(String),
}

impl Disposition {
    fn for_level(level: Level, message: &str) -> Self {
        match level {
            Level::Panic => Disposition::Panic(message.to_string()),
            Level::Fatal => Disposition::Fatal(message.to_string()),
            _ => Disposition::Continue,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Disposition::Continue)
    }

    /// Carry out the termination, if any.
    #[track_caller]
    pub fn enforce(self) {
        match self {
            Disposition::Continue => {}
            Disposition::Panic(message) => std::panic::panic_any(message),
            Disposition::Fatal(_) => std::process::exit(1),
        }
    }
}

/// Leveled logging façade over a shared sink pipeline.
///
/// Cloning is cheap; clones and children created with
/// [`with_values`](Logger::with_values) or [`named`](Logger::named) write to
/// the same sinks.
///
/// # Example
///
/// ```
/// use teelog::{kv, Field, Logger, Options};
///
/// let logger = Logger::builder(Options::default())
///     .with_console_writer(std::io::sink())
///     .build()
///     .unwrap();
///
/// logger.info("server started");
/// logger.info_fields("listening", [Field::int("port", 8080)]);
/// logger.warn_kv("slow request", kv!["path", "/api", "ms", 1200]);
///
/// let requests = logger.with_values([Field::string("request_id", "abc-123")]);
/// requests.debug("parsing body");
/// ```
#[derive(Clone)]
pub struct Logger {
    pipeline: Arc<Pipeline>,
    context: Arc<[Field]>,
    name: Option<Arc<str>>,
    caller_skip: usize,
    closer: Option<Arc<dyn Closer>>,
    encoded_filename: Option<PathBuf>,
}

macro_rules! level_methods {
    ($level:expr, $plain:ident, $fields:ident, $fmt:ident, $kv:ident) => {
        #[track_caller]
        pub fn $plain(&self, msg: impl Into<String>) {
            self.emit($level, msg.into(), Vec::new(), Caller::here());
        }

        #[track_caller]
        pub fn $fields(&self, msg: impl Into<String>, fields: impl IntoIterator<Item = Field>) {
            self.emit($level, msg.into(), fields.into_iter().collect(), Caller::here());
        }

        #[track_caller]
        pub fn $fmt(&self, args: fmt::Arguments<'_>) {
            self.emit_fmt($level, args, Caller::here());
        }

        #[track_caller]
        pub fn $kv(&self, msg: impl Into<String>, key_values: impl IntoIterator<Item = FieldValue>) {
            let caller = Caller::here();
            let fields = self.sweeten(key_values, caller);
            self.emit($level, msg.into(), fields, caller);
        }
    };
}

impl Logger {
    /// Build a logger from options.
    ///
    /// # Panics
    ///
    /// Panics if the log file cannot be opened. Use [`Logger::try_new`] to
    /// handle that case.
    pub fn new(options: Options) -> Self {
        match Self::try_new(options) {
            Ok(logger) => logger,
            Err(e) => panic!("failed to build logger: {}", e),
        }
    }

    pub fn try_new(options: Options) -> Result<Self> {
        PipelineBuilder::new(options).build()
    }

    pub fn builder(options: Options) -> PipelineBuilder {
        PipelineBuilder::new(options)
    }

    pub(crate) fn from_parts(
        pipeline: Arc<Pipeline>,
        closer: Option<Arc<dyn Closer>>,
        encoded_filename: Option<PathBuf>,
        caller_skip: usize,
    ) -> Self {
        Self {
            pipeline,
            context: Arc::from(Vec::new()),
            name: None,
            caller_skip,
            closer,
            encoded_filename,
        }
    }

    /// Record `msg` at `level` and report what must happen next.
    ///
    /// Nothing terminates here, even for `Panic` and `Fatal`; the returned
    /// [`Disposition`] says so and [`Disposition::enforce`] acts on it.
    #[track_caller]
    pub fn log(
        &self,
        level: Level,
        msg: impl Into<String>,
        fields: impl IntoIterator<Item = Field>,
    ) -> Disposition {
        self.log_at(level, msg.into(), fields.into_iter().collect(), Caller::here())
    }

    pub(crate) fn log_at(
        &self,
        level: Level,
        message: String,
        fields: Vec<Field>,
        caller: Caller,
    ) -> Disposition {
        let disposition = Disposition::for_level(level, &message);
        if !self.pipeline.enabled(level) {
            return disposition;
        }

        let mut all = Vec::with_capacity(self.context.len() + fields.len());
        all.extend(self.context.iter().cloned());
        all.extend(fields);

        let stack = if level.is_terminal() {
            capture_stack()
        } else {
            None
        };

        let record = Record::new(level, message, caller)
            .with_name(self.name.as_deref().map(str::to_string))
            .with_fields(all)
            .with_stack(stack);
        self.pipeline.append(&record);
        disposition
    }

    #[track_caller]
    fn emit(&self, level: Level, message: String, fields: Vec<Field>, caller: Caller) {
        let disposition = self.log_at(level, message, fields, caller);
        self.finish(disposition);
    }

    #[track_caller]
    fn emit_fmt(&self, level: Level, args: fmt::Arguments<'_>, caller: Caller) {
        if !level.is_terminal() && !self.pipeline.enabled(level) {
            return;
        }
        self.emit(level, fmt::format(args), Vec::new(), caller);
    }

    #[track_caller]
    fn finish(&self, disposition: Disposition) {
        if disposition.is_terminal() {
            let _ = self.pipeline.flush();
        }
        disposition.enforce();
    }

    /// Pair up alternating keys and values. Malformed input is reported at
    /// `Error`, never silently dropped.
    fn sweeten(
        &self,
        key_values: impl IntoIterator<Item = FieldValue>,
        caller: Caller,
    ) -> Vec<Field> {
        let mut iter = key_values.into_iter();
        let mut fields = Vec::new();
        let mut invalid = Vec::new();

        while let Some(key) = iter.next() {
            let Some(value) = iter.next() else {
                let _ = self.log_at(
                    Level::Error,
                    "Ignored key without a value.".to_string(),
                    vec![Field::new("ignored", key)],
                    caller,
                );
                break;
            };
            match key {
                FieldValue::String(key) => fields.push(Field::new(key, value)),
                other => invalid.push(format!("{}={}", other, value)),
            }
        }

        if !invalid.is_empty() {
            let _ = self.log_at(
                Level::Error,
                "Ignored key-value pairs with non-string keys.".to_string(),
                vec![Field::string("invalid", invalid.join(", "))],
                caller,
            );
        }
        fields
    }

    level_methods!(Level::Debug, debug, debug_fields, debug_fmt, debug_kv);
    level_methods!(Level::Info, info, info_fields, info_fmt, info_kv);
    level_methods!(Level::Warn, warn, warn_fields, warn_fmt, warn_kv);
    level_methods!(Level::Error, error, error_fields, error_fmt, error_kv);
    level_methods!(Level::Panic, panic, panic_fields, panic_fmt, panic_kv);
    level_methods!(Level::Fatal, fatal, fatal_fields, fatal_fmt, fatal_kv);

    /// Resolve a raw level, reporting unknown values at `Warn`.
    fn dispatch_level(&self, code: LevelCode, caller: Caller) -> Level {
        match code.level() {
            Some(level) => level,
            None => {
                let _ = self.log_at(
                    Level::Warn,
                    "unknown level".to_string(),
                    vec![Field::string("level", code.to_string())],
                    caller,
                );
                Level::Warn
            }
        }
    }

    #[track_caller]
    pub fn at_level(&self, level: impl Into<LevelCode>, msg: impl Into<String>) {
        let caller = Caller::here();
        let level = self.dispatch_level(level.into(), caller);
        self.emit(level, msg.into(), Vec::new(), caller);
    }

    #[track_caller]
    pub fn at_level_fields(
        &self,
        level: impl Into<LevelCode>,
        msg: impl Into<String>,
        fields: impl IntoIterator<Item = Field>,
    ) {
        let caller = Caller::here();
        let level = self.dispatch_level(level.into(), caller);
        self.emit(level, msg.into(), fields.into_iter().collect(), caller);
    }

    #[track_caller]
    pub fn at_level_fmt(&self, level: impl Into<LevelCode>, args: fmt::Arguments<'_>) {
        let caller = Caller::here();
        let level = self.dispatch_level(level.into(), caller);
        self.emit_fmt(level, args, caller);
    }

    #[track_caller]
    pub fn at_level_kv(
        &self,
        level: impl Into<LevelCode>,
        msg: impl Into<String>,
        key_values: impl IntoIterator<Item = FieldValue>,
    ) {
        let caller = Caller::here();
        let level = self.dispatch_level(level.into(), caller);
        let fields = self.sweeten(key_values, caller);
        self.emit(level, msg.into(), fields, caller);
    }

    /// Log at `Info`.
    #[track_caller]
    pub fn print(&self, msg: impl fmt::Display) {
        self.emit(Level::Info, msg.to_string(), Vec::new(), Caller::here());
    }

    /// Log at `Info`. The record itself supplies the line ending.
    #[track_caller]
    pub fn println(&self, msg: impl fmt::Display) {
        self.print(msg);
    }

    #[track_caller]
    pub fn printf(&self, args: fmt::Arguments<'_>) {
        self.emit_fmt(Level::Info, args, Caller::here());
    }

    /// Whether any sink would write a record at `level`.
    pub fn enabled(&self, level: Level) -> bool {
        self.pipeline.enabled(level)
    }

    /// A child that adds `fields` to every record it writes.
    ///
    /// The child shares this logger's sinks but does not own the log file:
    /// closing it only flushes.
    pub fn with_values(&self, fields: impl IntoIterator<Item = Field>) -> Logger {
        let context: Vec<Field> = self.context.iter().cloned().chain(fields).collect();
        Logger {
            context: Arc::from(context),
            closer: None,
            ..self.clone()
        }
    }

    /// A child whose records carry `name`, dot-joined onto any existing name.
    pub fn named(&self, name: &str) -> Logger {
        let name: Arc<str> = match (&self.name, name.is_empty()) {
            (Some(parent), false) => Arc::from(format!("{}.{}", parent, name)),
            (Some(parent), true) => Arc::clone(parent),
            (None, _) => Arc::from(name),
        };
        Logger {
            name: Some(name),
            closer: None,
            ..self.clone()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fields bound by [`with_values`](Logger::with_values).
    pub fn context(&self) -> &[Field] {
        &self.context
    }

    /// The resolved log file path, when file logging is enabled.
    pub fn encoded_filename(&self) -> Option<&Path> {
        self.encoded_filename.as_deref()
    }

    /// The normalised `caller_skip` option. Informational only; call sites
    /// come from `#[track_caller]`.
    pub fn caller_skip(&self) -> usize {
        self.caller_skip
    }

    /// Persist anything the sinks still hold. Safe to call repeatedly.
    pub fn flush(&self) -> Result<()> {
        self.pipeline.flush()
    }

    /// Flush, then release the log file if this logger owns it.
    ///
    /// The flush result is ignored; the release result is returned.
    pub fn close(&self) -> Result<()> {
        let _ = self.flush();
        match &self.closer {
            Some(closer) => closer.close(),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("sinks", &self.pipeline.appender_names())
            .field("context", &self.context)
            .field("encoded_filename", &self.encoded_filename)
            .field("owns_file", &self.closer.is_some())
            .finish()
    }
}

fn capture_stack() -> Option<String> {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::appender::{Appender, LevelEnabler};
    use crate::core::LoggerError;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Memory {
        records: Mutex<Vec<Record>>,
        flushes: Mutex<usize>,
    }

    struct MemoryAppender {
        memory: Arc<Memory>,
        threshold: Level,
    }

    impl Appender for MemoryAppender {
        fn enabled(&self, level: Level) -> bool {
            self.threshold.enabled(level)
        }

        fn append(&self, record: &Record) -> Result<()> {
            self.memory.records.lock().push(record.clone());
            Ok(())
        }

        fn flush(&self) -> Result<()> {
            *self.memory.flushes.lock() += 1;
            Ok(())
        }

        fn name(&self) -> &str {
            "memory"
        }
    }

    struct CountingCloser(Mutex<usize>);

    impl Closer for CountingCloser {
        fn close(&self) -> Result<()> {
            let mut count = self.0.lock();
            *count += 1;
            if *count > 1 {
                return Err(LoggerError::already_closed("memory"));
            }
            Ok(())
        }
    }

    fn memory_logger(threshold: Level) -> (Logger, Arc<Memory>) {
        let memory = Arc::new(Memory::default());
        let pipeline = Pipeline::new(vec![Box::new(MemoryAppender {
            memory: Arc::clone(&memory),
            threshold,
        })]);
        (Logger::from_parts(Arc::new(pipeline), None, None, 1), memory)
    }

    fn messages(memory: &Memory) -> Vec<(Level, String)> {
        memory
            .records
            .lock()
            .iter()
            .map(|r| (r.level, r.message.clone()))
            .collect()
    }

    #[test]
    fn test_threshold_filters_every_style() {
        let (logger, memory) = memory_logger(Level::Warn);
        logger.info("dropped");
        logger.info_fields("dropped", [Field::int("n", 1)]);
        logger.info_fmt(format_args!("dropped {}", 1));
        logger.info_kv("dropped", vec!["n".into(), 1.into()]);
        logger.warn("kept");
        logger.error_fmt(format_args!("kept {}", 2));

        assert_eq!(
            messages(&memory),
            vec![
                (Level::Warn, "kept".to_string()),
                (Level::Error, "kept 2".to_string()),
            ]
        );
    }

    #[test]
    fn test_caller_is_the_call_site() {
        let (logger, memory) = memory_logger(Level::Debug);
        let line = line!() + 1;
        logger.info("where");
        logger.at_level(Level::Warn, "dispatched");

        let records = memory.records.lock();
        assert!(records[0].caller.file.ends_with("logger.rs"));
        assert_eq!(records[0].caller.line, line);
        assert_eq!(records[1].caller.line, line + 1);
    }

    #[track_caller]
    fn wrapped_info(logger: &Logger, msg: &str) {
        logger.info(msg);
    }

    #[test]
    fn test_caller_skip_does_not_shift_call_site() {
        let memory = Arc::new(Memory::default());
        let pipeline = Pipeline::new(vec![Box::new(MemoryAppender {
            memory: Arc::clone(&memory),
            threshold: Level::Debug,
        })]);
        let logger = Logger::from_parts(Arc::new(pipeline), None, None, 3);
        assert_eq!(logger.caller_skip(), 3);

        let line = line!() + 1;
        logger.info("direct");
        wrapped_info(&logger, "wrapped");

        let records = memory.records.lock();
        assert_eq!(records[0].caller.line, line);
        assert_eq!(records[1].caller.line, line + 1);
    }

    #[test]
    fn test_log_returns_disposition_without_terminating() {
        let (logger, memory) = memory_logger(Level::Debug);
        assert_eq!(logger.log(Level::Error, "bad", []), Disposition::Continue);
        assert_eq!(
            logger.log(Level::Panic, "worse", []),
            Disposition::Panic("worse".to_string())
        );
        assert_eq!(
            logger.log(Level::Fatal, "worst", []),
            Disposition::Fatal("worst".to_string())
        );
        assert_eq!(memory.records.lock().len(), 3);
    }

    #[test]
    fn test_panic_disposition_even_when_filtered() {
        let (logger, memory) = memory_logger(Level::Fatal);
        let disposition = logger.log(Level::Panic, "unseen", []);
        assert!(disposition.is_terminal());
        assert!(memory.records.lock().is_empty());
    }

    #[test]
    fn test_panic_records_flushes_then_unwinds() {
        let (logger, memory) = memory_logger(Level::Debug);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            logger.panic_fields("invariant broken", [Field::string("who", "test")]);
        }));

        let payload = result.unwrap_err();
        assert_eq!(
            payload.downcast_ref::<String>().map(String::as_str),
            Some("invariant broken")
        );
        assert_eq!(messages(&memory), vec![(Level::Panic, "invariant broken".to_string())]);
        assert_eq!(*memory.flushes.lock(), 1);
    }

    #[test]
    fn test_error_does_not_terminate() {
        let (logger, memory) = memory_logger(Level::Debug);
        logger.error("recoverable");
        logger.error_kv("recoverable", vec!["code".into(), 7.into()]);
        assert_eq!(memory.records.lock().len(), 2);
    }

    #[test]
    fn test_unknown_level_code() {
        let (logger, memory) = memory_logger(Level::Debug);
        logger.at_level(LevelCode(42), "original");

        let records = memory.records.lock();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, Level::Warn);
        assert_eq!(records[0].message, "unknown level");
        assert_eq!(records[0].fields, vec![Field::string("level", "Level(42)")]);
        assert_eq!(records[1].level, Level::Warn);
        assert_eq!(records[1].message, "original");
    }

    #[test]
    fn test_at_level_dispatches_known_codes() {
        let (logger, memory) = memory_logger(Level::Debug);
        logger.at_level_fields(Level::Debug, "a", [Field::bool("x", true)]);
        logger.at_level_fmt(2i8, format_args!("b{}", 1));
        logger.at_level_kv(Level::Error, "c", vec!["k".into(), "v".into()]);

        assert_eq!(
            messages(&memory),
            vec![
                (Level::Debug, "a".to_string()),
                (Level::Warn, "b1".to_string()),
                (Level::Error, "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_key_values_are_paired() {
        let (logger, memory) = memory_logger(Level::Debug);
        logger.info_kv("pairs", vec!["user".into(), "alice".into(), "age".into(), 30.into()]);

        let records = memory.records.lock();
        assert_eq!(
            records[0].fields,
            vec![Field::string("user", "alice"), Field::int("age", 30)]
        );
    }

    #[test]
    fn test_non_string_keys_are_reported() {
        let (logger, memory) = memory_logger(Level::Debug);
        logger.info_kv(
            "mixed",
            vec![42.into(), "x".into(), "ok".into(), true.into()],
        );

        let records = memory.records.lock();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, Level::Error);
        assert_eq!(records[0].message, "Ignored key-value pairs with non-string keys.");
        assert_eq!(records[0].fields, vec![Field::string("invalid", "42=x")]);
        assert_eq!(records[1].fields, vec![Field::bool("ok", true)]);
    }

    #[test]
    fn test_dangling_key_is_reported() {
        let (logger, memory) = memory_logger(Level::Debug);
        logger.warn_kv("odd", vec!["a".into(), 1.into(), "lonely".into()]);

        let records = memory.records.lock();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "Ignored key without a value.");
        assert_eq!(records[0].fields, vec![Field::string("ignored", "lonely")]);
        assert_eq!(records[1].fields, vec![Field::int("a", 1)]);
    }

    #[test]
    fn test_with_values_binds_fields_in_order() {
        let (logger, memory) = memory_logger(Level::Debug);
        let child = logger
            .with_values([Field::string("service", "api")])
            .with_values([Field::int("shard", 3)]);
        child.info_fields("hit", [Field::bool("cached", true)]);
        logger.info("parent");

        let records = memory.records.lock();
        assert_eq!(
            records[0].fields,
            vec![
                Field::string("service", "api"),
                Field::int("shard", 3),
                Field::bool("cached", true),
            ]
        );
        assert!(records[1].fields.is_empty());
    }

    #[test]
    fn test_named_joins_with_dots() {
        let (logger, memory) = memory_logger(Level::Debug);
        let child = logger.named("http").named("router");
        assert_eq!(child.name(), Some("http.router"));
        child.info("routed");
        assert_eq!(
            memory.records.lock()[0].logger_name.as_deref(),
            Some("http.router")
        );
    }

    #[test]
    fn test_close_only_releases_owned_file() {
        let memory = Arc::new(Memory::default());
        let closer = Arc::new(CountingCloser(Mutex::new(0)));
        let pipeline = Pipeline::new(vec![Box::new(MemoryAppender {
            memory: Arc::clone(&memory),
            threshold: Level::Debug,
        })]);
        let logger = Logger::from_parts(
            Arc::new(pipeline),
            Some(closer.clone()),
            Some(PathBuf::from("/tmp/app.log")),
            1,
        );

        let child = logger.with_values([Field::int("id", 1)]);
        child.close().unwrap();
        assert_eq!(*closer.0.lock(), 0);
        assert_eq!(*memory.flushes.lock(), 1);
        assert_eq!(child.encoded_filename(), Some(Path::new("/tmp/app.log")));

        logger.close().unwrap();
        assert_eq!(*closer.0.lock(), 1);
        assert!(logger.close().is_err());
    }

    #[test]
    fn test_close_without_file_is_noop() {
        let (logger, _memory) = memory_logger(Level::Debug);
        assert!(logger.close().is_ok());
        assert!(logger.close().is_ok());
        assert!(logger.flush().is_ok());
        assert!(logger.flush().is_ok());
    }

    #[test]
    fn test_print_family_logs_at_info() {
        let (logger, memory) = memory_logger(Level::Debug);
        logger.print("one");
        logger.println(2);
        logger.printf(format_args!("{}-{}", 3, 4));
        assert_eq!(
            messages(&memory),
            vec![
                (Level::Info, "one".to_string()),
                (Level::Info, "2".to_string()),
                (Level::Info, "3-4".to_string()),
            ]
        );
    }
}
