//! Turns [`Options`] into a running [`Logger`]

use super::appender::{Appender, Closer, WriteSyncer, WriterAppender};
use super::encoder::{
    CallerEncoder, CapitalColorLevelEncoder, CapitalLevelEncoder, DefaultFilenameEncoder,
    EncoderConfig, FilenameEncoder, LevelEncoder, ShortCallerEncoder, TimeEncoder,
};
use super::error::{LoggerError, Result};
use super::field::Field;
use super::level::Level;
use super::logger::Logger;
use super::options::{resolve_level, Options};
use super::output_format::OutputFormat;
use super::pipeline::Pipeline;
use super::record::Caller;
use super::timestamp::TimestampFormat;
use crate::appenders::{LockedWriter, RotatingFileWriter, SyncFile};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Builds the console and file sinks described by [`Options`].
///
/// # Example
///
/// ```
/// use teelog::{Level, Options, PipelineBuilder};
///
/// let logger = PipelineBuilder::new(Options::default().with_console_level("debug"))
///     .with_console_writer(std::io::sink())
///     .build()
///     .unwrap();
///
/// assert!(logger.enabled(Level::Debug));
/// logger.info("ready");
/// ```
pub struct PipelineBuilder {
    options: Options,
    console_writer: Option<Arc<dyn WriteSyncer>>,
    extra: Vec<Box<dyn Appender>>,
}

/// A file sink plus the handle that releases it.
struct FileSink {
    writer: Arc<dyn WriteSyncer>,
    closer: Arc<dyn Closer>,
    path: PathBuf,
}

impl PipelineBuilder {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            console_writer: None,
            extra: Vec::new(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_filename_encoder(mut self, encoder: impl FilenameEncoder + 'static) -> Self {
        self.options.encoders.filename = Some(Arc::new(encoder));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_time_encoder(mut self, encoder: impl TimeEncoder + 'static) -> Self {
        self.options.encoders.time = Some(Arc::new(encoder));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_level_encoder(mut self, encoder: impl LevelEncoder + 'static) -> Self {
        self.options.encoders.level = Some(Arc::new(encoder));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_caller_encoder(mut self, encoder: impl CallerEncoder + 'static) -> Self {
        self.options.encoders.caller = Some(Arc::new(encoder));
        self
    }

    /// Send console output somewhere other than stdout.
    #[must_use = "builder methods return a new value"]
    pub fn with_console_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.console_writer = Some(Arc::new(LockedWriter::new(writer)));
        self
    }

    /// Add a sink next to the configured console and file sinks.
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.extra.push(Box::new(appender));
        self
    }

    /// Build the logger.
    ///
    /// Options are not validated here. Unparseable level names fall back to
    /// `Info` and are reported through the new logger at `Warn`.
    ///
    /// # Errors
    ///
    /// Returns error if the log file or its directory cannot be created
    pub fn build(mut self) -> Result<Logger> {
        let base = self.base_encoder_config();
        let mut appenders: Vec<Box<dyn Appender>> = Vec::new();
        let mut fallbacks: Vec<(&'static str, LoggerError)> = Vec::new();

        if !self.options.disable_console {
            let (level, err) = resolve_level(&self.options.console_level);
            if let Some(err) = err {
                fallbacks.push(("console", err));
            }
            let writer = self
                .console_writer
                .take()
                .unwrap_or_else(|| Arc::new(LockedWriter::stdout()));
            appenders.push(Box::new(WriterAppender::new(
                "console",
                OutputFormat::Console,
                self.console_encoder_config(&base),
                writer,
                level,
            )));
        }

        let mut file_sink = None;
        if !self.options.disable_file {
            let (level, err) = resolve_level(&self.options.file_level);
            if let Some(err) = err {
                fallbacks.push(("file", err));
            }
            let format = if self.options.disable_file_json {
                OutputFormat::Console
            } else {
                OutputFormat::Json
            };
            let sink = self.open_file_sink()?;
            appenders.push(Box::new(WriterAppender::new(
                "file",
                format,
                self.file_encoder_config(&base),
                Arc::clone(&sink.writer),
                level,
            )));
            file_sink = Some(sink);
        }

        appenders.append(&mut self.extra);

        let (closer, path) = match file_sink {
            Some(sink) => (Some(sink.closer), Some(sink.path)),
            None => (None, None),
        };
        let logger = Logger::from_parts(
            Arc::new(Pipeline::new(appenders)),
            closer,
            path,
            self.options.effective_caller_skip(),
        );

        for (sink, err) in fallbacks {
            let _ = logger.log_at(
                Level::Warn,
                format!("invalid {} level, falling back to INFO", sink),
                vec![Field::string("error", err.to_string())],
                Caller::here(),
            );
        }

        Ok(logger)
    }

    /// Keys and strategies shared by every sink before per-sink toggles.
    fn base_encoder_config(&self) -> EncoderConfig {
        let encoders = &self.options.encoders;
        EncoderConfig {
            level_key: None,
            time_key: None,
            caller_key: None,
            time_encoder: encoders
                .time
                .clone()
                .unwrap_or_else(|| Arc::new(TimestampFormat::Standard)),
            level_encoder: encoders
                .level
                .clone()
                .unwrap_or_else(|| Arc::new(CapitalLevelEncoder)),
            caller_encoder: encoders
                .caller
                .clone()
                .unwrap_or_else(|| Arc::new(ShortCallerEncoder)),
            ..EncoderConfig::default()
        }
    }

    fn console_encoder_config(&self, base: &EncoderConfig) -> EncoderConfig {
        let opts = &self.options;
        let mut config = base.clone();
        if !opts.disable_console_level {
            config.level_key = Some("level".to_string());
        }
        if !opts.disable_console_time {
            config.time_key = Some("time".to_string());
        }
        if !opts.disable_console_caller {
            config.caller_key = Some("caller".to_string());
        }
        if !opts.disable_console_color && opts.encoders.level.is_none() {
            config.level_encoder = Arc::new(CapitalColorLevelEncoder);
        }
        config
    }

    fn file_encoder_config(&self, base: &EncoderConfig) -> EncoderConfig {
        let opts = &self.options;
        let mut config = base.clone();
        // File records always carry their level.
        config.level_key = Some("level".to_string());
        if !opts.disable_file_time {
            config.time_key = Some("time".to_string());
        }
        if !opts.disable_file_caller {
            config.caller_key = Some("caller".to_string());
        }
        config
    }

    fn open_file_sink(&mut self) -> Result<FileSink> {
        let encoder = self
            .options
            .encoders
            .filename
            .get_or_insert_with(|| Arc::new(DefaultFilenameEncoder))
            .clone();
        let path = absolute(&Path::new(&self.options.output).join(encoder.encode()));

        if self.options.disable_rotate {
            let file = Arc::new(SyncFile::open(&path)?);
            Ok(FileSink {
                writer: file.clone(),
                closer: file,
                path,
            })
        } else {
            let file = Arc::new(RotatingFileWriter::new(
                &path,
                self.options.rotation_policy(),
            )?);
            Ok(FileSink {
                writer: file.clone(),
                closer: file,
                path,
            })
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
