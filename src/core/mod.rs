//! Core logger types and traits

pub mod appender;
pub mod builder;
pub mod encoder;
pub mod error;
pub mod error_list;
pub mod field;
pub mod level;
pub mod logger;
pub mod options;
pub mod output_format;
pub mod pipeline;
pub mod record;
pub mod timestamp;

pub use appender::{Appender, Closer, LevelEnabler, WriteSyncer, WriterAppender};
pub use builder::PipelineBuilder;
pub use encoder::{
    CallerEncoder, CapitalColorLevelEncoder, CapitalLevelEncoder, DefaultFilenameEncoder,
    EncoderConfig, FilenameEncoder, FullCallerEncoder, LevelEncoder, LowercaseColorLevelEncoder,
    LowercaseLevelEncoder, ShortCallerEncoder, TimeEncoder,
};
pub use error::{LoggerError, Result};
pub use error_list::ErrorList;
pub use field::{Field, FieldValue};
pub use level::{Level, LevelCode};
pub use logger::{Disposition, Logger};
pub use options::{Encoders, Options, DEFAULT_CALLER_SKIP};
pub use output_format::OutputFormat;
pub use pipeline::Pipeline;
pub use record::{Caller, Record};
pub use timestamp::TimestampFormat;
