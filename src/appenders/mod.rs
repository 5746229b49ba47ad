//! Byte sinks behind the built-in appenders

pub mod console;
pub mod file;
pub mod rotating_file;

pub use console::LockedWriter;
pub use file::SyncFile;
pub use rotating_file::{RotatingFileWriter, RotationPolicy};

pub use crate::core::{Closer, WriteSyncer};
