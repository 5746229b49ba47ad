//! Plain append-only log file

use crate::core::appender::{Closer, WriteSyncer};
use crate::core::error::{LoggerError, Result};
use parking_lot::RwLock;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A log file opened for synchronous appends.
///
/// Writes share the handle; closing takes it away for good. Writing or
/// closing after close fails with [`LoggerError::AlreadyClosed`].
pub struct SyncFile {
    path: PathBuf,
    file: RwLock<Option<File>>,
}

impl SyncFile {
    /// Open `path` for appending, creating the file and its directory.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or the file cannot be created
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_SYNC);
        }

        let file = options.open(&path).map_err(|e| {
            LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
        })?;

        Ok(Self {
            path,
            file: RwLock::new(Some(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.file.read().is_none()
    }

    fn closed_error(&self) -> LoggerError {
        LoggerError::already_closed(self.path.display().to_string())
    }
}

impl WriteSyncer for SyncFile {
    fn write_all(&self, buf: &[u8]) -> Result<()> {
        let guard = self.file.read();
        let mut file: &File = guard.as_ref().ok_or_else(|| self.closed_error())?;
        file.write_all(buf).map_err(|e| {
            LoggerError::file_appender(
                self.path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })
    }

    fn sync(&self) -> Result<()> {
        let guard = self.file.read();
        let file = guard.as_ref().ok_or_else(|| self.closed_error())?;
        file.sync_all().map_err(|e| {
            LoggerError::file_appender(
                self.path.display().to_string(),
                format!("Failed to flush: {}", e),
            )
        })
    }
}

impl Closer for SyncFile {
    fn close(&self) -> Result<()> {
        match self.file.write().take() {
            Some(file) => {
                file.sync_all().map_err(|e| {
                    LoggerError::file_appender(
                        self.path.display().to_string(),
                        format!("Failed to flush on close: {}", e),
                    )
                })?;
                Ok(())
            }
            None => Err(self.closed_error()),
        }
    }
}
