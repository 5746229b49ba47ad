//! Size-bounded log file with timestamped backups
//!
//! The active file always lives at the configured path. When a write would
//! push it past the size limit, the file is renamed to
//! `<stem>-<YYYY-MM-DDTHH-MM-SS.mmm><ext>` (UTC) and a fresh file takes its
//! place. After every rotation old backups are pruned by count and age, and
//! optionally gzip-compressed.

use crate::core::appender::{Closer, WriteSyncer};
use crate::core::error::{LoggerError, Result};
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const MEGABYTE: u64 = 1024 * 1024;
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const COMPRESS_SUFFIX: &str = ".gz";

/// Limits applied by [`RotatingFileWriter`]. Zero disables a limit.
///
/// # Examples
///
/// ```
/// use teelog::appenders::RotationPolicy;
///
/// // 50 MB files, a week of history, at most 10 gzip'd backups
/// let policy = RotationPolicy::new()
///     .with_max_size(50)
///     .with_max_age(7)
///     .with_max_backups(10)
///     .with_compression(true);
/// assert_eq!(policy.max_bytes(), Some(50 * 1024 * 1024));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Megabytes before the active file is rotated.
    pub max_size: u64,
    /// Days a backup is kept.
    pub max_age: u64,
    /// Number of backups kept.
    pub max_backups: usize,
    /// Gzip backups after rotation.
    pub compress: bool,
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, megabytes: u64) -> Self {
        self.max_size = megabytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, days: u64) -> Self {
        self.max_age = days;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// Size limit in bytes, `None` when unbounded.
    #[must_use]
    pub fn max_bytes(&self) -> Option<u64> {
        (self.max_size > 0).then(|| self.max_size.saturating_mul(MEGABYTE))
    }

    /// Oldest backup time still kept at `now`. `None` when unbounded,
    /// including ages too large to subtract from `now`.
    #[must_use]
    pub fn age_cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.max_age == 0 {
            return None;
        }
        let age = TimeDelta::try_days(i64::try_from(self.max_age).ok()?)?;
        now.checked_sub_signed(age)
    }
}

struct ActiveFile {
    file: Option<File>,
    size: u64,
}

/// Rotating log file writer, safe to share between threads.
///
/// Writing after [`Closer::close`] reopens the file.
///
/// # Examples
///
/// ```no_run
/// use teelog::appenders::{RotatingFileWriter, RotationPolicy};
///
/// let writer = RotatingFileWriter::new(
///     "/var/log/app/app.log",
///     RotationPolicy::new().with_max_size(100).with_max_backups(3),
/// ).unwrap();
/// ```
pub struct RotatingFileWriter {
    path: PathBuf,
    policy: RotationPolicy,
    max_bytes: Option<u64>,
    active: Mutex<ActiveFile>,
}

impl RotatingFileWriter {
    /// Open (or create) the active file, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created or opened
    pub fn new<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let writer = Self {
            max_bytes: policy.max_bytes(),
            path,
            policy,
            active: Mutex::new(ActiveFile { file: None, size: 0 }),
        };

        {
            let mut active = writer.active.lock();
            writer.open_existing_or_new(&mut active, 0)?;
        }
        Ok(writer)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Bytes in the active file.
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.active.lock().size
    }

    /// Force a rotation regardless of size.
    pub fn rotate(&self) -> Result<()> {
        let mut active = self.active.lock();
        self.rotate_locked(&mut active)
    }

    /// Backups of the active file, newest first.
    pub fn backup_files(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .list_backups()?
            .into_iter()
            .map(|backup| backup.path)
            .collect())
    }

    fn write_locked(&self, active: &mut ActiveFile, buf: &[u8]) -> Result<()> {
        let len = buf.len() as u64;
        if let Some(max) = self.max_bytes {
            if len > max {
                return Err(LoggerError::file_appender(
                    self.path.display().to_string(),
                    format!("write length {} exceeds maximum file size {}", len, max),
                ));
            }
        }

        if active.file.is_none() {
            self.open_existing_or_new(active, len)?;
        }
        if let Some(max) = self.max_bytes {
            if active.size + len > max {
                self.rotate_locked(active)?;
            }
        }

        let file = active
            .file
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;
        file.write_all(buf).map_err(|e| {
            LoggerError::file_appender(
                self.path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        active.size += len;
        Ok(())
    }

    /// Append to the existing file unless `incoming` bytes would overflow it.
    fn open_existing_or_new(&self, active: &mut ActiveFile, incoming: u64) -> Result<()> {
        let existing = match fs::metadata(&self.path) {
            Ok(metadata) => Some(metadata.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(LoggerError::file_appender(
                    self.path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                ))
            }
        };

        match (existing, self.max_bytes) {
            (Some(size), Some(max)) if incoming > 0 && size + incoming >= max => {
                self.rotate_locked(active)
            }
            (Some(size), _) => {
                active.file = Some(self.open(false)?);
                active.size = size;
                Ok(())
            }
            (None, _) => self.open_new(active),
        }
    }

    fn open(&self, truncate: bool) -> Result<File> {
        let mut options = OpenOptions::new();
        options.create(true);
        if truncate {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }
        options.open(&self.path).map_err(|e| {
            LoggerError::file_appender(
                self.path.display().to_string(),
                format!("Failed to open: {}", e),
            )
        })
    }

    fn open_new(&self, active: &mut ActiveFile) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        if self.path.exists() {
            let backup = self.next_backup_path(Utc::now());
            fs::rename(&self.path, &backup).map_err(|e| {
                LoggerError::file_rotation(
                    self.path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;
        }

        active.file = Some(self.open(true)?);
        active.size = 0;
        Ok(())
    }

    fn rotate_locked(&self, active: &mut ActiveFile) -> Result<()> {
        // Releasing the handle before the rename keeps this portable.
        active.file = None;
        self.open_new(active)?;
        self.mill();
        Ok(())
    }

    /// A backup name for `at`, nudged forward until it is unused.
    fn next_backup_path(&self, mut at: DateTime<Utc>) -> PathBuf {
        loop {
            let candidate = self.backup_path(&at);
            let compressed = append_suffix(&candidate, COMPRESS_SUFFIX);
            if !candidate.exists() && !compressed.exists() {
                return candidate;
            }
            at += chrono::Duration::milliseconds(1);
        }
    }

    fn backup_path(&self, at: &DateTime<Utc>) -> PathBuf {
        let (stem, ext) = self.stem_and_ext();
        self.path.with_file_name(format!(
            "{}-{}{}",
            stem,
            at.format(BACKUP_TIME_FORMAT),
            ext
        ))
    }

    fn stem_and_ext(&self) -> (String, String) {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "app".to_string());
        let ext = self
            .path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        (stem, ext)
    }

    fn list_backups(&self) -> Result<Vec<Backup>> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::from("."),
        };
        let (stem, ext) = self.stem_and_ext();
        let prefix = format!("{}-", stem);

        let entries = fs::read_dir(&dir).map_err(|e| {
            LoggerError::io_operation(
                "list log backups",
                format!("Failed to read directory '{}'", dir.display()),
                e,
            )
        })?;

        let mut backups = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(rest) = name.strip_prefix(&prefix) else {
                continue;
            };
            let (stamp, compressed) = if let Some(s) = rest
                .strip_suffix(COMPRESS_SUFFIX)
                .and_then(|r| r.strip_suffix(ext.as_str()))
            {
                (s, true)
            } else if let Some(s) = rest.strip_suffix(ext.as_str()) {
                (s, false)
            } else {
                continue;
            };
            if let Ok(time) = NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT) {
                backups.push(Backup {
                    path: entry.path(),
                    time: time.and_utc(),
                    compressed,
                });
            }
        }

        backups.sort_by(|a, b| b.time.cmp(&a.time));
        Ok(backups)
    }

    /// Prune and compress backups. Failures are reported, never returned.
    fn mill(&self) {
        let backups = match self.list_backups() {
            Ok(backups) => backups,
            Err(e) => {
                eprintln!("[WARN] Failed to list log backups: {}", e);
                return;
            }
        };

        let mut keep = Vec::with_capacity(backups.len());
        let mut remove = Vec::new();

        for (idx, backup) in backups.into_iter().enumerate() {
            if self.policy.max_backups > 0 && idx >= self.policy.max_backups {
                remove.push(backup);
            } else {
                keep.push(backup);
            }
        }

        if let Some(cutoff) = self.policy.age_cutoff(Utc::now()) {
            let (young, old): (Vec<_>, Vec<_>) =
                keep.into_iter().partition(|backup| backup.time >= cutoff);
            keep = young;
            remove.extend(old);
        }

        for backup in &remove {
            if let Err(e) = fs::remove_file(&backup.path) {
                eprintln!(
                    "[WARN] Failed to remove old backup {}: {}",
                    backup.path.display(),
                    e
                );
            }
        }

        if self.policy.compress {
            for backup in keep.iter().filter(|b| !b.compressed) {
                if let Err(e) = compress_file(&backup.path) {
                    eprintln!("[WARN] {}", e);
                }
            }
        }
    }
}

struct Backup {
    path: PathBuf,
    time: DateTime<Utc>,
    compressed: bool,
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Gzip `path` into `path.gz`, removing the original only on success.
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, BufWriter};

    let gz_path = append_suffix(path, COMPRESS_SUFFIX);
    let temp_gz_path = append_suffix(&gz_path, ".tmp");

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp_gz_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!(
                "Failed to create temporary compressed file: {}",
                temp_gz_path.display()
            ),
            e,
        )
    })?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    let streamed = std::io::copy(&mut reader, &mut encoder)
        .and_then(|_| encoder.finish())
        .and_then(|mut inner| inner.flush());
    if let Err(e) = streamed {
        let _ = fs::remove_file(&temp_gz_path);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[WARN] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

impl WriteSyncer for RotatingFileWriter {
    fn write_all(&self, buf: &[u8]) -> Result<()> {
        let mut active = self.active.lock();
        self.write_locked(&mut active, buf)
    }

    fn sync(&self) -> Result<()> {
        let active = self.active.lock();
        if let Some(file) = active.file.as_ref() {
            file.sync_all().map_err(|e| {
                LoggerError::file_appender(
                    self.path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}

impl Closer for RotatingFileWriter {
    fn close(&self) -> Result<()> {
        self.active.lock().file = None;
        Ok(())
    }
}
