//! Size-based file rotation
//!
//! [`SizeRotatingWriter`] appends to one file and retires it once the next
//! write would push it past the size threshold. Retired files are renamed
//! with the rotation time, `app-2025-11-17T10-30-45.123.log`. Gzipping and
//! pruning retired files by count and age happen on a background thread, so
//! a write that triggers rotation only pays for the rename and the reopen.

use super::worker::MaintenanceWorker;
use crate::core::error::{LoggerError, Result};
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const MEGABYTE: u64 = 1024 * 1024;

/// Size used when the policy leaves the threshold at zero
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const COMPRESSED_SUFFIX: &str = ".gz";

/// Configuration for size-based rotation
///
/// # Examples
///
/// ```
/// use rust_structured_logger::handlers::SizeRotationPolicy;
///
/// // 50 MB files, keep 7 compressed backups for at most 30 days
/// let policy = SizeRotationPolicy::new()
///     .with_max_size_mb(50)
///     .with_max_backups(7)
///     .with_max_age_days(30)
///     .with_compression(true);
/// assert_eq!(policy.max_size_bytes, 50 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeRotationPolicy {
    /// Rotation threshold in bytes
    pub max_size_bytes: u64,
    /// Retired files to keep, 0 keeps all
    pub max_backups: usize,
    /// Days to keep retired files, 0 keeps them forever
    pub max_age_days: u32,
    /// Gzip retired files
    pub compress: bool,
    /// Name backups with local time instead of UTC
    pub local_time: bool,
}

impl Default for SizeRotationPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_MB * MEGABYTE,
            max_backups: 0,
            max_age_days: 0,
            compress: false,
            local_time: true,
        }
    }
}

impl SizeRotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the threshold in megabytes; 0 selects the default
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size_mb(mut self, mb: u64) -> Self {
        let mb = if mb == 0 { DEFAULT_MAX_SIZE_MB } else { mb };
        self.max_size_bytes = mb.saturating_mul(MEGABYTE);
        self
    }

    /// Set the threshold in bytes
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_bytes(mut self, bytes: u64) -> Self {
        self.max_size_bytes = bytes.max(1);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age_days(mut self, days: u32) -> Self {
        self.max_age_days = days;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_local_time(mut self, local: bool) -> Self {
        self.local_time = local;
        self
    }
}

/// Retired file found next to the active one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    pub path: PathBuf,
    /// Rotation time encoded in the name
    pub rotated_at: NaiveDateTime,
    pub compressed: bool,
}

/// Appending file writer with size-based rotation
///
/// Not synchronized; owners wrap it in a lock. [`close`](Self::close) waits
/// for outstanding compression and pruning.
///
/// # Examples
///
/// ```no_run
/// use rust_structured_logger::handlers::{SizeRotatingWriter, SizeRotationPolicy};
///
/// let mut writer = SizeRotatingWriter::new(
///     "/var/log/app.log",
///     SizeRotationPolicy::new().with_max_size_mb(10).with_max_backups(3),
/// ).unwrap();
/// writer.write(b"hello\n").unwrap();
/// writer.close().unwrap();
/// ```
#[derive(Debug)]
pub struct SizeRotatingWriter {
    path: PathBuf,
    policy: SizeRotationPolicy,
    file: Option<File>,
    current_size: u64,
    last_rotation: Option<NaiveDateTime>,
    mill: Option<MaintenanceWorker>,
}

impl SizeRotatingWriter {
    /// Open (or create) `path` for appending
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created
    pub fn new<P: AsRef<Path>>(path: P, policy: SizeRotationPolicy) -> Result<Self> {
        let mut writer = Self {
            path: path.as_ref().to_path_buf(),
            policy,
            file: None,
            current_size: 0,
            last_rotation: None,
            mill: None,
        };
        writer.open_existing_or_new()?;
        Ok(writer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> &SizeRotationPolicy {
        &self.policy
    }

    /// Bytes in the active file
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Write `buf` whole, rotating first if it would overflow the active file
    ///
    /// A record larger than the threshold still goes into a fresh file.
    /// Writing after [`close`](Self::close) reopens the file.
    pub fn write(&mut self, buf: &[u8]) -> Result<()> {
        if self.file.is_none() {
            self.open_existing_or_new()?;
        }

        let len = buf.len() as u64;
        if self.current_size > 0 && self.current_size.saturating_add(len) > self.policy.max_size_bytes
        {
            self.rotate()?;
        }

        let file = self.file.as_mut().ok_or_else(|| {
            LoggerError::file_handler(self.path.display().to_string(), "file is not open")
        })?;
        file.write_all(buf).map_err(|e| {
            LoggerError::io_operation(
                "write log file",
                format!("Failed to write to '{}'", self.path.display()),
                e,
            )
        })?;
        self.current_size += len;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        if let Some(ref mut file) = self.file {
            file.flush()?;
        }
        Ok(())
    }

    /// Sync and release the active file, then finish backup maintenance
    pub fn close(&mut self) -> Result<()> {
        if let Some(mill) = self.mill.take() {
            mill.shutdown();
        }
        if let Some(file) = self.file.take() {
            file.sync_all().map_err(|e| {
                LoggerError::io_operation(
                    "close log file",
                    format!("Failed to sync '{}'", self.path.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Retire the active file and start a new one
    pub fn rotate(&mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            if let Err(e) = file.sync_all() {
                eprintln!(
                    "[LOGGER WARN] Failed to sync {} before rotation: {}",
                    self.path.display(),
                    e
                );
            }
        }

        let (backup, rotated_at) = self.next_backup_path();
        self.last_rotation = Some(rotated_at);
        if self.path.exists() {
            fs::rename(&self.path, &backup).map_err(|e| {
                LoggerError::file_rotation(
                    self.path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;
        }

        self.open_new()?;
        self.request_maintenance();
        Ok(())
    }

    /// Completed compression and pruning passes
    pub fn maintenance_passes(&self) -> usize {
        self.mill.as_ref().map_or(0, MaintenanceWorker::passes_completed)
    }

    fn needs_maintenance(&self) -> bool {
        self.policy.compress || self.policy.max_backups > 0 || self.policy.max_age_days > 0
    }

    /// Hand compression and pruning to the backup thread, starting it on
    /// first use
    fn request_maintenance(&mut self) {
        if !self.needs_maintenance() {
            return;
        }
        if self.mill.is_none() {
            let path = self.path.clone();
            let policy = self.policy.clone();
            match MaintenanceWorker::spawn("log-backup-mill", None, move || {
                mill_backups(&path, &policy)
            }) {
                Ok(mill) => self.mill = Some(mill),
                Err(e) => {
                    eprintln!("[LOGGER WARN] {}; maintaining backups inline", e);
                    mill_backups(&self.path, &self.policy);
                    return;
                }
            }
        }
        if let Some(ref mill) = self.mill {
            mill.trigger();
        }
    }

    /// Retired files, newest first
    pub fn backups(&self) -> Result<Vec<Backup>> {
        list_backups(&self.path)
    }

    /// Backup name stamps strictly increase, even for rotations within the
    /// same millisecond
    fn next_backup_path(&self) -> (PathBuf, NaiveDateTime) {
        let dir = directory_of(&self.path);
        let (stem, ext) = name_parts(&self.path);
        let ext = ext.unwrap_or_default();

        let mut at = backup_clock(self.policy.local_time);
        if let Some(last) = self.last_rotation {
            let floor = last + ChronoDuration::milliseconds(1);
            if at < floor {
                at = floor;
            }
        }
        loop {
            let name = format!("{}-{}{}", stem, at.format(BACKUP_TIME_FORMAT), ext);
            let candidate = dir.join(&name);
            let compressed = dir.join(format!("{}{}", name, COMPRESSED_SUFFIX));
            if !candidate.exists() && !compressed.exists() {
                return (candidate, at);
            }
            at += ChronoDuration::milliseconds(1);
        }
    }

    fn open_existing_or_new(&mut self) -> Result<()> {
        let dir = directory_of(&self.path);
        fs::create_dir_all(&dir).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", dir.display()),
                e,
            )
        })?;

        let file = self.open_append()?;
        self.current_size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_handler(
                    self.path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();
        self.file = Some(file);
        Ok(())
    }

    fn open_new(&mut self) -> Result<()> {
        let file = self.open_append().map_err(|e| {
            LoggerError::file_rotation(
                self.path.display().to_string(),
                format!("Failed to create new log file: {}", e),
            )
        })?;
        self.file = Some(file);
        self.current_size = 0;
        Ok(())
    }

    fn open_append(&self) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                LoggerError::file_handler(
                    self.path.display().to_string(),
                    format!("Failed to open: {}", e),
                )
            })
    }
}

impl Drop for SizeRotatingWriter {
    fn drop(&mut self) {
        if let Some(ref mut file) = self.file {
            let _ = file.flush();
        }
    }
}

fn directory_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// File stem and `.ext` suffix of the active file
fn name_parts(path: &Path) -> (String, Option<String>) {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("app")
        .to_string();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e));
    (stem, ext)
}

fn backup_clock(local_time: bool) -> NaiveDateTime {
    if local_time {
        Local::now().naive_local()
    } else {
        Utc::now().naive_utc()
    }
}

/// Retired files of the log at `path`, newest first
fn list_backups(path: &Path) -> Result<Vec<Backup>> {
    let dir = directory_of(path);
    let (stem, ext) = name_parts(path);
    let prefix = format!("{}-", stem);

    let mut backups = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let (name, compressed) = match name.strip_suffix(COMPRESSED_SUFFIX) {
            Some(inner) => (inner, true),
            None => (name, false),
        };
        let Some(rest) = name.strip_prefix(prefix.as_str()) else {
            continue;
        };
        let stamp = match ext {
            Some(ref ext) => match rest.strip_suffix(ext.as_str()) {
                Some(s) => s,
                None => continue,
            },
            None => rest,
        };
        if let Ok(rotated_at) = NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT) {
            backups.push(Backup {
                path: entry.path(),
                rotated_at,
                compressed,
            });
        }
    }

    backups.sort_by(|a, b| b.rotated_at.cmp(&a.rotated_at));
    Ok(backups)
}

/// One maintenance pass: drop backups over the count or age limit and
/// gzip the survivors
///
/// An age limit reaching past the earliest representable time expires
/// nothing.
fn mill_backups(path: &Path, policy: &SizeRotationPolicy) {
    let backups = match list_backups(path) {
        Ok(backups) => backups,
        Err(e) => {
            eprintln!(
                "[LOGGER WARN] Failed to list backups of {}: {}",
                path.display(),
                e
            );
            return;
        }
    };

    let cutoff = if policy.max_age_days > 0 {
        backup_clock(policy.local_time)
            .checked_sub_signed(ChronoDuration::days(i64::from(policy.max_age_days)))
    } else {
        None
    };

    for (index, backup) in backups.iter().enumerate() {
        let over_count = policy.max_backups > 0 && index >= policy.max_backups;
        let too_old = cutoff.is_some_and(|cutoff| backup.rotated_at < cutoff);
        if over_count || too_old {
            if let Err(e) = fs::remove_file(&backup.path) {
                eprintln!(
                    "[LOGGER WARN] Failed to remove old backup {}: {}",
                    backup.path.display(),
                    e
                );
            }
            continue;
        }

        // A failed compression keeps the plain backup
        if policy.compress && !backup.compressed {
            if let Err(e) = compress_file(&backup.path) {
                eprintln!("[LOGGER WARN] {}", e);
            }
        }
    }
}

/// Gzip `path` into `path.gz` using streaming I/O
///
/// The original is removed only after the compressed file is complete.
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, BufWriter, Read};

    let mut gz_name = path.as_os_str().to_owned();
    gz_name.push(COMPRESSED_SUFFIX);
    let gz_path = PathBuf::from(gz_name);
    let mut temp_name = gz_path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_gz_path = PathBuf::from(temp_name);

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

    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to read from file: {}", path.display()),
                e,
            )
        })?;
        if bytes_read == 0 {
            break;
        }
        encoder.write_all(&buffer[..bytes_read]).map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation("compress log file", "Failed to compress data chunk", e)
        })?;
    }

    encoder
        .finish()
        .and_then(|mut inner| inner.flush())
        .map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation("compress log file", "Failed to finish compression", e)
        })?;

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
            "[LOGGER WARN] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }

    Ok(())
}
