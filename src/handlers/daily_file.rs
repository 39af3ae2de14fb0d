//! Date-rotated file handler
//!
//! Writes to `{base_dir}/{prefix}-{YYYY-MM-DD}.log` (or `{YYYY-MM-DD}.log`
//! without a prefix) and switches files the first time it writes on a new
//! local calendar day. The date check, the file swap, formatting and the
//! write all happen under one lock.
//!
//! With a retention period set, every file switch also asks a
//! [`RetentionJob`] to delete `.log` files that have expired.

use super::retention::{cleanup_expired, CleanupReport, RetentionJob, DEFAULT_SWEEP_INTERVAL};
use crate::core::{
    clock::{Clock, SystemClock},
    error::{LoggerError, Result},
    field::Field,
    formatter::{Formatter, TextFormatter},
    handler::Handler,
    log_entry::LogEntry,
    log_level::LogLevel,
};
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const DATE_FORMAT: &str = "%Y-%m-%d";

enum FileState {
    /// No file open; the next write opens today's file
    Closed,
    Open {
        date: NaiveDate,
        file: File,
        path: PathBuf,
    },
    /// Closed by the owner; writes are rejected
    Shutdown,
}

/// Builder for [`DailyFileHandler`]
///
/// ```
/// use rust_structured_logger::handlers::DailyFileHandler;
/// use rust_structured_logger::prelude::*;
///
/// let dir = tempfile::tempdir().unwrap();
/// let handler = DailyFileHandler::builder(dir.path())
///     .prefix("myservice")
///     .level(LogLevel::Debug)
///     .retention_days(7)
///     .build()
///     .unwrap();
///
/// let logger = Logger::from_handler(handler);
/// logger.info().str("phase", "startup").msg("ready");
/// logger.close().unwrap();
/// ```
pub struct DailyFileHandlerBuilder {
    base_dir: PathBuf,
    prefix: Option<String>,
    level: LogLevel,
    retention_days: u32,
    formatter: Option<Box<dyn Formatter>>,
    clock: Arc<dyn Clock>,
    sweep_interval: Duration,
}

impl DailyFileHandlerBuilder {
    fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            prefix: None,
            level: LogLevel::Info,
            retention_days: 0,
            formatter: None,
            clock: Arc::new(SystemClock),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    /// File name prefix; empty means none
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = (!prefix.is_empty()).then_some(prefix);
        self
    }

    #[must_use]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Days to keep `.log` files in the directory; 0 disables cleanup
    #[must_use]
    pub fn retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    /// Line formatter, plain text by default
    #[must_use]
    pub fn formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Source of the current date, the system clock by default
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Interval of the periodic cleanup pass
    #[must_use]
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Create the directory, open today's file and start the retention job
    ///
    /// # Errors
    ///
    /// Returns error if the prefix names a path rather than a file name, or
    /// if the directory or file cannot be created
    pub fn build(self) -> Result<DailyFileHandler> {
        if let Some(ref prefix) = self.prefix {
            if prefix.contains(['/', '\\']) {
                return Err(LoggerError::config(
                    "DailyFileHandler",
                    format!("prefix '{}' must not contain a path separator", prefix),
                ));
            }
        }

        fs::create_dir_all(&self.base_dir).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", self.base_dir.display()),
                e,
            )
        })?;

        let retention = if self.retention_days > 0 {
            Some(RetentionJob::spawn(
                self.base_dir.clone(),
                self.retention_days,
                Arc::clone(&self.clock),
                self.sweep_interval,
            )?)
        } else {
            None
        };

        let handler = DailyFileHandler {
            state: Mutex::new(FileState::Closed),
            base_dir: self.base_dir,
            prefix: self.prefix,
            level: self.level,
            retention_days: self.retention_days,
            formatter: self
                .formatter
                .unwrap_or_else(|| Box::new(TextFormatter::new())),
            clock: self.clock,
            retention,
        };

        {
            let mut state = handler.state.lock();
            handler.rotate_if_needed(&mut state)?;
        }
        Ok(handler)
    }
}

/// Handler writing one file per local calendar day
pub struct DailyFileHandler {
    state: Mutex<FileState>,
    base_dir: PathBuf,
    prefix: Option<String>,
    level: LogLevel,
    retention_days: u32,
    formatter: Box<dyn Formatter>,
    clock: Arc<dyn Clock>,
    retention: Option<RetentionJob>,
}

impl DailyFileHandler {
    pub fn builder(base_dir: impl AsRef<Path>) -> DailyFileHandlerBuilder {
        DailyFileHandlerBuilder::new(base_dir.as_ref().to_path_buf())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn retention_days(&self) -> u32 {
        self.retention_days
    }

    /// Path of the file for `date`
    pub fn file_path_for(&self, date: NaiveDate) -> PathBuf {
        let date = date.format(DATE_FORMAT);
        let name = match self.prefix {
            Some(ref prefix) => format!("{}-{}.log", prefix, date),
            None => format!("{}.log", date),
        };
        self.base_dir.join(name)
    }

    /// Path of the open file, if any
    pub fn current_path(&self) -> Option<PathBuf> {
        match *self.state.lock() {
            FileState::Open { ref path, .. } => Some(path.clone()),
            _ => None,
        }
    }

    /// Date of the open file, if any
    pub fn current_date(&self) -> Option<NaiveDate> {
        match *self.state.lock() {
            FileState::Open { date, .. } => Some(date),
            _ => None,
        }
    }

    /// Run one cleanup pass on the calling thread
    pub fn run_cleanup(&self) -> CleanupReport {
        cleanup_expired(&self.base_dir, self.retention_days, self.clock.now())
    }

    /// Cleanup passes completed by the background job
    pub fn cleanup_passes(&self) -> usize {
        self.retention
            .as_ref()
            .map_or(0, RetentionJob::passes_completed)
    }

    /// Make sure the open file matches today's date
    ///
    /// Runs with the state lock held.
    fn rotate_if_needed(&self, state: &mut FileState) -> Result<()> {
        let today = self.clock.now().date_naive();
        match *state {
            FileState::Open { date, .. } if date == today => return Ok(()),
            FileState::Shutdown => return Err(self.closed_error()),
            _ => {}
        }

        if let FileState::Open { file, path, .. } = std::mem::replace(state, FileState::Closed) {
            if let Err(e) = file.sync_all() {
                eprintln!(
                    "[LOGGER WARN] Failed to close log file {} during rotation: {}",
                    path.display(),
                    e
                );
            }
        }

        let path = self.file_path_for(today);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    path.display().to_string(),
                    format!("Failed to open log file: {}", e),
                )
            })?;

        *state = FileState::Open {
            date: today,
            file,
            path,
        };

        if let Some(ref job) = self.retention {
            job.trigger();
        }
        Ok(())
    }

    fn closed_error(&self) -> LoggerError {
        LoggerError::closed(format!("daily file in {}", self.base_dir.display()))
    }
}

impl Handler for DailyFileHandler {
    fn enabled(&self, level: LogLevel) -> bool {
        level.enabled_at(self.level)
    }

    fn handle(&self, entry: &LogEntry) -> Result<()> {
        if !self.enabled(entry.level) {
            return Ok(());
        }

        let mut state = self.state.lock();
        self.rotate_if_needed(&mut state)?;
        let line = self.formatter.format(entry)?;

        match *state {
            FileState::Open {
                ref mut file,
                ref path,
                ..
            } => file.write_all(&line).map_err(|e| {
                LoggerError::io_operation(
                    "write log file",
                    format!("Failed to write to '{}'", path.display()),
                    e,
                )
            }),
            _ => Err(LoggerError::writer("daily log file is not open")),
        }
    }

    fn with_fields(self: Arc<Self>, _fields: &[Field]) -> Arc<dyn Handler> {
        self
    }

    fn flush(&self) -> Result<()> {
        if let FileState::Open { ref mut file, .. } = *self.state.lock() {
            file.flush()?;
        }
        Ok(())
    }

    /// Sync and close the current file and stop the retention job
    fn close(&self) -> Result<()> {
        let previous = std::mem::replace(&mut *self.state.lock(), FileState::Shutdown);

        if let Some(ref job) = self.retention {
            job.shutdown();
        }

        if let FileState::Open { file, path, .. } = previous {
            file.sync_all().map_err(|e| {
                LoggerError::io_operation(
                    "close log file",
                    format!("Failed to sync '{}'", path.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "daily_file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use chrono::{Duration as ChronoDuration, Local, TimeZone};
    use tempfile::tempdir;

    fn clock_at(y: i32, m: u32, d: u32, h: u32) -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(),
        ))
    }

    fn text_entry(message: &str) -> LogEntry {
        LogEntry::new(LogLevel::Info, message)
    }

    #[test]
    fn test_opens_todays_file_on_build() {
        let dir = tempdir().unwrap();
        let clock = clock_at(2025, 11, 17, 9);
        let handler = DailyFileHandler::builder(dir.path())
            .clock(clock)
            .build()
            .unwrap();

        let expected = dir.path().join("2025-11-17.log");
        assert_eq!(handler.current_path(), Some(expected.clone()));
        assert_eq!(
            handler.current_date(),
            NaiveDate::from_ymd_opt(2025, 11, 17)
        );
        assert!(expected.exists());
    }

    #[test]
    fn test_rotates_on_date_change() {
        let dir = tempdir().unwrap();
        let clock = clock_at(2025, 11, 17, 23);
        let handler = DailyFileHandler::builder(dir.path())
            .prefix("svc")
            .clock(clock.clone())
            .build()
            .unwrap();

        handler.handle(&text_entry("before midnight")).unwrap();
        clock.advance(ChronoDuration::hours(2));
        handler.handle(&text_entry("after midnight")).unwrap();
        handler.close().unwrap();

        let first = fs::read_to_string(dir.path().join("svc-2025-11-17.log")).unwrap();
        let second = fs::read_to_string(dir.path().join("svc-2025-11-18.log")).unwrap();
        assert!(first.contains("before midnight"));
        assert!(!first.contains("after midnight"));
        assert!(second.contains("after midnight"));
    }

    #[test]
    fn test_appends_to_existing_file_for_same_day() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("2025-11-17.log"), "existing\n").unwrap();

        let handler = DailyFileHandler::builder(dir.path())
            .clock(clock_at(2025, 11, 17, 8))
            .build()
            .unwrap();
        handler.handle(&text_entry("appended")).unwrap();
        handler.close().unwrap();

        let content = fs::read_to_string(dir.path().join("2025-11-17.log")).unwrap();
        assert!(content.starts_with("existing\n"));
        assert!(content.contains("appended"));
    }

    #[test]
    fn test_level_filtering() {
        let dir = tempdir().unwrap();
        let handler = DailyFileHandler::builder(dir.path())
            .level(LogLevel::Warn)
            .clock(clock_at(2025, 11, 17, 8))
            .build()
            .unwrap();

        handler.handle(&text_entry("ignored")).unwrap();
        handler
            .handle(&LogEntry::new(LogLevel::Error, "kept"))
            .unwrap();
        handler.close().unwrap();

        let content = fs::read_to_string(dir.path().join("2025-11-17.log")).unwrap();
        assert!(!content.contains("ignored"));
        assert!(content.contains("kept"));
    }

    #[test]
    fn test_close_rejects_later_writes() {
        let dir = tempdir().unwrap();
        let handler = DailyFileHandler::builder(dir.path())
            .retention_days(3)
            .clock(clock_at(2025, 11, 17, 8))
            .build()
            .unwrap();

        handler.close().unwrap();
        assert_eq!(handler.current_path(), None);
        let err = handler.handle(&text_entry("late")).unwrap_err();
        assert!(matches!(err, LoggerError::HandlerClosed { .. }));
        // Closing twice is harmless
        handler.close().unwrap();
    }

    #[test]
    fn test_empty_prefix_means_none() {
        let dir = tempdir().unwrap();
        let handler = DailyFileHandler::builder(dir.path())
            .prefix("")
            .clock(clock_at(2025, 11, 17, 8))
            .build()
            .unwrap();
        assert_eq!(handler.prefix(), None);
        assert_eq!(
            handler.file_path_for(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()),
            dir.path().join("2025-01-02.log")
        );
    }

    #[test]
    fn test_build_fails_when_directory_cannot_be_created() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        let result = DailyFileHandler::builder(blocker.join("logs")).build();
        assert!(matches!(result, Err(LoggerError::IoOperation { .. })));
    }

    #[test]
    fn test_prefix_with_separator_is_rejected() {
        let dir = tempdir().unwrap();
        let result = DailyFileHandler::builder(dir.path())
            .prefix("nested/app")
            .clock(clock_at(2025, 11, 17, 8))
            .build();
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_failed_rotation_is_reported_and_recovers() {
        let dir = tempdir().unwrap();
        let logs = dir.path().join("logs");
        let clock = clock_at(2025, 11, 17, 23);
        let handler = DailyFileHandler::builder(&logs)
            .clock(clock.clone())
            .build()
            .unwrap();
        handler.handle(&text_entry("before midnight")).unwrap();

        fs::remove_dir_all(&logs).unwrap();
        clock.advance(ChronoDuration::hours(2));

        let err = handler.handle(&text_entry("lost")).unwrap_err();
        assert!(matches!(err, LoggerError::FileRotationError { .. }));
        assert_eq!(handler.current_path(), None);

        fs::create_dir_all(&logs).unwrap();
        handler.handle(&text_entry("recovered")).unwrap();
        handler.close().unwrap();

        let expected = logs.join("2025-11-18.log");
        let content = fs::read_to_string(&expected).unwrap();
        assert!(content.contains("recovered"));
        assert!(!content.contains("lost"));
    }

    #[test]
    fn test_cleanup_follows_retention_setting() {
        let dir = tempdir().unwrap();
        let old = dir.path().join("2025-11-01.log");
        fs::write(&old, b"old\n").unwrap();
        let modified = Local.with_ymd_and_hms(2025, 11, 1, 12, 0, 0).unwrap();
        File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(modified.into())
            .unwrap();

        let handler = DailyFileHandler::builder(dir.path())
            .clock(clock_at(2025, 11, 17, 8))
            .build()
            .unwrap();
        // Retention disabled: nothing is removed
        assert!(handler.run_cleanup().is_empty());
        assert_eq!(handler.cleanup_passes(), 0);
        assert!(old.exists());
        handler.close().unwrap();

        let handler = DailyFileHandler::builder(dir.path())
            .retention_days(7)
            .clock(clock_at(2025, 11, 17, 8))
            .build()
            .unwrap();
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while handler.cleanup_passes() == 0 && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(handler.cleanup_passes() >= 1);
        assert!(!old.exists());
        assert!(dir.path().join("2025-11-17.log").exists());
    }
}
