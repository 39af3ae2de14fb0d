//! Size-rotated file handler

use super::rotating_file::{SizeRotatingWriter, SizeRotationPolicy};
use crate::core::{
    error::{LoggerError, Result},
    field::Field,
    formatter::{Formatter, JsonFormatter},
    handler::Handler,
    log_entry::LogEntry,
    log_level::LogLevel,
};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Handler writing to a [`SizeRotatingWriter`]
///
/// Writes JSON lines unless another formatter is set.
///
/// ```no_run
/// use rust_structured_logger::handlers::{FileHandler, SizeRotationPolicy};
/// use rust_structured_logger::prelude::*;
///
/// let policy = SizeRotationPolicy::new().with_max_size_mb(100).with_max_backups(5);
/// let handler = FileHandler::new("/var/log/app.log", policy, LogLevel::Info).unwrap();
/// let logger = Logger::from_handler(handler);
/// logger.info().msg("started");
/// ```
pub struct FileHandler {
    writer: Mutex<Option<SizeRotatingWriter>>,
    formatter: Box<dyn Formatter>,
    level: LogLevel,
    path: PathBuf,
}

impl FileHandler {
    pub fn new<P: AsRef<Path>>(path: P, policy: SizeRotationPolicy, level: LogLevel) -> Result<Self> {
        let writer = SizeRotatingWriter::new(path.as_ref(), policy)?;
        Ok(Self {
            path: writer.path().to_path_buf(),
            writer: Mutex::new(Some(writer)),
            formatter: Box::new(JsonFormatter::new()),
            level,
        })
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Handler for FileHandler {
    fn enabled(&self, level: LogLevel) -> bool {
        level.enabled_at(self.level)
    }

    fn handle(&self, entry: &LogEntry) -> Result<()> {
        if !self.enabled(entry.level) {
            return Ok(());
        }

        let mut guard = self.writer.lock();
        let writer = guard
            .as_mut()
            .ok_or_else(|| LoggerError::closed(self.path.display().to_string()))?;
        let line = self.formatter.format(entry)?;
        writer.write(&line)
    }

    fn with_fields(self: Arc<Self>, _fields: &[Field]) -> Arc<dyn Handler> {
        self
    }

    fn flush(&self) -> Result<()> {
        match *self.writer.lock() {
            Some(ref mut writer) => writer.flush(),
            None => Ok(()),
        }
    }

    /// Waits for pending backup compression and pruning
    fn close(&self) -> Result<()> {
        let writer = self.writer.lock().take();
        match writer {
            Some(mut writer) => writer.close(),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formatter::TextFormatter;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_writes_json_lines_by_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let handler = FileHandler::new(&path, SizeRotationPolicy::new(), LogLevel::Info).unwrap();

        handler
            .handle(&LogEntry::new(LogLevel::Info, "one").with_fields(vec![Field::int("n", 1)]))
            .unwrap();
        handler.handle(&LogEntry::new(LogLevel::Debug, "filtered")).unwrap();
        handler.close().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["n"], 1);
    }

    #[test]
    fn test_rotates_by_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let policy = SizeRotationPolicy::new().with_max_bytes(64);
        let handler = FileHandler::new(&path, policy, LogLevel::Debug)
            .unwrap()
            .with_formatter(Box::new(TextFormatter::new().with_caller(false)));

        for i in 0..10 {
            handler
                .handle(&LogEntry::new(LogLevel::Info, format!("message number {}", i)))
                .unwrap();
        }
        handler.close().unwrap();

        let files = fs::read_dir(dir.path()).unwrap().count();
        assert!(files > 1, "expected rotated backups, found {} file(s)", files);
        assert!(fs::metadata(&path).unwrap().len() <= 64);
    }

    #[test]
    fn test_close_finishes_backup_compression() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let policy = SizeRotationPolicy::new()
            .with_max_bytes(128)
            .with_compression(true)
            .with_max_backups(2);
        let handler = FileHandler::new(&path, policy, LogLevel::Info).unwrap();

        for i in 0..20 {
            let entry = LogEntry::new(LogLevel::Info, "compressed later")
                .with_fields(vec![Field::int("i", i)]);
            handler.handle(&entry).unwrap();
        }
        handler.close().unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name != "app.log")
            .collect();
        assert_eq!(names.len(), 2, "unexpected backups: {:?}", names);
        assert!(names.iter().all(|name| name.ends_with(".log.gz")));
    }

    #[test]
    fn test_closed_handler_rejects_writes() {
        let dir = tempdir().unwrap();
        let handler =
            FileHandler::new(dir.path().join("app.log"), SizeRotationPolicy::new(), LogLevel::Info)
                .unwrap();
        handler.close().unwrap();
        handler.close().unwrap();

        let err = handler
            .handle(&LogEntry::new(LogLevel::Error, "late"))
            .unwrap_err();
        assert!(matches!(err, LoggerError::HandlerClosed { .. }));
    }
}
