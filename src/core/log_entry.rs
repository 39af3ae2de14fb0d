//! Log entry structure

use super::field::{escape_line_breaks, Field};
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::sync::Arc;

/// Source location of a log call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerInfo {
    /// File name without its directory
    pub file: String,
    pub line: u32,
    /// Module path of the caller, when known
    pub function: Option<String>,
}

impl CallerInfo {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
            function: None,
        }
    }

    /// Caller info for a `#[track_caller]` location
    pub fn from_location(location: &Location<'_>) -> Self {
        let file = Path::new(location.file())
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(location.file());
        Self::new(file, location.line())
    }

    #[must_use]
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }
}

impl fmt::Display for CallerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Finalized, immutable log record handed to a handler
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
    /// Fields added on this particular call
    pub fields: Vec<Field>,
    /// Fields inherited from the logger
    pub context_fields: Arc<[Field]>,
    pub caller: Option<CallerInfo>,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so every record stays on one line.
    fn sanitize_message(message: &str) -> String {
        escape_line_breaks(message).into_owned()
    }

    pub fn new(level: LogLevel, message: impl AsRef<str>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: Self::sanitize_message(message.as_ref()),
            fields: Vec::new(),
            context_fields: Arc::from(Vec::new()),
            caller: None,
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_context_fields(mut self, fields: Arc<[Field]>) -> Self {
        self.context_fields = fields;
        self
    }

    #[must_use]
    pub fn with_caller(mut self, caller: CallerInfo) -> Self {
        self.caller = Some(caller);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_sanitized() {
        let entry = LogEntry::new(LogLevel::Info, "line one\nline two\tend");
        assert_eq!(entry.message, "line one\\nline two\\tend");
    }

    #[test]
    fn test_caller_from_location() {
        let caller = CallerInfo::from_location(Location::caller());
        assert_eq!(caller.file, "log_entry.rs");
        assert!(caller.line > 0);
        assert_eq!(caller.function, None);
    }

    #[test]
    fn test_caller_display() {
        let caller = CallerInfo::new("main.rs", 42).with_function("app::run");
        assert_eq!(caller.to_string(), "main.rs:42");
        assert_eq!(caller.function.as_deref(), Some("app::run"));
    }

    #[test]
    fn test_builder_methods() {
        let ctx: Arc<[Field]> = Arc::from(vec![Field::string("service", "api")]);
        let entry = LogEntry::new(LogLevel::Warn, "slow")
            .with_fields(vec![Field::int("ms", 900)])
            .with_context_fields(ctx)
            .with_caller(CallerInfo::new("db.rs", 7));

        assert_eq!(entry.fields.len(), 1);
        assert_eq!(entry.context_fields.len(), 1);
        assert_eq!(entry.caller.unwrap().line, 7);
    }
}
