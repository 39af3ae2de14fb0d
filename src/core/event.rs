//! Fluent builder for a single log record
//!
//! An [`Event`] is bound to one [`Logger`] and one [`LogLevel`]. Whether the
//! record will be emitted is decided once, when the event is created; a
//! disabled event ignores every field call, never reads the clock and never
//! formats anything.

use super::field::{AnyValue, Field};
use super::log_entry::{CallerInfo, LogEntry};
use super::log_level::LogLevel;
use super::logger::Logger;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

/// Builder for one log record
///
/// # Example
///
/// ```
/// use rust_structured_logger::prelude::*;
///
/// let logger = Logger::new(StreamHandler::stderr(LogLevel::Info).into_arc());
///
/// logger.info()
///     .str("method", "GET")
///     .int("status", 200)
///     .float64("latency_ms", 42.5)
///     .msg("request processed");
/// ```
#[must_use = "an event does nothing until `msg`, `msgf` or `send` is called"]
pub struct Event<'a> {
    logger: &'a Logger,
    level: LogLevel,
    enabled: bool,
    fields: Vec<Field>,
    function: Option<String>,
}

impl<'a> Event<'a> {
    pub(crate) fn new(logger: &'a Logger, level: LogLevel) -> Self {
        Self {
            logger,
            level,
            enabled: logger.handler().enabled(level),
            fields: Vec::new(),
            function: None,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether the bound handler accepts this event's level
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    fn push(mut self, field: impl FnOnce() -> Field) -> Self {
        if self.enabled {
            self.fields.push(field());
        }
        self
    }

    pub fn str(self, key: &str, value: impl Into<String>) -> Self {
        self.push(|| Field::string(key, value))
    }

    pub fn int(self, key: &str, value: isize) -> Self {
        self.push(|| Field::int(key, value))
    }

    pub fn int64(self, key: &str, value: i64) -> Self {
        self.push(|| Field::int64(key, value))
    }

    pub fn float64(self, key: &str, value: f64) -> Self {
        self.push(|| Field::float64(key, value))
    }

    pub fn bool(self, key: &str, value: bool) -> Self {
        self.push(|| Field::bool(key, value))
    }

    pub fn time(self, key: &str, value: DateTime<Local>) -> Self {
        self.push(|| Field::time(key, value))
    }

    pub fn dur(self, key: &str, value: Duration) -> Self {
        self.push(|| Field::duration(key, value))
    }

    /// Attach an error under the key `error`
    pub fn err<E: std::error::Error + ?Sized>(self, err: &E) -> Self {
        self.push(|| Field::error(err))
    }

    /// Attach an optional error; `None` records a null `error` field
    pub fn maybe_err<E: std::error::Error>(self, err: Option<&E>) -> Self {
        self.push(|| match err {
            Some(e) => Field::error(e),
            None => Field::no_error(),
        })
    }

    /// Attach any serializable value
    pub fn any<T>(self, key: &str, value: T) -> Self
    where
        T: Serialize + fmt::Debug + Send + Sync + 'static,
    {
        self.push(|| Field::any(key, value))
    }

    pub fn any_value(self, key: &str, value: Arc<dyn AnyValue>) -> Self {
        self.push(|| Field::any_value(key, value))
    }

    pub fn field(self, field: Field) -> Self {
        self.push(|| field)
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        if self.enabled {
            self.fields.extend(fields);
        }
        self
    }

    /// Record the calling function or module path alongside file and line
    pub fn caller_function(mut self, function: &str) -> Self {
        if self.enabled {
            self.function = Some(function.to_string());
        }
        self
    }

    /// Emit the record with `message`
    #[track_caller]
    pub fn msg(self, message: impl AsRef<str>) {
        if !self.enabled {
            return;
        }
        let caller = CallerInfo::from_location(Location::caller());
        self.dispatch(message.as_ref(), caller);
    }

    /// Emit the record with a formatted message
    ///
    /// ```
    /// use rust_structured_logger::prelude::*;
    ///
    /// let logger = Logger::new(StreamHandler::stderr(LogLevel::Info).into_arc());
    /// let attempt = 3;
    /// logger.warn().msgf(format_args!("retrying, attempt {}", attempt));
    /// ```
    #[track_caller]
    pub fn msgf(self, args: fmt::Arguments<'_>) {
        if !self.enabled {
            return;
        }
        let caller = CallerInfo::from_location(Location::caller());
        let message = match args.as_str() {
            Some(s) => s.to_string(),
            None => args.to_string(),
        };
        self.dispatch(&message, caller);
    }

    /// Emit the record without a message
    #[track_caller]
    pub fn send(self) {
        if !self.enabled {
            return;
        }
        let caller = CallerInfo::from_location(Location::caller());
        self.dispatch("", caller);
    }

    fn dispatch(self, message: &str, mut caller: CallerInfo) {
        caller.function = self.function;
        let entry = LogEntry::new(self.level, message)
            .with_fields(self.fields)
            .with_context_fields(self.logger.context_fields())
            .with_caller(caller);

        // Write failures are the handler's concern; logging call sites never fail
        let _ = self.logger.handler().handle(&entry);
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("level", &self.level)
            .field("enabled", &self.enabled)
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Result;
    use crate::core::handler::Handler;
    use parking_lot::Mutex;

    struct Capture {
        threshold: LogLevel,
        entries: Mutex<Vec<LogEntry>>,
    }

    impl Handler for Capture {
        fn enabled(&self, level: LogLevel) -> bool {
            level.enabled_at(self.threshold)
        }

        fn handle(&self, entry: &LogEntry) -> Result<()> {
            if self.enabled(entry.level) {
                self.entries.lock().push(entry.clone());
            }
            Ok(())
        }

        fn with_fields(self: Arc<Self>, _fields: &[Field]) -> Arc<dyn Handler> {
            self
        }

        fn name(&self) -> &str {
            "capture"
        }
    }

    fn capture(threshold: LogLevel) -> (Arc<Capture>, Logger) {
        let handler = Arc::new(Capture {
            threshold,
            entries: Mutex::new(Vec::new()),
        });
        let logger = Logger::new(handler.clone());
        (handler, logger)
    }

    #[test]
    fn test_fields_kept_in_call_order() {
        let (handler, logger) = capture(LogLevel::Debug);
        logger
            .info()
            .str("user", "alice")
            .int("attempt", 2)
            .bool("ok", false)
            .dur("elapsed", Duration::from_millis(5))
            .msg("login");

        let entries = handler.entries.lock();
        let keys: Vec<&str> = entries[0].fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["user", "attempt", "ok", "elapsed"]);
        assert_eq!(entries[0].message, "login");
    }

    #[test]
    fn test_disabled_event_is_inert() {
        let (handler, logger) = capture(LogLevel::Warn);
        let event = logger.debug().str("k", "v").int("n", 1);
        assert!(!event.enabled());
        assert!(event.fields.is_empty());
        assert_eq!(event.fields.capacity(), 0);
        event.msg("dropped");

        assert!(handler.entries.lock().is_empty());
    }

    #[test]
    fn test_caller_is_user_call_site() {
        let (handler, logger) = capture(LogLevel::Debug);
        let line = line!() + 1;
        logger.error().caller_function("app::run").send();

        let entries = handler.entries.lock();
        let caller = entries[0].caller.as_ref().unwrap();
        assert_eq!(caller.file, "event.rs");
        assert_eq!(caller.line, line);
        assert_eq!(caller.function.as_deref(), Some("app::run"));
        assert!(entries[0].message.is_empty());
    }

    #[test]
    fn test_msgf_formats_message() {
        let (handler, logger) = capture(LogLevel::Debug);
        let port = 8080;
        logger.info().msgf(format_args!("listening on {}", port));
        assert_eq!(handler.entries.lock()[0].message, "listening on 8080");
    }

    #[test]
    fn test_error_fields() {
        let (handler, logger) = capture(LogLevel::Debug);
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        logger.error().err(&err).msg("open failed");
        logger
            .error()
            .maybe_err(None::<&std::io::Error>)
            .msg("nothing wrong");

        let entries = handler.entries.lock();
        assert_eq!(entries[0].fields[0].to_string(), "error=missing");
        assert_eq!(entries[1].fields[0].to_string(), "error=null");
    }

    #[test]
    fn test_context_fields_come_from_logger() {
        let (handler, logger) = capture(LogLevel::Debug);
        let child = logger.with(vec![Field::string("service", "api")]);
        child.info().int("status", 200).msg("ok");

        let entries = handler.entries.lock();
        assert_eq!(entries[0].context_fields.len(), 1);
        assert_eq!(entries[0].context_fields[0].key, "service");
        assert_eq!(entries[0].fields[0].key, "status");
    }
}
