//! Handler writing formatted lines to a byte stream
//!
//! Covers stdout, stderr and any other `Write` sink. Format and write happen
//! under one lock, so lines from concurrent producers never interleave.

use crate::core::{
    error::{LoggerError, Result},
    field::Field,
    formatter::{Formatter, JsonFormatter, TextFormatter},
    handler::Handler,
    log_entry::LogEntry,
    log_level::LogLevel,
};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

type Sink = Box<dyn Write + Send>;

pub struct StreamHandler {
    writer: Mutex<Option<Sink>>,
    formatter: Box<dyn Formatter>,
    level: LogLevel,
    name: String,
}

impl StreamHandler {
    /// Plain text handler over any writer
    pub fn new<W: Write + Send + 'static>(writer: W, level: LogLevel) -> Self {
        Self::with_name("stream", Box::new(writer), level)
    }

    pub fn stdout(level: LogLevel) -> Self {
        Self::with_name("stdout", Box::new(io::stdout()), level)
    }

    pub fn stderr(level: LogLevel) -> Self {
        Self::with_name("stderr", Box::new(io::stderr()), level)
    }

    /// Colored text on stdout
    ///
    /// ```
    /// use rust_structured_logger::prelude::*;
    ///
    /// let logger = Logger::new(StreamHandler::console(LogLevel::Debug).into_arc());
    /// logger.debug().str("phase", "startup").msg("booting");
    /// ```
    pub fn console(level: LogLevel) -> Self {
        Self::stdout(level).with_formatter(Box::new(TextFormatter::new().with_colors(true)))
    }

    /// One JSON object per line over any writer
    pub fn json<W: Write + Send + 'static>(writer: W, level: LogLevel) -> Self {
        Self::new(writer, level).with_formatter(Box::new(JsonFormatter::new()))
    }

    fn with_name(name: &str, writer: Sink, level: LogLevel) -> Self {
        Self {
            writer: Mutex::new(Some(writer)),
            formatter: Box::new(TextFormatter::new()),
            level,
            name: name.to_string(),
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn into_arc(self) -> Arc<dyn Handler> {
        Arc::new(self)
    }
}

impl Handler for StreamHandler {
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
            .ok_or_else(|| LoggerError::closed(self.name.as_str()))?;
        let line = self.formatter.format(entry)?;
        writer.write_all(&line)?;
        Ok(())
    }

    fn with_fields(self: Arc<Self>, _fields: &[Field]) -> Arc<dyn Handler> {
        self
    }

    fn flush(&self) -> Result<()> {
        if let Some(ref mut writer) = *self.writer.lock() {
            writer.flush()?;
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        if let Some(mut writer) = self.writer.lock().take() {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for StreamHandler {
    fn drop(&mut self) {
        let _ = Handler::flush(self);
    }
}

/// Cloneable in-memory sink; every clone appends to the same buffer
///
/// ```
/// use rust_structured_logger::prelude::*;
/// use rust_structured_logger::handlers::MemoryWriter;
///
/// let sink = MemoryWriter::new();
/// let logger = Logger::new(StreamHandler::new(sink.clone(), LogLevel::Info).into_arc());
/// logger.info().msg("captured");
/// assert!(sink.contents().contains("captured"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
