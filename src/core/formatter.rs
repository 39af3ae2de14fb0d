//! Formatters turning a [`LogEntry`] into the bytes of one output line
//!
//! - [`TextFormatter`]: human-readable line, optionally colored
//! - [`JsonFormatter`]: one JSON object per line

use super::error::Result;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use colored::{Color, Colorize};
use std::fmt::Write as _;

/// Stateless transform from an entry to a newline-terminated byte sequence
pub trait Formatter: Send + Sync {
    fn format(&self, entry: &LogEntry) -> Result<Vec<u8>>;
    fn name(&self) -> &str;
}

/// Output format selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `[2025-11-17 10:30:45] INFO  main.rs:12 Request processed status=200`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"timestamp":"2025-11-17T10:30:45.000+00:00","level":"INFO","message":"Request processed"}`
    Json,
}

/// Per-level colors for the text formatter
#[derive(Debug, Clone, PartialEq)]
pub struct ColorConfig {
    pub timestamp: Color,
    pub debug: Color,
    pub info: Color,
    pub warn: Color,
    pub error: Color,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            timestamp: Color::Cyan,
            debug: LogLevel::Debug.default_color(),
            info: LogLevel::Info.default_color(),
            warn: LogLevel::Warn.default_color(),
            error: LogLevel::Error.default_color(),
        }
    }
}

impl ColorConfig {
    #[must_use]
    pub fn for_level(&self, level: LogLevel) -> Color {
        match level {
            LogLevel::Debug => self.debug,
            LogLevel::Info => self.info,
            LogLevel::Warn => self.warn,
            LogLevel::Error => self.error,
        }
    }
}

/// Line-oriented text formatter
///
/// Layout: `[timestamp] LEVEL file:line message k=v ... | ctx=v ...`
///
/// # Example
///
/// ```
/// use rust_structured_logger::core::{Formatter, LogEntry, LogLevel, TextFormatter};
/// use rust_structured_logger::Field;
///
/// let entry = LogEntry::new(LogLevel::Info, "ready").with_fields(vec![Field::int("port", 8080)]);
/// let line = TextFormatter::new().format(&entry).unwrap();
/// assert!(String::from_utf8(line).unwrap().ends_with("INFO  ready port=8080\n"));
/// ```
#[derive(Debug, Clone)]
pub struct TextFormatter {
    timestamp_format: TimestampFormat,
    include_caller: bool,
    use_color: bool,
    colors: ColorConfig,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            timestamp_format: TimestampFormat::Simple,
            include_caller: true,
            use_color: false,
            colors: ColorConfig::default(),
        }
    }
}

impl TextFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_caller(mut self, include: bool) -> Self {
        self.include_caller = include;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    #[must_use]
    pub fn with_color_config(mut self, colors: ColorConfig) -> Self {
        self.colors = colors;
        self
    }

    fn format_line(&self, entry: &LogEntry) -> String {
        let mut output = String::with_capacity(128);
        let timestamp = format!("[{}]", self.timestamp_format.format(&entry.timestamp));
        let level = format!("{:<5}", entry.level);

        // Colors wrap only the timestamp and level tokens
        if self.use_color {
            let _ = write!(
                output,
                "{} {}",
                timestamp.color(self.colors.timestamp),
                level.color(self.colors.for_level(entry.level))
            );
        } else {
            let _ = write!(output, "{} {}", timestamp, level);
        }

        if self.include_caller {
            if let Some(ref caller) = entry.caller {
                let _ = write!(output, " {}", caller);
            }
        }

        if !entry.message.is_empty() {
            output.push(' ');
            output.push_str(&entry.message);
        }

        for field in &entry.fields {
            let _ = write!(output, " {}", field);
        }

        if !entry.context_fields.is_empty() {
            if !entry.fields.is_empty() {
                output.push_str(" |");
            }
            for field in entry.context_fields.iter() {
                let _ = write!(output, " {}", field);
            }
        }

        output.push('\n');
        output
    }
}

impl Formatter for TextFormatter {
    fn format(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        Ok(self.format_line(entry).into_bytes())
    }

    fn name(&self) -> &str {
        "text"
    }
}

/// Single-line JSON object formatter
///
/// Keys in order: `timestamp`, `level`, `message` (when non-empty),
/// `caller` (when enabled), event fields, then a nested `context` object.
/// A field named like a reserved key overwrites it.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    timestamp_format: TimestampFormat,
    include_caller: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self {
            timestamp_format: TimestampFormat::Iso8601,
            include_caller: true,
        }
    }
}

impl JsonFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_caller(mut self, include: bool) -> Self {
        self.include_caller = include;
        self
    }

    fn to_object(&self, entry: &LogEntry) -> Result<serde_json::Map<String, serde_json::Value>> {
        use serde_json::Value;

        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "timestamp".to_string(),
            self.timestamp_format.to_json_value(&entry.timestamp),
        );
        json_obj.insert(
            "level".to_string(),
            Value::String(entry.level.to_str().to_string()),
        );

        if !entry.message.is_empty() {
            json_obj.insert("message".to_string(), Value::String(entry.message.clone()));
        }

        if self.include_caller {
            if let Some(ref caller) = entry.caller {
                json_obj.insert("caller".to_string(), Value::String(caller.to_string()));
            }
        }

        for field in &entry.fields {
            json_obj.insert(field.key.clone(), field.value.to_json_value()?);
        }

        if !entry.context_fields.is_empty() {
            let mut context = serde_json::Map::new();
            for field in entry.context_fields.iter() {
                context.insert(field.key.clone(), field.value.to_json_value()?);
            }
            json_obj.insert("context".to_string(), Value::Object(context));
        }

        Ok(json_obj)
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        let json_obj = self.to_object(entry)?;
        let mut bytes = serde_json::to_vec(&serde_json::Value::Object(json_obj))?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn name(&self) -> &str {
        "json"
    }
}
