//! Main logger implementation

use super::{
    config::{Config, OutputTarget, RotationMode},
    error::Result,
    event::Event,
    field::Field,
    formatter::{Formatter, JsonFormatter, OutputFormat, TextFormatter},
    handler::Handler,
    log_level::LogLevel,
};
use crate::handlers::{DailyFileHandler, FileHandler, MultiHandler, SizeRotationPolicy, StreamHandler};
use std::fmt;
use std::sync::Arc;

/// Cheap, cloneable logging front end
///
/// A logger is a shared handler plus the persistent context fields attached
/// through [`Logger::with`]. Every logger derived from another shares its
/// handler.
///
/// # Example
///
/// ```
/// use rust_structured_logger::prelude::*;
///
/// let logger = Logger::new(StreamHandler::stdout(LogLevel::Debug).into_arc());
/// let request_log = logger.with(vec![Field::string("request_id", "abc-123")]);
///
/// request_log.info().int("status", 200).msg("request processed");
/// logger.debug().msg("no request context here");
/// ```
#[derive(Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
    fields: Arc<[Field]>,
}

impl Logger {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self {
            handler,
            fields: Arc::from(Vec::new()),
        }
    }

    pub fn from_handler<H: Handler + 'static>(handler: H) -> Self {
        Self::new(Arc::new(handler))
    }

    /// Build a logger from configuration, failing if an output cannot be
    /// opened
    pub fn from_config(config: Config) -> Result<Self> {
        Ok(Self::new(build_handler(&config)?))
    }

    /// Build a logger from configuration, falling back to a colored stdout
    /// logger when the configured output cannot be opened
    pub fn from_config_or_console(config: Config) -> Self {
        match build_handler(&config) {
            Ok(handler) => Self::new(handler),
            Err(e) => {
                eprintln!(
                    "[LOGGER WARN] Failed to create configured output, falling back to console: {}",
                    e
                );
                Self::new(console_handler(&config, true).into_arc())
            }
        }
    }

    /// Derived logger carrying `fields` as context on every record, after
    /// this logger's own context
    ///
    /// Neither this logger nor its handler is modified.
    #[must_use]
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Self {
        let added: Vec<Field> = fields.into_iter().collect();
        if added.is_empty() {
            return self.clone();
        }

        let mut merged = Vec::with_capacity(self.fields.len() + added.len());
        merged.extend(self.fields.iter().cloned());
        merged.extend(added.iter().cloned());

        Self {
            handler: Arc::clone(&self.handler).with_fields(&added),
            fields: Arc::from(merged),
        }
    }

    pub fn debug(&self) -> Event<'_> {
        self.log(LogLevel::Debug)
    }

    pub fn info(&self) -> Event<'_> {
        self.log(LogLevel::Info)
    }

    pub fn warn(&self) -> Event<'_> {
        self.log(LogLevel::Warn)
    }

    pub fn error(&self) -> Event<'_> {
        self.log(LogLevel::Error)
    }

    pub fn log(&self, level: LogLevel) -> Event<'_> {
        Event::new(self, level)
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.handler.enabled(level)
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    pub fn context_fields(&self) -> Arc<[Field]> {
        Arc::clone(&self.fields)
    }

    pub fn flush(&self) -> Result<()> {
        self.handler.flush()
    }

    /// Close the shared handler. Loggers derived through `with` stop writing
    /// too.
    pub fn close(&self) -> Result<()> {
        self.handler.close()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("handler", &self.handler.name())
            .field("fields", &self.fields)
            .finish()
    }
}

fn formatter_for(config: &Config, use_color: bool) -> Box<dyn Formatter> {
    match config.format {
        OutputFormat::Text => Box::new(
            TextFormatter::new()
                .with_caller(config.add_caller)
                .with_colors(use_color)
                .with_color_config(config.colors.clone()),
        ),
        OutputFormat::Json => Box::new(JsonFormatter::new().with_caller(config.add_caller)),
    }
}

fn console_handler(config: &Config, to_stdout: bool) -> StreamHandler {
    let formatter = formatter_for(config, config.use_color);
    if to_stdout {
        StreamHandler::stdout(config.level).with_formatter(formatter)
    } else {
        StreamHandler::stderr(config.level).with_formatter(formatter)
    }
}

fn build_handler(config: &Config) -> Result<Arc<dyn Handler>> {
    match config.output {
        OutputTarget::Stdout => Ok(console_handler(config, true).into_arc()),
        OutputTarget::Stderr => Ok(console_handler(config, false).into_arc()),
        OutputTarget::File => {
            // Color escapes belong on the console mirror, not in the file
            let file_color = config.use_color && !config.multi_output;
            let file_formatter = formatter_for(config, file_color);

            let file: Arc<dyn Handler> = match config.rotation {
                RotationMode::Daily => {
                    let (dir, prefix) = config.daily_location();
                    let mut builder = DailyFileHandler::builder(dir)
                        .level(config.level)
                        .retention_days(config.max_age_days)
                        .formatter(file_formatter);
                    if let Some(prefix) = prefix {
                        builder = builder.prefix(prefix);
                    }
                    Arc::new(builder.build()?)
                }
                RotationMode::Size => {
                    let policy = SizeRotationPolicy::new()
                        .with_max_size_mb(config.max_size_mb)
                        .with_max_backups(config.max_backups)
                        .with_max_age_days(config.max_age_days)
                        .with_compression(config.compress);
                    Arc::new(
                        FileHandler::new(config.file_path(), policy, config.level)?
                            .with_formatter(file_formatter),
                    )
                }
            };

            if config.multi_output {
                let console = console_handler(config, true).into_arc();
                Ok(Arc::new(MultiHandler::new(vec![file, console])))
            } else {
                Ok(file)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::OutputTarget;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_with_accumulates_context_without_mutating_parent() {
        let logger = Logger::new(StreamHandler::stderr(LogLevel::Info).into_arc());
        let child = logger.with(vec![Field::string("service", "api")]);
        let grandchild = child.with(vec![Field::int("worker", 3)]);

        assert!(logger.context_fields().is_empty());
        assert_eq!(child.context_fields().len(), 1);
        let context = grandchild.context_fields();
        let keys: Vec<&str> = context.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["service", "worker"]);
        assert!(Arc::ptr_eq(logger.handler(), child.handler()));
    }

    #[test]
    fn test_enabled_follows_handler() {
        let logger = Logger::new(StreamHandler::stderr(LogLevel::Warn).into_arc());
        assert!(!logger.enabled(LogLevel::Info));
        assert!(logger.enabled(LogLevel::Error));
        assert!(!logger.info().enabled());
    }

    #[test]
    fn test_from_config_size_rotated_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let config = Config::production()
            .with_output_path(&path)
            .with_multi_output(false);

        let logger = Logger::from_config(config).unwrap();
        logger.info().str("k", "v").msg("hello");
        logger.close().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(value["message"], "hello");
        assert_eq!(value["k"], "v");
    }

    #[test]
    fn test_from_config_daily_file_is_uncolored_with_console_mirror() {
        let dir = tempdir().unwrap();
        let config = Config::default()
            .with_output_path(dir.path().join("svc.log"))
            .with_max_age_days(0);

        let logger = Logger::from_config(config).unwrap();
        logger.warn().msg("disk almost full");
        logger.close().unwrap();

        let today = chrono::Local::now().format("%Y-%m-%d");
        let content = fs::read_to_string(dir.path().join(format!("svc-{}.log", today))).unwrap();
        assert!(content.contains("WARN  "));
        assert!(!content.contains('\x1b'));
    }

    #[test]
    fn test_from_config_or_console_falls_back() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();

        let config = Config::default()
            .with_output(OutputTarget::File)
            .with_output_path(blocker.join("logs"));
        assert!(Logger::from_config(config.clone()).is_err());

        let logger = Logger::from_config_or_console(config);
        assert_eq!(logger.handler().name(), "stdout");
    }
}
