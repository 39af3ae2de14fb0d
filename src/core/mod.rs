//! Core logger types and traits

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod field;
pub mod formatter;
pub mod global;
pub mod handler;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod timestamp;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{split_daily_path, Config, OutputTarget, RotationMode};
pub use error::{HandlerFailure, HandlerFailures, LoggerError, Result};
pub use event::Event;
pub use field::{AnyValue, Field, FieldType, FieldValue, Serialized};
pub use formatter::{ColorConfig, Formatter, JsonFormatter, OutputFormat, TextFormatter};
pub use global::{global, set_global};
pub use handler::Handler;
pub use log_entry::{CallerInfo, LogEntry};
pub use log_level::LogLevel;
pub use logger::Logger;
pub use timestamp::TimestampFormat;
