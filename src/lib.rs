//! # Rust Structured Logger
//!
//! A structured logging front end with pluggable, rotation-aware handlers.
//!
//! ## Features
//!
//! - **Fluent events**: typed fields accumulated on an [`Event`], emitted with
//!   `msg`, `msgf` or `send`; disabled levels cost a single check
//! - **Context**: [`Logger::with`] derives loggers carrying persistent fields
//! - **Formats**: colored text lines or one JSON object per line
//! - **Handlers**: streams, size-rotated files, one file per calendar day with
//!   background retention cleanup, and fan-out to several handlers
//!
//! ## Example
//!
//! ```
//! use rust_structured_logger::prelude::*;
//!
//! let logger = Logger::new(StreamHandler::console(LogLevel::Debug).into_arc())
//!     .with(vec![Field::string("service", "billing")]);
//!
//! logger.info()
//!     .str("invoice", "INV-001")
//!     .float64("amount", 99.5)
//!     .msg("invoice created");
//! ```

pub mod core;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        global, set_global, CallerInfo, Clock, ColorConfig, Config, Event, Field, FieldValue,
        Formatter, Handler, JsonFormatter, LogEntry, LogLevel, Logger, LoggerError, OutputFormat,
        OutputTarget, Result, RotationMode, TextFormatter, TimestampFormat,
    };
    pub use crate::handlers::{
        DailyFileHandler, FileHandler, MultiHandler, SizeRotationPolicy, StreamHandler,
    };
}

pub use crate::core::{
    global, set_global, split_daily_path, AnyValue, CallerInfo, Clock, ColorConfig, Config, Event,
    Field, FieldType, FieldValue, FixedClock, Formatter, Handler, HandlerFailure, HandlerFailures,
    JsonFormatter, LogEntry, LogLevel, Logger, LoggerError, OutputFormat, OutputTarget, Result,
    RotationMode, SystemClock, TextFormatter, TimestampFormat,
};
pub use handlers::{
    DailyFileHandler, FileHandler, MemoryWriter, MultiHandler, SizeRotatingWriter,
    SizeRotationPolicy, StreamHandler,
};
