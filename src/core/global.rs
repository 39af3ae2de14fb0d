//! Process-wide default logger
//!
//! Initialized lazily, exactly once, to a colored stdout text logger at
//! `Info`. Readers get a clone of the current logger; replacing it never
//! affects clones already handed out.

use super::formatter::TextFormatter;
use super::log_level::LogLevel;
use super::logger::Logger;
use crate::handlers::StreamHandler;
use parking_lot::RwLock;
use std::sync::OnceLock;

static GLOBAL_LOGGER: OnceLock<RwLock<Logger>> = OnceLock::new();

fn slot() -> &'static RwLock<Logger> {
    GLOBAL_LOGGER.get_or_init(|| {
        let handler = StreamHandler::stdout(LogLevel::Info)
            .with_formatter(Box::new(TextFormatter::new().with_colors(true)));
        RwLock::new(Logger::new(handler.into_arc()))
    })
}

/// Current global logger
pub fn global() -> Logger {
    slot().read().clone()
}

/// Replace the global logger, returning the previous one
///
/// ```
/// use rust_structured_logger::prelude::*;
///
/// let quiet = Logger::new(StreamHandler::stderr(LogLevel::Error).into_arc());
/// let previous = set_global(quiet);
/// assert!(!global().enabled(LogLevel::Warn));
/// set_global(previous);
/// ```
pub fn set_global(logger: Logger) -> Logger {
    std::mem::replace(&mut *slot().write(), logger)
}
