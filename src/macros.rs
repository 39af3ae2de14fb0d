//! Logging macros for ergonomic log message formatting.
//!
//! The macros format like `println!`, record the calling module as the
//! caller function, and skip formatting entirely when the level is disabled.
//!
//! # Examples
//!
//! ```
//! use rust_structured_logger::prelude::*;
//! use rust_structured_logger::info;
//!
//! let logger = Logger::new(StreamHandler::stdout(LogLevel::Info).into_arc());
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a formatted message at the given level.
///
/// # Examples
///
/// ```
/// # use rust_structured_logger::prelude::*;
/// # let logger = Logger::new(StreamHandler::stdout(LogLevel::Info).into_arc());
/// use rust_structured_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger
            .log($level)
            .caller_function(module_path!())
            .msgf(format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// ```
/// # use rust_structured_logger::prelude::*;
/// # let logger = Logger::new(StreamHandler::stdout(LogLevel::Debug).into_arc());
/// use rust_structured_logger::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// # use rust_structured_logger::prelude::*;
/// # let logger = Logger::new(StreamHandler::stdout(LogLevel::Info).into_arc());
/// use rust_structured_logger::warn;
/// let usage = 91;
/// warn!(logger, "Disk usage at {}%", usage);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}
