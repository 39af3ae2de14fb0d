//! Error types for the logger system

use std::fmt;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File handler error with path
    #[error("File handler error for '{path}': {message}")]
    FileHandlerError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// Level name that is not one of DEBUG, INFO, WARN/WARNING, ERROR
    #[error("Invalid log level: '{name}'")]
    UnknownLevel { name: String },

    /// Write attempted after the handler was closed
    #[error("Handler '{name}' is closed")]
    HandlerClosed { name: String },

    /// One or more children of a fan-out handler failed
    #[error("{0}")]
    HandlerFailures(HandlerFailures),

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

/// A single child failure recorded by a fan-out dispatch.
#[derive(Debug)]
pub struct HandlerFailure {
    /// Position of the child in the fan-out list
    pub index: usize,
    /// `Handler::name` of the child
    pub handler: String,
    pub error: LoggerError,
}

/// Every child failure from one fan-out dispatch, in child order.
#[derive(Debug)]
pub struct HandlerFailures {
    pub total: usize,
    pub failures: Vec<HandlerFailure>,
}

impl HandlerFailures {
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Indices of the children that failed
    #[must_use]
    pub fn failed_indices(&self) -> Vec<usize> {
        self.failures.iter().map(|f| f.index).collect()
    }
}

impl fmt::Display for HandlerFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} handlers failed", self.failures.len(), self.total)?;
        for failure in &self.failures {
            write!(
                f,
                "; #{} ({}): {}",
                failure.index, failure.handler, failure.error
            )?;
        }
        Ok(())
    }
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file handler error
    pub fn file_handler(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileHandlerError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unknown_level(name: impl Into<String>) -> Self {
        LoggerError::UnknownLevel { name: name.into() }
    }

    pub fn closed(name: impl Into<String>) -> Self {
        LoggerError::HandlerClosed { name: name.into() }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }
}
