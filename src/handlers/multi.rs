//! Fan-out handler

use crate::core::{
    error::{HandlerFailure, HandlerFailures, LoggerError, Result},
    field::Field,
    handler::Handler,
    log_entry::LogEntry,
    log_level::LogLevel,
};
use std::sync::Arc;

/// Dispatches every entry to all children
///
/// Each child applies its own level filter. A failing child does not stop
/// the others; all failures are returned together.
///
/// ```
/// use rust_structured_logger::handlers::{MemoryWriter, MultiHandler};
/// use rust_structured_logger::prelude::*;
///
/// let errors = MemoryWriter::new();
/// let everything = MemoryWriter::new();
/// let multi = MultiHandler::new(vec![
///     StreamHandler::new(errors.clone(), LogLevel::Error).into_arc(),
///     StreamHandler::new(everything.clone(), LogLevel::Debug).into_arc(),
/// ]);
///
/// let logger = Logger::from_handler(multi);
/// logger.debug().msg("detail");
/// logger.error().msg("failure");
/// assert_eq!(errors.lines().len(), 1);
/// assert_eq!(everything.lines().len(), 2);
/// ```
pub struct MultiHandler {
    handlers: Vec<Arc<dyn Handler>>,
}

impl MultiHandler {
    pub fn new(handlers: Vec<Arc<dyn Handler>>) -> Self {
        Self { handlers }
    }

    pub fn handlers(&self) -> &[Arc<dyn Handler>] {
        &self.handlers
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run `op` on every child, collecting failures
    fn for_each_child<F>(&self, mut op: F) -> Result<()>
    where
        F: FnMut(&dyn Handler) -> Result<()>,
    {
        let failures: Vec<HandlerFailure> = self
            .handlers
            .iter()
            .enumerate()
            .filter_map(|(index, handler)| {
                op(handler.as_ref()).err().map(|error| HandlerFailure {
                    index,
                    handler: handler.name().to_string(),
                    error,
                })
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::HandlerFailures(HandlerFailures {
                total: self.handlers.len(),
                failures,
            }))
        }
    }
}

impl Handler for MultiHandler {
    fn enabled(&self, level: LogLevel) -> bool {
        self.handlers.iter().any(|h| h.enabled(level))
    }

    fn handle(&self, entry: &LogEntry) -> Result<()> {
        self.for_each_child(|handler| handler.handle(entry))
    }

    fn with_fields(self: Arc<Self>, fields: &[Field]) -> Arc<dyn Handler> {
        let handlers = self
            .handlers
            .iter()
            .map(|h| Arc::clone(h).with_fields(fields))
            .collect();
        Arc::new(MultiHandler::new(handlers))
    }

    fn flush(&self) -> Result<()> {
        self.for_each_child(|handler| handler.flush())
    }

    fn close(&self) -> Result<()> {
        self.for_each_child(|handler| handler.close())
    }

    fn name(&self) -> &str {
        "multi"
    }
}
