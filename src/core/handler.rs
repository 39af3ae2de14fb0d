//! Handler trait for log output back ends

use super::{error::Result, field::Field, log_entry::LogEntry, log_level::LogLevel};
use std::sync::Arc;

/// Filters, formats and writes entries to a destination.
///
/// Handlers are shared between loggers through `Arc` and must serialize their
/// own format+write step internally.
pub trait Handler: Send + Sync {
    /// Whether a record at `level` would be accepted
    fn enabled(&self, level: LogLevel) -> bool;

    /// Process one entry. Implementations re-check [`Handler::enabled`] and
    /// return `Ok(())` without writing when it is false.
    fn handle(&self, entry: &LogEntry) -> Result<()>;

    /// Handler to use for a logger carrying `fields` as persistent context.
    ///
    /// Never mutates `self`. Handlers that do not pre-render context return
    /// themselves.
    fn with_fields(self: Arc<Self>, fields: &[Field]) -> Arc<dyn Handler>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Release the destination. Later writes fail with `HandlerClosed`.
    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
