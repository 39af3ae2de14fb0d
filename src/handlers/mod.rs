//! Handler implementations

pub mod daily_file;
pub mod file;
pub mod multi;
pub mod retention;
pub mod rotating_file;
pub mod stream;
mod worker;

pub use daily_file::{DailyFileHandler, DailyFileHandlerBuilder};
pub use file::FileHandler;
pub use multi::MultiHandler;
pub use retention::{cleanup_expired, CleanupReport, RetentionJob, DEFAULT_SWEEP_INTERVAL};
pub use rotating_file::{Backup, SizeRotatingWriter, SizeRotationPolicy};
pub use stream::{MemoryWriter, StreamHandler};

pub use crate::core::Handler;
