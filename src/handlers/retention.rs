//! Retention cleanup for date-rotated log directories
//!
//! [`cleanup_expired`] is one synchronous pass. [`RetentionJob`] runs those
//! passes on a dedicated thread so writers never wait on directory scans.

use super::worker::MaintenanceWorker;
use crate::core::clock::Clock;
use crate::core::error::Result;
use chrono::{DateTime, Duration as ChronoDuration, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Interval between unprompted cleanup passes
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Outcome of one cleanup pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    /// Files that matched but could not be deleted, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl CleanupReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.failed.is_empty()
    }
}

/// Delete `.log` files in `dir` last modified more than `retention_days`
/// before `now`
///
/// Only regular files directly inside `dir` are considered. Failures are
/// reported on stderr and recorded in the report; they never abort the pass.
/// A retention of zero days disables cleanup, and a retention reaching
/// past the earliest representable date keeps everything.
pub fn cleanup_expired(dir: &Path, retention_days: u32, now: DateTime<Local>) -> CleanupReport {
    let mut report = CleanupReport::default();
    if retention_days == 0 {
        return report;
    }

    let Some(cutoff) = now.checked_sub_signed(ChronoDuration::days(i64::from(retention_days)))
    else {
        return report;
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!(
                "[LOGGER WARN] Failed to read log directory {}: {}",
                dir.display(),
                e
            );
            return report;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().map_or(true, |ext| ext != "log") {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => continue,
            Err(e) => {
                eprintln!("[LOGGER WARN] Failed to stat {}: {}", path.display(), e);
                continue;
            }
        };

        let modified: DateTime<Local> = match metadata.modified() {
            Ok(time) => time.into(),
            Err(e) => {
                eprintln!(
                    "[LOGGER WARN] No modification time for {}: {}",
                    path.display(),
                    e
                );
                continue;
            }
        };

        if modified >= cutoff {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => report.removed.push(path),
            Err(e) => {
                eprintln!(
                    "[LOGGER WARN] Failed to remove expired log file {}: {}",
                    path.display(),
                    e
                );
                report.failed.push((path, e.to_string()));
            }
        }
    }

    report
}

/// Background thread running [`cleanup_expired`] on request and on a timer
///
/// Requests made while a pass is pending are coalesced. Only one pass runs at
/// a time. [`shutdown`](Self::shutdown) (or drop) stops and joins the thread.
#[derive(Debug)]
pub struct RetentionJob {
    worker: MaintenanceWorker,
}

impl RetentionJob {
    /// Start the cleanup thread for `dir`
    ///
    /// # Errors
    ///
    /// Returns error if the thread cannot be spawned
    pub fn spawn(
        dir: PathBuf,
        retention_days: u32,
        clock: Arc<dyn Clock>,
        sweep_interval: Duration,
    ) -> Result<Self> {
        let worker = MaintenanceWorker::spawn("log-retention", Some(sweep_interval), move || {
            cleanup_expired(&dir, retention_days, clock.now());
        })?;
        Ok(Self { worker })
    }

    /// Request a cleanup pass without waiting for it
    pub fn trigger(&self) {
        self.worker.trigger();
    }

    /// Number of cleanup passes completed so far
    pub fn passes_completed(&self) -> usize {
        self.worker.passes_completed()
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_running()
    }

    /// Stop the thread and wait for an in-flight pass to finish
    pub fn shutdown(&self) {
        self.worker.shutdown();
    }
}
