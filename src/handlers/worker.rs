//! Named background thread for file maintenance
//!
//! Runs a task whenever it is triggered and, optionally, on a fixed
//! interval. Requests made while a pass is pending are coalesced into that
//! pass, and passes never overlap. Requests still pending at shutdown run
//! before the thread exits.

use crate::core::error::{LoggerError, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub(crate) struct MaintenanceWorker {
    name: &'static str,
    trigger: Mutex<Option<Sender<()>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
    passes: Arc<AtomicUsize>,
}

impl MaintenanceWorker {
    /// Start the thread; `interval` adds unprompted passes
    pub(crate) fn spawn<F>(name: &'static str, interval: Option<Duration>, mut task: F) -> Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (sender, receiver) = bounded::<()>(1);
        let passes = Arc::new(AtomicUsize::new(0));
        let passes_worker = Arc::clone(&passes);

        let handle = thread::Builder::new()
            .name(name.into())
            .spawn(move || {
                while wait_for_pass(&receiver, interval) {
                    task();
                    passes_worker.fetch_add(1, Ordering::Release);
                }
            })
            .map_err(|e| {
                LoggerError::io_operation(
                    format!("spawn {} thread", name),
                    "Failed to start log maintenance worker",
                    e,
                )
            })?;

        Ok(Self {
            name,
            trigger: Mutex::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
            passes,
        })
    }

    /// Request a pass without waiting for it
    pub(crate) fn trigger(&self) {
        if let Some(ref sender) = *self.trigger.lock() {
            match sender.try_send(()) {
                // A pass is already pending
                Ok(()) | Err(TrySendError::Full(())) => {}
                Err(TrySendError::Disconnected(())) => {
                    eprintln!("[LOGGER ERROR] {} worker is no longer running", self.name);
                }
            }
        }
    }

    pub(crate) fn passes_completed(&self) -> usize {
        self.passes.load(Ordering::Acquire)
    }

    pub(crate) fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the thread after any pending pass and join it
    pub(crate) fn shutdown(&self) {
        drop(self.trigger.lock().take());
        if let Some(handle) = self.handle.lock().take() {
            if let Err(e) = handle.join() {
                eprintln!("[LOGGER ERROR] {} worker panicked: {:?}", self.name, e);
            }
        }
    }
}

/// Block until the next pass is due; false once the sender is gone
fn wait_for_pass(receiver: &Receiver<()>, interval: Option<Duration>) -> bool {
    match interval {
        Some(interval) => match receiver.recv_timeout(interval) {
            Ok(()) | Err(RecvTimeoutError::Timeout) => true,
            Err(RecvTimeoutError::Disconnected) => false,
        },
        None => receiver.recv().is_ok(),
    }
}

impl Drop for MaintenanceWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for MaintenanceWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaintenanceWorker")
            .field("name", &self.name)
            .field("passes_completed", &self.passes_completed())
            .field("running", &self.is_running())
            .finish()
    }
}
