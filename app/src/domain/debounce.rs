//! Cancellable-timer debouncer for persistence flushes.
//!
//! Rapid successive mutations (a slider drag emits dozens per second) must
//! not each hit the durable store. Every mutation re-arms the timer; only
//! the task scheduled last survives the idle window and runs.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Idle window before a scheduled flush actually runs.
pub const DEFAULT_FLUSH_DELAY: Duration = Duration::from_millis(500);

/// Single-slot cancellable timer.
///
/// `schedule` aborts whatever is pending and arms a fresh timer from now,
/// so within one burst of calls exactly one task executes: the last one.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Arm the timer with `task`, superseding any pending task.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        let mut pending = self.pending.lock().unwrap();
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Drop any pending task without running it.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
