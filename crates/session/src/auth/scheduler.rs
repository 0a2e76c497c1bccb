//! Single-slot timer for background credential refresh

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::debug;

struct Armed {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Owns at most one live refresh task
///
/// Arming aborts whatever was armed before, so two quick logins never leave
/// two timers behind. Each arming gets a generation number the task can use
/// to release its own slot without clobbering a newer one.
#[derive(Default)]
pub struct RefreshScheduler {
    armed: Mutex<Option<Armed>>,
    next_generation: AtomicU64,
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any live task and spawn `task` in its place
    pub fn arm<F, Fut>(&self, task: F) -> u64
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let mut slot = self.lock();
        if let Some(previous) = slot.take() {
            debug!(generation = previous.generation, "replacing refresh timer");
            previous.handle.abort();
        }
        let handle = tokio::spawn(task(generation));
        *slot = Some(Armed { generation, handle });
        generation
    }

    /// Abort the live task, if any
    pub fn cancel(&self) {
        if let Some(armed) = self.lock().take() {
            debug!(generation = armed.generation, "refresh timer cancelled");
            armed.handle.abort();
        }
    }

    /// Forget the slot held by `generation` without aborting it
    ///
    /// Called by the task itself when it finishes on its own.
    pub fn release(&self, generation: u64) {
        let mut slot = self.lock();
        if slot.as_ref().is_some_and(|armed| armed.generation == generation) {
            slot.take();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|armed| !armed.handle.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Option<Armed>> {
        self.armed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
