//! Tokio-backed scheduler for real event loops

use std::cell::Cell;
use std::time::Duration;

use tracing::trace;

use super::{Scheduler, Task, TaskHandle};

/// Schedules tasks with `tokio::task::spawn_local`.
///
/// Tasks are `!Send`, so `schedule` must be called from inside a
/// `tokio::task::LocalSet` (e.g. within `LocalSet::run_until`).
#[derive(Debug, Default)]
pub struct TokioScheduler {
    next_id: Cell<u64>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle::new(self.next_id.get());
        self.next_id.set(handle.id() + 1);

        let token = handle.token().clone();
        let id = handle.id();
        tokio::task::spawn_local(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    trace!(task = id, "cancelled before firing");
                }
                _ = tokio::time::sleep(delay) => {
                    if !token.is_cancelled() {
                        task();
                    }
                }
            }
        });
        handle
    }
}
