//! Deferred, cancellable tasks
//!
//! The background binding needs exactly one timing primitive: run this
//! closure after a delay unless cancelled first. Two implementations:
//! - `ManualScheduler` - virtual clock advanced by hand (tests, scripted runs)
//! - `TokioScheduler` - `spawn_local` + `tokio::time::sleep`, needs a `LocalSet`

mod manual;
mod local;

use std::time::Duration;

use tokio_util::sync::CancellationToken;

pub use self::manual::ManualScheduler;
pub use self::local::TokioScheduler;

/// A unit of deferred work
pub type Task = Box<dyn FnOnce()>;

/// Schedules tasks on the cooperative task queue
pub trait Scheduler {
    /// Run `task` once `delay` has elapsed, unless the returned handle is
    /// cancelled first
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

/// Cancellation handle for a scheduled task
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: u64,
    token: CancellationToken,
}

impl TaskHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self {
            id,
            token: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Prevent the task from running. No effect once it has run.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }
}
