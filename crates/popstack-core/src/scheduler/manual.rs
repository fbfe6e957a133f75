//! Virtual-clock scheduler

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use super::{Scheduler, Task, TaskHandle};

struct Scheduled {
    due: Duration,
    handle: TaskHandle,
    task: Task,
}

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_id: u64,
    queue: Vec<Scheduled>,
}

/// Scheduler driven by explicit [`ManualScheduler::advance`] calls.
/// Clones share the same clock.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ClockState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Tasks still waiting to run
    pub fn pending(&self) -> usize {
        self.state
            .borrow()
            .queue
            .iter()
            .filter(|s| !s.handle.is_cancelled())
            .count()
    }

    /// Move the clock forward, running every task that falls due in order of
    /// due time then scheduling order. Tasks scheduled by running tasks are
    /// honored within the same call. Returns how many tasks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;

        while let Some(next) = self.pop_due(target) {
            trace!(task = next.handle.id(), due_ms = next.due.as_millis() as u64, "run");
            (next.task)();
            ran += 1;
        }

        self.state.borrow_mut().now = target;
        ran
    }

    fn pop_due(&self, target: Duration) -> Option<Scheduled> {
        let mut state = self.state.borrow_mut();
        state.queue.retain(|s| !s.handle.is_cancelled());

        let index = state
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= target)
            .min_by_key(|(_, s)| (s.due, s.handle.id()))
            .map(|(i, _)| i)?;

        let next = state.queue.remove(index);
        state.now = next.due;
        Some(next)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let mut state = self.state.borrow_mut();
        let handle = TaskHandle::new(state.next_id);
        state.next_id += 1;

        let due = state.now + delay;
        state.queue.push(Scheduled {
            due,
            handle: handle.clone(),
            task,
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn log_task(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> Task {
        let log = Rc::clone(log);
        Box::new(move || log.borrow_mut().push(name))
    }

    #[test]
    fn test_runs_only_due_tasks() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.schedule(Duration::from_millis(5), log_task(&log, "late"));
        scheduler.schedule(Duration::from_millis(1), log_task(&log, "early"));

        assert_eq!(scheduler.advance(Duration::from_millis(2)), 1);
        assert_eq!(*log.borrow(), vec!["early"]);
        assert_eq!(scheduler.pending(), 1);

        assert_eq!(scheduler.advance(Duration::from_millis(3)), 1);
        assert_eq!(*log.borrow(), vec!["early", "late"]);
        assert_eq!(scheduler.now(), Duration::from_millis(5));
    }

    #[test]
    fn test_cancelled_task_never_runs() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let handle = scheduler.schedule(Duration::from_millis(1), log_task(&log, "cancelled"));

        handle.cancel();
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.advance(Duration::from_millis(10)), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_tasks_scheduled_while_running_are_honored() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let chained = scheduler.clone();
        let chained_log = Rc::clone(&log);
        scheduler.schedule(
            Duration::from_millis(1),
            Box::new(move || {
                chained_log.borrow_mut().push("first");
                chained.schedule(Duration::from_millis(1), log_task(&chained_log, "second"));
            }),
        );

        assert_eq!(scheduler.advance(Duration::from_millis(2)), 2);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_same_due_time_runs_in_schedule_order() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.schedule(Duration::from_millis(1), log_task(&log, "a"));
        scheduler.schedule(Duration::from_millis(1), log_task(&log, "b"));

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }
}
