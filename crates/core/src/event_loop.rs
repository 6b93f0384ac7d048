//! Single-consumer event loop
//!
//! One thread drains one queue: posted tasks run in delivery order, due
//! timers run in deadline order, and nothing runs in parallel with anything
//! else. Suspension happens only between callbacks, never inside one.
//!
//! Two driving modes:
//! - Virtual time (`new_virtual` + `advance`): deterministic, used by the
//!   demo simulation and by tests. `advance` steps the clock deadline by
//!   deadline so cascading timers (a firing timer scheduling another) observe
//!   intermediate "now" values.
//! - System time (`new` + `run_for`): blocks on the task queue with a
//!   timeout derived from the next timer deadline.

use crate::clock::{Clock, SystemClock, VirtualClock};
use crate::error::CoreError;
use crate::sched::{Scheduler, Task};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// The event loop. Owns the receiving end of the task queue.
pub struct EventLoop {
    sched: Scheduler,
    clock: Arc<dyn Clock>,
    virtual_clock: Option<Arc<VirtualClock>>,
    tx: Sender<Task>,
    rx: Receiver<Task>,
}

/// Cloneable posting handle for the loop's task queue.
#[derive(Clone)]
pub struct LoopHandle {
    tx: Sender<Task>,
}

impl LoopHandle {
    /// Enqueue a task. Tasks run in delivery order on the loop's thread.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) -> Result<(), CoreError> {
        self.tx
            .send(Box::new(task))
            .map_err(|_| CoreError::LoopClosed)
    }
}

impl EventLoop {
    /// Loop driven by wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()), None)
    }

    /// Loop driven by a manually advanced clock (simulation / tests).
    pub fn new_virtual() -> Self {
        let clock = Arc::new(VirtualClock::new());
        Self::with_clock(clock.clone(), Some(clock))
    }

    fn with_clock(clock: Arc<dyn Clock>, virtual_clock: Option<Arc<VirtualClock>>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            sched: Scheduler::new(clock.clone()),
            clock,
            virtual_clock,
            tx,
            rx,
        }
    }

    /// Timer scheduler bound to this loop's clock.
    pub fn scheduler(&self) -> Scheduler {
        self.sched.clone()
    }

    /// Posting handle for this loop's queue.
    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            tx: self.tx.clone(),
        }
    }

    /// Current time on the loop's clock.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Drain posted tasks, then run timers due at the current time.
    pub fn turn(&self) {
        self.drain_tasks();
        self.fire_due();
        self.drain_tasks();
    }

    /// Advance virtual time by `by`, running everything that comes due.
    ///
    /// The clock is stepped to each timer deadline in order, so a timer that
    /// reschedules itself every 16ms fires the right number of times across
    /// a single large `advance`. Fails on a system-clock loop.
    pub fn advance(&self, by: Duration) -> Result<(), CoreError> {
        let vclock = self
            .virtual_clock
            .as_ref()
            .ok_or(CoreError::NotVirtual)?;
        let target = vclock.now() + by;

        loop {
            self.drain_tasks();
            match self.sched.next_deadline() {
                Some(deadline) if deadline <= target => {
                    vclock.set(deadline);
                    self.fire_due();
                }
                _ => break,
            }
        }

        vclock.set(target);
        self.drain_tasks();
        Ok(())
    }

    /// Run on system time for roughly `duration`, sleeping between events.
    pub fn run_for(&self, duration: Duration) {
        let end = self.clock.now() + duration;
        debug!(?duration, "running event loop");

        loop {
            self.fire_due();

            let now = self.clock.now();
            if now >= end {
                break;
            }

            let until_end = end - now;
            let wait = match self.sched.next_deadline() {
                Some(deadline) => deadline.saturating_sub(now).min(until_end),
                None => until_end,
            };

            match self.rx.recv_timeout(wait) {
                Ok(task) => task(),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        self.drain_tasks();
        self.fire_due();
    }

    fn drain_tasks(&self) {
        while let Ok(task) = self.rx.try_recv() {
            task();
        }
    }

    fn fire_due(&self) {
        // Lock is released before tasks run; a firing task may schedule.
        loop {
            let due = self.sched.take_due(self.clock.now());
            if due.is_empty() {
                break;
            }
            for task in due {
                task();
            }
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}
