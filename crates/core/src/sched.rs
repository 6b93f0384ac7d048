//! Cancellable one-shot timers
//!
//! The scheduler is the host capability rate limiters and effect drivers are
//! built against: `schedule(delay, task)` returns a handle, `cancel(&handle)`
//! guarantees the task never runs. Firing happens on the event loop's thread
//! only; cancellation is safe from any thread.

use crate::clock::Clock;
use dashmap::DashMap;
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a scheduled timer, used for cancellation.
///
/// Dropping the handle does NOT cancel the timer; call
/// [`Scheduler::cancel`] explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    id: u64,
}

/// Deadline-ordered timer queue shared between loop and callers.
///
/// Cheap to clone; all clones refer to the same queue.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    clock: Arc<dyn Clock>,
    /// Keyed by (deadline, sequence) so same-deadline timers fire in
    /// scheduling order.
    timers: Mutex<BTreeMap<(Duration, u64), Task>>,
    /// Timer id -> queue key, for O(log n) cancellation.
    index: DashMap<u64, (Duration, u64)>,
    next_id: AtomicU64,
}

impl Scheduler {
    pub(crate) fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                clock,
                timers: Mutex::new(BTreeMap::new()),
                index: DashMap::new(),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Current time on the loop's clock.
    pub fn now(&self) -> Duration {
        self.inner.clock.now()
    }

    /// Schedule `task` to run once, `delay` from now.
    pub fn schedule(&self, delay: Duration, task: impl FnOnce() + Send + 'static) -> TimerHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let deadline = self.inner.clock.now() + delay;
        let key = (deadline, id);

        self.inner.timers.lock().insert(key, Box::new(task));
        self.inner.index.insert(id, key);

        trace!(timer = id, ?deadline, "scheduled timer");
        TimerHandle { id }
    }

    /// Cancel a pending timer.
    ///
    /// A cancelled timer never fires. Cancelling a timer that already fired
    /// (or was already cancelled) is a no-op.
    pub fn cancel(&self, handle: &TimerHandle) {
        if let Some((_, key)) = self.inner.index.remove(&handle.id) {
            self.inner.timers.lock().remove(&key);
            trace!(timer = handle.id, "cancelled timer");
        }
    }

    /// True if the timer is still pending.
    pub fn is_pending(&self, handle: &TimerHandle) -> bool {
        self.inner.index.contains_key(&handle.id)
    }

    /// Number of pending timers.
    pub fn pending(&self) -> usize {
        self.inner.timers.lock().len()
    }

    /// Earliest pending deadline, if any.
    pub(crate) fn next_deadline(&self) -> Option<Duration> {
        self.inner
            .timers
            .lock()
            .keys()
            .next()
            .map(|(deadline, _)| *deadline)
    }

    /// Remove every timer due at or before `now`, in deadline order.
    ///
    /// Tasks are returned rather than run so the caller can release the
    /// queue lock before executing them (a firing task may schedule again).
    pub(crate) fn take_due(&self, now: Duration) -> SmallVec<[Task; 4]> {
        let mut due = SmallVec::new();
        let mut timers = self.inner.timers.lock();

        loop {
            let key = match timers.first_key_value() {
                Some((key, _)) if key.0 <= now => *key,
                _ => break,
            };
            if let Some(task) = timers.remove(&key) {
                self.inner.index.remove(&key.1);
                due.push(task);
            }
        }

        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::VirtualClock;
    use parking_lot::Mutex as PlMutex;

    fn scheduler() -> (Scheduler, Arc<VirtualClock>) {
        let clock = Arc::new(VirtualClock::new());
        (Scheduler::new(clock.clone()), clock)
    }

    #[test]
    fn test_timer_fires_after_deadline() {
        let (sched, clock) = scheduler();
        let fired = Arc::new(PlMutex::new(false));
        let fired2 = fired.clone();

        sched.schedule(Duration::from_millis(10), move || *fired2.lock() = true);

        clock.advance(Duration::from_millis(5));
        assert!(sched.take_due(clock.now()).is_empty());

        clock.advance(Duration::from_millis(5));
        for task in sched.take_due(clock.now()) {
            task();
        }
        assert!(*fired.lock());
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let (sched, clock) = scheduler();
        let fired = Arc::new(PlMutex::new(false));
        let fired2 = fired.clone();

        let handle = sched.schedule(Duration::from_millis(10), move || *fired2.lock() = true);
        assert!(sched.is_pending(&handle));

        sched.cancel(&handle);
        assert!(!sched.is_pending(&handle));

        clock.advance(Duration::from_millis(20));
        for task in sched.take_due(clock.now()) {
            task();
        }
        assert!(!*fired.lock());
    }

    #[test]
    fn test_same_deadline_fires_in_scheduling_order() {
        let (sched, clock) = scheduler();
        let order = Arc::new(PlMutex::new(Vec::new()));

        for n in 0..3 {
            let order = order.clone();
            sched.schedule(Duration::from_millis(10), move || order.lock().push(n));
        }

        clock.advance(Duration::from_millis(10));
        for task in sched.take_due(clock.now()) {
            task();
        }
        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let (sched, clock) = scheduler();
        let handle = sched.schedule(Duration::from_millis(1), || {});

        clock.advance(Duration::from_millis(1));
        let due = sched.take_due(clock.now());
        assert_eq!(due.len(), 1);

        // Already fired; cancel must not disturb anything.
        sched.cancel(&handle);
        assert_eq!(sched.pending(), 0);
    }
}
