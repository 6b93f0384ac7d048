//! Throttle / debounce wrapper implementation

use cadence_core::{Scheduler, TimerHandle};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::trace;

/// Rate-limiting policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Leading-edge: fire immediately, then drop calls for one interval.
    Throttle,
    /// Trailing-edge: fire once, `interval` after the last call in a burst.
    Debounce,
}

/// Factory for rate-limited callbacks.
pub struct RateLimiter;

impl RateLimiter {
    /// Wrap `callback` so invocations are rate-limited per `mode`.
    ///
    /// The returned [`Limited`] is the only handle to the wrapped callback;
    /// dropping it cancels any pending timer.
    pub fn wrap<T: Send + 'static>(
        sched: &Scheduler,
        callback: impl FnMut(T) + Send + 'static,
        interval: Duration,
        mode: Mode,
    ) -> Limited<T> {
        Limited {
            inner: Arc::new(Mutex::new(Inner {
                callback: Box::new(callback),
                in_cooldown: false,
                pending: None,
                last_args: None,
            })),
            sched: sched.clone(),
            interval,
            mode,
        }
    }
}

struct Inner<T> {
    callback: Box<dyn FnMut(T) + Send>,
    /// Throttle: true while calls are being dropped.
    in_cooldown: bool,
    /// The single live timer (cooldown clear or debounce fire).
    pending: Option<TimerHandle>,
    /// Debounce: arguments of the most recent call in the burst.
    last_args: Option<T>,
}

/// A rate-limited callback.
///
/// The wrapped callback runs on the event loop's thread and must not
/// re-invoke its own `Limited` (the state lock is held across the call).
pub struct Limited<T> {
    inner: Arc<Mutex<Inner<T>>>,
    sched: Scheduler,
    interval: Duration,
    mode: Mode,
}

impl<T: Send + 'static> Limited<T> {
    /// Deliver one call to the wrapped callback, subject to rate limiting.
    pub fn invoke(&self, args: T) {
        match self.mode {
            Mode::Throttle => self.invoke_throttle(args),
            Mode::Debounce => self.invoke_debounce(args),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True if a timer is currently pending for this wrapper.
    pub fn has_pending_timer(&self) -> bool {
        self.inner.lock().pending.is_some()
    }

    fn invoke_throttle(&self, args: T) {
        let mut inner = self.inner.lock();
        if inner.in_cooldown {
            trace!("throttled call dropped");
            return;
        }

        (inner.callback)(args);
        inner.in_cooldown = true;

        let weak: Weak<Mutex<Inner<T>>> = Arc::downgrade(&self.inner);
        let handle = self.sched.schedule(self.interval, move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.lock();
                inner.in_cooldown = false;
                inner.pending = None;
            }
        });
        inner.pending = Some(handle);
    }

    fn invoke_debounce(&self, args: T) {
        let mut inner = self.inner.lock();
        if let Some(handle) = inner.pending.take() {
            self.sched.cancel(&handle);
        }
        inner.last_args = Some(args);

        let weak: Weak<Mutex<Inner<T>>> = Arc::downgrade(&self.inner);
        let handle = self.sched.schedule(self.interval, move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.lock();
                inner.pending = None;
                if let Some(args) = inner.last_args.take() {
                    (inner.callback)(args);
                }
            }
        });
        inner.pending = Some(handle);
    }
}

impl<T> Drop for Limited<T> {
    fn drop(&mut self) {
        // A pending timer must not fire into a torn-down consumer.
        if let Some(handle) = self.inner.lock().pending.take() {
            self.sched.cancel(&handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::EventLoop;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Calls at t=0,5,15,25 with a 20ms interval: exactly two invocations,
    /// the t=0 call and the first call arriving after cooldown end (t=25).
    #[test]
    fn test_throttle_burst_fires_twice() {
        let ev = EventLoop::new_virtual();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let c = calls.clone();
        let limited = RateLimiter::wrap(
            &ev.scheduler(),
            move |n: u32| c.lock().push(n),
            ms(20),
            Mode::Throttle,
        );

        limited.invoke(0);
        ev.advance(ms(5)).unwrap();
        limited.invoke(1);
        ev.advance(ms(10)).unwrap();
        limited.invoke(2);
        ev.advance(ms(10)).unwrap();
        limited.invoke(3);
        ev.advance(ms(40)).unwrap();

        assert_eq!(*calls.lock(), vec![0, 3]);
    }

    #[test]
    fn test_throttle_leading_edge_is_synchronous() {
        let ev = EventLoop::new_virtual();
        let calls = Arc::new(Mutex::new(0u32));
        let c = calls.clone();
        let limited = RateLimiter::wrap(
            &ev.scheduler(),
            move |_: ()| *c.lock() += 1,
            ms(20),
            Mode::Throttle,
        );

        limited.invoke(());
        // No loop turn yet: leading edge already fired.
        assert_eq!(*calls.lock(), 1);
    }

    /// Calls at t=0,5,10 with a 15ms interval: one invocation at t=25 with
    /// the last call's arguments.
    #[test]
    fn test_debounce_burst_fires_once_with_last_args() {
        let ev = EventLoop::new_virtual();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let c = calls.clone();
        let limited = RateLimiter::wrap(
            &ev.scheduler(),
            move |n: u32| c.lock().push(n),
            ms(15),
            Mode::Debounce,
        );

        limited.invoke(0);
        ev.advance(ms(5)).unwrap();
        limited.invoke(1);
        ev.advance(ms(5)).unwrap();
        limited.invoke(2);

        // Nothing yet: quiet period has not elapsed.
        ev.advance(ms(14)).unwrap();
        assert!(calls.lock().is_empty());

        ev.advance(ms(1)).unwrap();
        assert_eq!(*calls.lock(), vec![2]);
    }

    #[test]
    fn test_debounce_fires_again_after_separate_burst() {
        let ev = EventLoop::new_virtual();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let c = calls.clone();
        let limited = RateLimiter::wrap(
            &ev.scheduler(),
            move |n: u32| c.lock().push(n),
            ms(10),
            Mode::Debounce,
        );

        limited.invoke(1);
        ev.advance(ms(10)).unwrap();
        limited.invoke(2);
        ev.advance(ms(10)).unwrap();

        assert_eq!(*calls.lock(), vec![1, 2]);
    }

    #[test]
    fn test_at_most_one_timer_live_per_wrapper() {
        let ev = EventLoop::new_virtual();
        let sched = ev.scheduler();
        let limited = RateLimiter::wrap(&sched, move |_: ()| {}, ms(10), Mode::Debounce);

        for _ in 0..5 {
            limited.invoke(());
        }
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn test_drop_cancels_pending_debounce() {
        let ev = EventLoop::new_virtual();
        let sched = ev.scheduler();
        let calls = Arc::new(Mutex::new(0u32));
        let c = calls.clone();
        let limited = RateLimiter::wrap(&sched, move |_: ()| *c.lock() += 1, ms(10), Mode::Debounce);

        limited.invoke(());
        assert_eq!(sched.pending(), 1);
        drop(limited);
        assert_eq!(sched.pending(), 0);

        ev.advance(ms(50)).unwrap();
        assert_eq!(*calls.lock(), 0);
    }

    #[test]
    fn test_throttle_recovers_after_cooldown() {
        let ev = EventLoop::new_virtual();
        let calls = Arc::new(Mutex::new(0u32));
        let c = calls.clone();
        let limited = RateLimiter::wrap(
            &ev.scheduler(),
            move |_: ()| *c.lock() += 1,
            ms(16),
            Mode::Throttle,
        );

        // Scroll-like stream: one call per 4ms for 100ms.
        for _ in 0..25 {
            limited.invoke(());
            ev.advance(ms(4)).unwrap();
        }

        // 16ms cooldown over a 100ms stream: at most one fire per window.
        let fired = *calls.lock();
        assert!(fired >= 5 && fired <= 7, "fired {} times", fired);
    }
}
