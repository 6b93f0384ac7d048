//! Monotonic time sources
//!
//! All timestamps in cadence are `Duration`s measured from an arbitrary epoch
//! chosen at clock construction. Using a relative representation keeps the
//! virtual clock trivially settable in tests and simulations.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// A monotonic time source.
pub trait Clock: Send + Sync {
    /// Current time, measured from the clock's epoch.
    fn now(&self) -> Duration;
}

/// Wall-clock-backed monotonic time (epoch = construction instant).
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Manually advanced clock for deterministic simulation and tests.
///
/// Time starts at zero and only moves when `advance` or `set` is called.
/// Setting time backwards is a no-op: the clock stays monotonic.
pub struct VirtualClock {
    now: Mutex<Duration>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock();
        *now += delta;
    }

    /// Set the clock to an absolute time (ignored if earlier than now).
    pub fn set(&self, to: Duration) {
        let mut now = self.now.lock();
        if to > *now {
            *now = to;
        }
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }
}
