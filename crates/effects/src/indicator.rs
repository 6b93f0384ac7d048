//! Scroll indicator opacity toggle
//!
//! The "scroll down" hint at the top of a page: fully visible near the top,
//! hidden once the user has scrolled past a pixel threshold. Scroll streams
//! arrive at event rate, so the toggle runs behind a throttled wrapper
//! (16ms, one frame).
//!
//! This is a repeatable, throttled handler with one well-defined behavior;
//! scrolling back up restores the indicator.

use cadence_core::Scheduler;
use cadence_limiter::{Limited, Mode, RateLimiter};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Default hide threshold, in scroll pixels.
pub const DEFAULT_HIDE_AFTER: f64 = 100.0;

/// Default throttle interval (one 60Hz frame).
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(16);

pub struct ScrollIndicator {
    visible: Arc<Mutex<bool>>,
    limited: Limited<f64>,
}

impl ScrollIndicator {
    pub fn new(sched: &Scheduler) -> Self {
        Self::with_params(sched, DEFAULT_HIDE_AFTER, DEFAULT_THROTTLE)
    }

    pub fn with_params(sched: &Scheduler, hide_after: f64, throttle: Duration) -> Self {
        let visible = Arc::new(Mutex::new(true));
        let v = visible.clone();
        let limited = RateLimiter::wrap(
            sched,
            move |scroll_y: f64| {
                *v.lock() = scroll_y <= hide_after;
            },
            throttle,
            Mode::Throttle,
        );
        Self { visible, limited }
    }

    /// Feed one scroll sample (rate-limited internally).
    pub fn on_scroll(&self, scroll_y: f64) {
        self.limited.invoke(scroll_y);
    }

    pub fn opacity(&self) -> f64 {
        if *self.visible.lock() {
            1.0
        } else {
            0.0
        }
    }

    pub fn is_visible(&self) -> bool {
        *self.visible.lock()
    }
}
