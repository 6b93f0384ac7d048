//! Count-up number animation
//!
//! Steps a displayed integer toward a target in `target / steps` increments
//! per frame tick. Intermediate values display as the ceiling of the running
//! total; the final frame snaps to the exact target.

use cadence_core::Scheduler;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

struct CounterState {
    current: f64,
    target: u64,
    display: u64,
    done: bool,
    started: bool,
}

/// One animated counter. Clone to share the readable side.
#[derive(Clone)]
pub struct Counter {
    state: Arc<Mutex<CounterState>>,
}

impl Counter {
    pub fn new(target: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(CounterState {
                current: 0.0,
                target,
                display: 0,
                done: target == 0,
                started: false,
            })),
        }
    }

    /// Begin the animation: one increment per `frame`, `steps` increments to
    /// reach the target. Calling `start` again while running is a no-op, so
    /// a repeated visibility callback cannot double-drive the loop.
    pub fn start(&self, sched: &Scheduler, frame: Duration, steps: u32) {
        let increment = {
            let mut state = self.state.lock();
            if state.started || state.done {
                return;
            }
            state.started = true;
            state.target as f64 / steps.max(1) as f64
        };

        debug!(to = self.target(), "counter animation started");
        schedule_tick(sched, self.state.clone(), frame, increment);
    }

    pub fn display(&self) -> u64 {
        self.state.lock().display
    }

    pub fn target(&self) -> u64 {
        self.state.lock().target
    }

    pub fn is_done(&self) -> bool {
        self.state.lock().done
    }
}

fn schedule_tick(
    sched: &Scheduler,
    state: Arc<Mutex<CounterState>>,
    frame: Duration,
    increment: f64,
) {
    let sched2 = sched.clone();
    sched.schedule(frame, move || {
        let finished = {
            let mut state = state.lock();
            state.current += increment;
            if state.current < state.target as f64 {
                state.display = state.current.ceil() as u64;
                false
            } else {
                state.display = state.target;
                state.done = true;
                true
            }
        };
        if !finished {
            schedule_tick(&sched2, state, frame, increment);
        }
    });
}
