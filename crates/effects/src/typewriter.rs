//! Character-by-character text reveal
//!
//! Reveals a string one character per tick. A cursor flag is set for the
//! duration of the animation and cleared at completion. The first character
//! appears synchronously when the animation starts; the rest follow on the
//! timer.

use cadence_core::Scheduler;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

struct TypeState {
    chars: Vec<char>,
    shown: String,
    cursor: bool,
    done: bool,
    started: bool,
}

impl TypeState {
    /// Reveal the next character; true when the full text is shown.
    fn step(&mut self) -> bool {
        if let Some(&c) = self.chars.get(self.shown.chars().count()) {
            self.shown.push(c);
        }
        if self.shown.chars().count() >= self.chars.len() {
            self.done = true;
            self.cursor = false;
            true
        } else {
            false
        }
    }
}

/// One typewriter animation. Clone to share the readable side.
#[derive(Clone)]
pub struct Typewriter {
    state: Arc<Mutex<TypeState>>,
}

impl Typewriter {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let done = chars.is_empty();
        Self {
            state: Arc::new(Mutex::new(TypeState {
                chars,
                shown: String::new(),
                cursor: false,
                done,
                started: false,
            })),
        }
    }

    /// Begin typing: first character now, one more per `char_interval`.
    /// Repeated calls are no-ops.
    pub fn start(&self, sched: &Scheduler, char_interval: Duration) {
        let finished = {
            let mut state = self.state.lock();
            if state.started || state.done {
                return;
            }
            state.started = true;
            state.cursor = true;
            state.step()
        };

        debug!("typewriter started");
        if !finished {
            schedule_tick(sched, self.state.clone(), char_interval);
        }
    }

    /// Text revealed so far.
    pub fn shown(&self) -> String {
        self.state.lock().shown.clone()
    }

    pub fn cursor_visible(&self) -> bool {
        self.state.lock().cursor
    }

    pub fn is_done(&self) -> bool {
        self.state.lock().done
    }
}

fn schedule_tick(sched: &Scheduler, state: Arc<Mutex<TypeState>>, interval: Duration) {
    let sched2 = sched.clone();
    sched.schedule(interval, move || {
        let finished = state.lock().step();
        if !finished {
            schedule_tick(&sched2, state, interval);
        }
    });
}
