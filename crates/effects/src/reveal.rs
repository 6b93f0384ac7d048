//! One-shot reveal state
//!
//! Models the fade-in pattern: an element starts hidden and offset, and a
//! single visibility callback flips it to its resting state. The transition
//! itself is the host's concern; this driver only tracks the state and how
//! many times it was triggered (repeatable registrations re-reveal).

use parking_lot::Mutex;
use std::sync::Arc;

struct RevealState {
    revealed: bool,
    opacity: f64,
    offset_y: f64,
    times: u32,
}

/// Reveal-on-visibility state for one element. Clone to share.
#[derive(Clone)]
pub struct Reveal {
    state: Arc<Mutex<RevealState>>,
}

impl Reveal {
    /// Hidden, shifted down by `offset_y` pixels.
    pub fn hidden(offset_y: f64) -> Self {
        Self {
            state: Arc::new(Mutex::new(RevealState {
                revealed: false,
                opacity: 0.0,
                offset_y,
                times: 0,
            })),
        }
    }

    /// Flip to the resting state. Idempotent for the visible state; the
    /// trigger count still increments on every call.
    pub fn reveal(&self) {
        let mut state = self.state.lock();
        state.revealed = true;
        state.opacity = 1.0;
        state.offset_y = 0.0;
        state.times += 1;
    }

    pub fn is_revealed(&self) -> bool {
        self.state.lock().revealed
    }

    pub fn opacity(&self) -> f64 {
        self.state.lock().opacity
    }

    pub fn offset_y(&self) -> f64 {
        self.state.lock().offset_y
    }

    /// Number of times `reveal` ran (2+ indicates a repeatable registration).
    pub fn times(&self) -> u32 {
        self.state.lock().times
    }
}
