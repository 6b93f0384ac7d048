//! Rate-limited callback wrapping
//!
//! Wraps a callback so it executes at most once per fixed interval
//! (throttle) or only after a quiet period (debounce). Built for continuous
//! high-frequency event streams (scroll, resize) where most deliveries are
//! redundant.
//!
//! - Throttle is leading-edge: the first call in a burst fires synchronously,
//!   calls arriving during the cooldown are dropped, not queued. Trailing
//!   calls are lost by design.
//! - Debounce is trailing-edge: each call cancels the pending timer and
//!   reschedules; the callback fires once, `interval` after the burst ends,
//!   with the LAST call's arguments.
//!
//! At most one timer is live per wrapped callback, and dropping the wrapper
//! cancels it, so a torn-down consumer is never called into.

mod limited;

pub use limited::{Limited, Mode, RateLimiter};
