//! Host substrate for cadence
//!
//! This crate provides the single-threaded, cooperative scheduling layer the
//! rest of the workspace is built on:
//! - Monotonic clocks (system and virtual)
//! - Cancellable one-shot timers
//! - A single-consumer event loop (posted tasks + deadline-ordered timers)
//!
//! Everything downstream (rate limiting, visibility dispatch, effect drivers)
//! is a plain callback registered against this substrate. There is no async
//! runtime: callbacks run to completion, one at a time, on the loop's thread.

pub mod clock;
pub mod error;
pub mod event_loop;
pub mod sched;

pub use clock::{Clock, SystemClock, VirtualClock};
pub use error::CoreError;
pub use event_loop::{EventLoop, LoopHandle};
pub use sched::{Scheduler, Task, TimerHandle};
