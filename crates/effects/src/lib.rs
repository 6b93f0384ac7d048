//! Time-stepped effect drivers
//!
//! Thin consumers of the visibility/rate-limiting core: each driver is a
//! self-contained mutation loop advanced by the scheduler's frame or timer
//! ticks. They model what visibility callbacks look like in practice
//! (count-up statistics, a typewriter reveal, a section fade-in, a throttled
//! scroll indicator) without any rendering concern: each exposes its current
//! display state and a completion flag.

pub mod counter;
pub mod indicator;
pub mod reveal;
pub mod typewriter;

pub use counter::Counter;
pub use indicator::ScrollIndicator;
pub use reveal::Reveal;
pub use typewriter::Typewriter;
