//! Visibility-triggered dispatch
//!
//! This crate provides the two halves of "run a callback when an element
//! scrolls into view":
//!
//! - [`Viewport`]: the host-side visibility signal. Holds element rectangles
//!   in document coordinates plus a scroll offset, and reports
//!   threshold-crossing events as the offset moves.
//! - [`VisibilityTrigger`]: the dispatch policy. A registry of per-element
//!   callbacks with one-shot or repeatable semantics, fed crossing events
//!   produced by the viewport.
//!
//! The split keeps the trigger purely an in-memory event-dispatch policy:
//! it owns no geometry, only a lookup relation from element identity to
//! callback state.

pub mod geometry;
pub mod trigger;
pub mod viewport;

pub use geometry::{Margin, Rect};
pub use trigger::{RegisterOptions, SubscriptionId, VisibilityTrigger};
pub use viewport::{Crossing, ElementId, Viewport};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObserveError {
    /// Root margin string could not be parsed (px-only, 1/2/4 values).
    #[error("invalid root margin {0:?}: {1}")]
    InvalidMargin(String, &'static str),
}
