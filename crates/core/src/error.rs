//! Error types for the host substrate

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The event loop's task queue has been torn down.
    #[error("event loop is closed")]
    LoopClosed,

    /// Virtual-time operation invoked on a loop driven by the system clock.
    #[error("event loop is not driven by a virtual clock")]
    NotVirtual,
}
