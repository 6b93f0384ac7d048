//! Library side of the cadence demo binary
//!
//! Exposes the configuration model, the simulated page layout, and the
//! scripted scroll simulation so integration tests can drive a full run
//! in-process.

pub mod config;
pub mod page;
pub mod sim;
