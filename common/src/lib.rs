//! # hostwatch-common
//!
//! Shared vocabulary for the monitoring engine and its front ends.
//!
//! * [`host`]: host identifier validation.
//! * [`metrics`]: probe outcomes and per-host statistics.
//! * [`event`]: the [`event::EventSink`] contract consumed by front ends.
//! * [`error`]: the error taxonomy shared by every crate.
//! * [`config`]: engine and front end settings.

pub mod config;
pub mod error;
pub mod event;
pub mod host;
pub mod log;
pub mod metrics;
