//! # hostwatch-core
//!
//! The concurrent host-monitoring engine.
//!
//! * [`network`]: the echo primitive the engine probes through.
//! * [`prober`]: one probe, classified into a [`ProbeResult`](hostwatch_common::metrics::ProbeResult).
//! * [`monitor`]: the probing loop of a single host.
//! * [`registry`]: host membership and the lifecycle of every monitor.
//! * [`hostlist`] and [`persist`]: bulk host input and the CSV layout.

pub mod hostlist;
pub mod monitor;
pub mod network;
pub mod persist;
pub mod prober;
pub mod registry;

pub use monitor::{HostMonitor, StopOutcome};
pub use prober::Prober;
pub use registry::MonitorRegistry;
