//! The boundary between the monitoring engine and whatever displays it.

use chrono::{DateTime, Local};

use crate::error::ProbeErrorKind;
use crate::metrics::HostMetrics;

/// Receives every event the engine produces.
///
/// Implementations are called concurrently from one task per monitored host,
/// so events of different hosts interleave freely. Events of a single host
/// arrive in probe order. Methods must return quickly; the calling monitor
/// does not probe again until they do.
pub trait EventSink: Send + Sync {
    /// A fresh metrics snapshot after a probe cycle.
    fn on_metrics_update(&self, host: &str, metrics: HostMetrics);

    /// A probe cycle failed. Always preceded by the matching metrics update.
    fn on_probe_error(&self, host: &str, kind: &ProbeErrorKind, message: &str);

    /// A human-readable status line.
    fn on_status(&self, message: &str, at: DateTime<Local>);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_metrics_update(&self, _host: &str, _metrics: HostMetrics) {}

    fn on_probe_error(&self, _host: &str, _kind: &ProbeErrorKind, _message: &str) {}

    fn on_status(&self, _message: &str, _at: DateTime<Local>) {}
}
