//! Probe outcomes and the per-host statistics folded from them.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::error::ProbeErrorKind;

/// The outcome of one probe attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub succeeded: bool,
    pub round_trip_time: Option<Duration>,
    pub error: Option<ProbeErrorKind>,
}

impl ProbeResult {
    pub fn success(round_trip_time: Duration) -> Self {
        Self {
            succeeded: true,
            round_trip_time: Some(round_trip_time),
            error: None,
        }
    }

    pub fn failure(kind: ProbeErrorKind) -> Self {
        Self {
            succeeded: false,
            round_trip_time: None,
            error: Some(kind),
        }
    }
}

/// Delivery outcomes of the most recent `capacity` probes.
///
/// A capacity of one reproduces per-cycle semantics: the percentages are the
/// binary 100/0 outcome of the latest probe.
#[derive(Debug, Clone)]
pub struct MetricsWindow {
    outcomes: VecDeque<bool>,
    capacity: usize,
}

impl MetricsWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            outcomes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, delivered: bool) {
        if self.outcomes.len() == self.capacity {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(delivered);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Percentage of delivered probes in the window, rounded to two decimals.
    pub fn delivered_pct(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        let delivered = self.outcomes.iter().filter(|ok| **ok).count();
        round2(delivered as f64 * 100.0 / self.outcomes.len() as f64)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Accumulated statistics for one host.
///
/// Only the monitor owning the host mutates a `HostMetrics`; everybody else
/// receives clones.
#[derive(Debug, Clone, PartialEq)]
pub struct HostMetrics {
    pub host: String,
    pub last_rtt: Option<Duration>,
    pub delivered_pct: f64,
    pub loss_pct: f64,
    pub last_probe_at: Option<DateTime<Local>>,
    pub probes_sent: u64,
    pub probes_received: u64,
}

impl HostMetrics {
    /// Metrics of a host that has not been probed yet.
    pub fn unknown(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            last_rtt: None,
            delivered_pct: 0.0,
            loss_pct: 0.0,
            last_probe_at: None,
            probes_sent: 0,
            probes_received: 0,
        }
    }

    pub fn has_completed_probe(&self) -> bool {
        self.last_probe_at.is_some()
    }

    /// Folds one probe outcome into the metrics.
    ///
    /// `delivered_pct + loss_pct == 100` holds after every fold.
    pub fn fold(&mut self, result: &ProbeResult, window: &mut MetricsWindow, at: DateTime<Local>) {
        window.record(result.succeeded);
        self.probes_sent += 1;

        if result.succeeded {
            self.probes_received += 1;
            self.last_rtt = result.round_trip_time;
        } else {
            self.last_rtt = None;
        }

        self.delivered_pct = window.delivered_pct();
        self.loss_pct = round2(100.0 - self.delivered_pct);
        self.last_probe_at = Some(at);
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
