//! The terminal's [`EventSink`]: status lines through `tracing`, reachability
//! on the spinner.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local};
use hostwatch_common::error::ProbeErrorKind;
use hostwatch_common::event::EventSink;
use hostwatch_common::metrics::HostMetrics;
use hostwatch_common::{info, success, warn};

use crate::terminal::spinner;

#[derive(Debug, Default, Clone, Copy)]
struct Reachability {
    replying: bool,
    /// Outcome of the probe before the latest one; `None` until two probes ran.
    previous: Option<bool>,
}

#[derive(Default)]
pub struct TerminalSink {
    hosts: Mutex<HashMap<String, Reachability>>,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn hosts(&self) -> MutexGuard<'_, HashMap<String, Reachability>> {
        self.hosts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a host so the spinner total is right before its first reply.
    pub fn track(&self, host: &str) {
        self.hosts().entry(host.to_string()).or_default();
    }
}

impl EventSink for TerminalSink {
    fn on_metrics_update(&self, host: &str, metrics: HostMetrics) {
        let succeeded = metrics.last_rtt.is_some();
        let (recovered, replying, total) = {
            let mut hosts = self.hosts();
            let entry = hosts.entry(host.to_string()).or_default();
            entry.previous = (metrics.probes_sent > 1).then_some(entry.replying);
            entry.replying = succeeded;
            let recovered = succeeded && entry.previous == Some(false);

            let replying = hosts.values().filter(|h| h.replying).count();
            (recovered, replying, hosts.len())
        };

        if recovered {
            success!("{host} is replying again");
        }
        spinner::report_reachability(replying, total);
    }

    fn on_probe_error(&self, host: &str, _kind: &ProbeErrorKind, message: &str) {
        // Only the transition is worth a warning; every cycle still gets a status line.
        let previous = self.hosts().get(host).and_then(|h| h.previous);
        match previous {
            Some(true) => warn!("{host} stopped replying: {message}"),
            None => warn!("{host} is not replying: {message}"),
            Some(false) => {}
        }
    }

    fn on_status(&self, message: &str, at: DateTime<Local>) {
        info!("{} {message}", at.format("%H:%M:%S"));
    }
}
