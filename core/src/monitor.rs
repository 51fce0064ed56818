//! # Host Monitor
//!
//! Runs the probing loop of exactly one host on its own tokio task.
//!
//! A monitor is `Running` from [`HostMonitor::start`] until [`HostMonitor::stop`]
//! consumes it; there is no way back, a restart creates a new monitor. The
//! loop only suspends while awaiting a probe and while sleeping between
//! cycles, and both suspensions race against the stop signal.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use hostwatch_common::config::Config;
use hostwatch_common::event::EventSink;
use hostwatch_common::metrics::{HostMetrics, MetricsWindow, ProbeResult};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::prober::Prober;

/// Timing knobs of one monitoring loop.
#[derive(Debug, Clone, Copy)]
pub struct MonitorSettings {
    pub interval: Duration,
    pub timeout: Duration,
    pub grace_period: Duration,
    pub window: usize,
}

impl From<&Config> for MonitorSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            interval: cfg.interval,
            timeout: cfg.timeout,
            grace_period: cfg.grace_period,
            window: cfg.window,
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// How a monitor ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The loop observed the stop signal and returned on its own.
    Graceful,
    /// The loop missed the grace period and its task was aborted.
    Forced,
    /// The loop had already died, typically from a panicking sink.
    Failed,
}

pub struct HostMonitor {
    host: String,
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
    grace_period: Duration,
}

impl HostMonitor {
    /// Spawns the probing loop for `host`. Must be called within a tokio runtime.
    pub fn start(
        host: impl Into<String>,
        prober: Prober,
        sink: Arc<dyn EventSink>,
        settings: MonitorSettings,
    ) -> Self {
        let host = host.into();
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run(host.clone(), prober, sink, settings, stop_rx));
        debug!(host = %host, "Monitor started");

        Self {
            host,
            stop_tx,
            handle,
            grace_period: settings.grace_period,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Signals the loop to end and waits at most one grace period for it.
    ///
    /// A loop still running after the grace period is aborted. Either way no
    /// event for this host is emitted once `stop` returns.
    pub async fn stop(self) -> StopOutcome {
        let Self { host, stop_tx, mut handle, grace_period } = self;
        let _ = stop_tx.send(true);

        match tokio::time::timeout(grace_period, &mut handle).await {
            Ok(Ok(())) => {
                debug!(host = %host, "Monitor stopped");
                StopOutcome::Graceful
            }
            Ok(Err(e)) => {
                warn!(host = %host, error = %e, "Monitor task had failed");
                StopOutcome::Failed
            }
            Err(_elapsed) => {
                warn!(
                    host = %host,
                    grace_ms = grace_period.as_millis() as u64,
                    "Monitor missed its grace period, aborting"
                );
                handle.abort();
                StopOutcome::Forced
            }
        }
    }
}

impl std::fmt::Debug for HostMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostMonitor")
            .field("host", &self.host)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

async fn run(
    host: String,
    prober: Prober,
    sink: Arc<dyn EventSink>,
    settings: MonitorSettings,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut metrics = HostMetrics::unknown(&host);
    let mut window = MetricsWindow::new(settings.window);

    loop {
        let result = tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            result = prober.probe(&host, settings.timeout) => result,
        };

        // An aborted task can still finish the poll it is in; stay silent.
        if *stop_rx.borrow() {
            break;
        }

        let now = Local::now();
        metrics.fold(&result, &mut window, now);
        publish(&host, &result, &metrics, sink.as_ref(), &stop_rx, now);

        tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            _ = tokio::time::sleep(settings.interval) => {}
        }
    }
}

/// Hands one cycle to the sink.
///
/// A sink call may outlast the grace period and get the task aborted under
/// it; the stop flag is re-read before each call so nothing follows a stop.
fn publish(
    host: &str,
    result: &ProbeResult,
    metrics: &HostMetrics,
    sink: &dyn EventSink,
    stop_rx: &watch::Receiver<bool>,
    at: DateTime<Local>,
) {
    let stopped = || *stop_rx.borrow();

    sink.on_metrics_update(host, metrics.clone());
    if stopped() {
        return;
    }
    sink.on_status(&status_line(host, result), at);

    if let Some(kind) = &result.error {
        if stopped() {
            return;
        }
        debug!(host, error = %kind, "Probe failed");
        sink.on_probe_error(host, kind, &kind.to_string());
    }
}

/// The human-readable line describing one probe cycle.
pub fn status_line(host: &str, result: &ProbeResult) -> String {
    match (&result.error, result.round_trip_time) {
        (Some(kind), _) => format!("Ping {host} failed: {kind}"),
        (None, Some(rtt)) => {
            format!("Ping {host} done. RTT: {:.1} ms", rtt.as_secs_f64() * 1000.0)
        }
        (None, None) => format!("Ping {host} done"),
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
