//! # Monitor Registry
//!
//! Owns the list of known hosts (in insertion order) and the monitor of every
//! host currently being probed.
//!
//! Every mutating operation takes the same lock, so adds, removals, starts and
//! stops are serialized against each other. Monitors never take that lock;
//! they publish through a forwarding sink that keeps the registry's copy of
//! each host's latest metrics current before handing the event on.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};

use chrono::{DateTime, Local};
use hostwatch_common::config::Config;
use hostwatch_common::error::{HostError, ProbeErrorKind};
use hostwatch_common::event::EventSink;
use hostwatch_common::host::validate_host;
use hostwatch_common::metrics::HostMetrics;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::hostlist::{self, BatchReport};
use crate::monitor::{HostMonitor, MonitorSettings, StopOutcome};
use crate::persist::{self, PersistError};
use crate::prober::Prober;

#[derive(Default)]
struct RegistryState {
    hosts: Vec<String>,
    monitors: HashMap<String, HostMonitor>,
}

pub struct MonitorRegistry {
    state: Mutex<RegistryState>,
    snapshots: Arc<SnapshotStore>,
    sink: Arc<dyn EventSink>,
    monitor_sink: Arc<dyn EventSink>,
    prober: Prober,
    settings: MonitorSettings,
    allow_hostnames: bool,
}

impl MonitorRegistry {
    pub fn new(prober: Prober, sink: Arc<dyn EventSink>, cfg: &Config) -> Self {
        let snapshots = Arc::new(SnapshotStore::default());
        let monitor_sink: Arc<dyn EventSink> = Arc::new(ForwardingSink {
            snapshots: Arc::clone(&snapshots),
            inner: Arc::clone(&sink),
        });

        Self {
            state: Mutex::new(RegistryState::default()),
            snapshots,
            sink,
            monitor_sink,
            prober,
            settings: MonitorSettings::from(cfg),
            allow_hostnames: cfg.allow_hostnames,
        }
    }

    /// Appends `host` with unknown metrics. Does not start monitoring it.
    pub async fn add_host(&self, host: &str) -> Result<(), HostError> {
        validate_host(host, self.allow_hostnames)?;

        let mut state = self.state.lock().await;
        if state.hosts.iter().any(|known| known == host) {
            return Err(HostError::DuplicateHost(host.to_string()));
        }

        state.hosts.push(host.to_string());
        self.snapshots.insert_unknown(host);
        debug!(host, "Host added");
        Ok(())
    }

    /// Adds every host of a multi-line text, reporting each rejected line.
    pub async fn add_hosts(&self, text: &str) -> BatchReport {
        let mut report = BatchReport::default();

        for host in hostlist::parse_lines(text) {
            let outcome = self.add_host(host).await;
            if let Err(e) = &outcome {
                self.status(format!("Error: {e}"));
            }
            report.record(host, outcome);
        }

        if report.is_empty() {
            self.status("No valid hosts to add, or all of them are already in the list");
        } else {
            self.status(format!("Added {} hosts", report.added.len()));
        }
        report
    }

    /// Stops the host's monitor, if any, then forgets the host.
    pub async fn remove_host(&self, host: &str) -> Result<(), HostError> {
        let mut state = self.state.lock().await;
        let Some(position) = state.hosts.iter().position(|known| known == host) else {
            return Err(HostError::NotFound(host.to_string()));
        };

        if let Some(monitor) = state.monitors.remove(host) {
            monitor.stop().await;
        }
        state.hosts.remove(position);
        self.snapshots.remove(host);

        self.status(format!("Removed {host}"));
        Ok(())
    }

    /// Starts a monitor for every known host that lacks a running one.
    ///
    /// A monitor whose loop died (a panicking sink) is replaced.
    ///
    /// Returns how many monitors were started.
    pub async fn start_all(&self) -> usize {
        let mut state = self.state.lock().await;
        self.start_locked(&mut state)
    }

    /// Stops every monitor concurrently. Known hosts are kept.
    ///
    /// Returns how many monitors were stopped.
    pub async fn stop_all(&self) -> usize {
        let mut state = self.state.lock().await;
        self.stop_locked(&mut state).await
    }

    /// Stops monitoring if anything is being monitored, starts it otherwise.
    ///
    /// Returns whether monitoring is active afterwards.
    pub async fn toggle(&self) -> bool {
        let mut state = self.state.lock().await;
        if !state.monitors.values().any(HostMonitor::is_running) {
            self.start_locked(&mut state) > 0
        } else {
            self.stop_locked(&mut state).await;
            false
        }
    }

    fn start_locked(&self, state: &mut RegistryState) -> usize {
        let RegistryState { hosts, monitors } = state;
        let mut started = 0;

        for host in hosts.iter() {
            if monitors.get(host).is_some_and(HostMonitor::is_running) {
                continue;
            }
            let monitor = HostMonitor::start(
                host.clone(),
                self.prober.clone(),
                Arc::clone(&self.monitor_sink),
                self.settings,
            );
            monitors.insert(host.clone(), monitor);
            started += 1;
        }

        if started > 0 {
            self.status(format!("Monitoring started for {started} hosts"));
        }
        started
    }

    async fn stop_locked(&self, state: &mut RegistryState) -> usize {
        let monitors: Vec<HostMonitor> = state.monitors.drain().map(|(_, m)| m).collect();
        let total = monitors.len();
        if total == 0 {
            return 0;
        }

        let mut stopping = JoinSet::new();
        for monitor in monitors {
            stopping.spawn(monitor.stop());
        }

        let (mut forced, mut failed) = (0, 0);
        while let Some(outcome) = stopping.join_next().await {
            match outcome {
                Ok(StopOutcome::Graceful) => {}
                Ok(StopOutcome::Forced) => forced += 1,
                Ok(StopOutcome::Failed) => failed += 1,
                Err(e) => warn!(error = %e, "Stopping a monitor panicked"),
            }
        }

        self.status("Monitoring stopped");
        if forced > 0 {
            self.status(format!("Warning: {forced} of {total} monitors had to be aborted"));
        }
        if failed > 0 {
            self.status(format!("Warning: {failed} of {total} monitors had already failed"));
        }
        total
    }

    /// `true` while at least one monitor loop is alive.
    pub async fn is_monitoring(&self) -> bool {
        self.state.lock().await.monitors.values().any(HostMonitor::is_running)
    }

    /// Number of monitor loops still alive.
    pub async fn active_count(&self) -> usize {
        let state = self.state.lock().await;
        state.monitors.values().filter(|m| m.is_running()).count()
    }

    pub async fn is_monitored(&self, host: &str) -> bool {
        let state = self.state.lock().await;
        state.monitors.get(host).is_some_and(HostMonitor::is_running)
    }

    /// Known hosts in insertion order.
    pub async fn hosts(&self) -> Vec<String> {
        self.state.lock().await.hosts.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.hosts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.hosts.is_empty()
    }

    /// Latest metrics of every known host, in insertion order.
    pub async fn snapshot(&self) -> Vec<HostMetrics> {
        let state = self.state.lock().await;
        let store = self.snapshots.lock();
        state
            .hosts
            .iter()
            .map(|host| {
                store
                    .get(host)
                    .cloned()
                    .unwrap_or_else(|| HostMetrics::unknown(host.as_str()))
            })
            .collect()
    }

    pub fn metrics(&self, host: &str) -> Option<HostMetrics> {
        self.snapshots.lock().get(host).cloned()
    }

    /// Writes the current table to `path`. Returns the number of rows written.
    pub async fn export_csv(&self, path: &Path) -> Result<usize, PersistError> {
        let rows = self.snapshot().await;
        let mut buffer = Vec::new();
        persist::export_csv(&mut buffer, &rows)?;
        tokio::fs::write(path, buffer).await?;

        self.status(format!("Exported {} hosts to {}", rows.len(), path.display()));
        Ok(rows.len())
    }

    /// Adds every valid host listed in the CSV at `path`.
    ///
    /// Rows failing validation land in [`BatchReport::invalid`], hosts already
    /// known in [`BatchReport::duplicates`]; neither aborts the import.
    pub async fn import_csv(&self, path: &Path) -> Result<BatchReport, PersistError> {
        let bytes = tokio::fs::read(path).await?;
        let imported = persist::import_csv(bytes.as_slice(), self.allow_hostnames)?;

        let mut report = BatchReport::default();
        if let Some(header) = &imported.unexpected_header {
            self.status(format!("Warning: unexpected header row skipped: {header}"));
        }
        for row in &imported.rejected {
            self.status(format!("Error: line {}: {} has an invalid host format", row.line, row.value));
            report.invalid.push(row.value.clone());
        }
        for host in &imported.hosts {
            let outcome = self.add_host(host).await;
            if let Err(e) = &outcome {
                self.status(format!("Warning: {e}"));
            }
            report.record(host, outcome);
        }

        self.status(format!("Import from {} finished", path.display()));
        Ok(report)
    }

    fn status(&self, message: impl AsRef<str>) {
        self.sink.on_status(message.as_ref(), Local::now());
    }
}

impl std::fmt::Debug for MonitorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (hosts, active) = self
            .state
            .try_lock()
            .map(|s| (s.hosts.len(), s.monitors.values().filter(|m| m.is_running()).count()))
            .unwrap_or((0, 0));
        f.debug_struct("MonitorRegistry")
            .field("hosts", &hosts)
            .field("active", &active)
            .finish_non_exhaustive()
    }
}

/// Latest metrics per known host.
#[derive(Default)]
struct SnapshotStore {
    metrics: StdMutex<HashMap<String, HostMetrics>>,
}

impl SnapshotStore {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, HostMetrics>> {
        self.metrics.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn insert_unknown(&self, host: &str) {
        self.lock().insert(host.to_string(), HostMetrics::unknown(host));
    }

    fn remove(&self, host: &str) {
        self.lock().remove(host);
    }

    /// Replaces the stored metrics of a known host. Returns `false` for
    /// hosts no longer in the registry.
    fn update(&self, host: &str, metrics: &HostMetrics) -> bool {
        match self.lock().get_mut(host) {
            Some(slot) => {
                *slot = metrics.clone();
                true
            }
            None => false,
        }
    }

    fn contains(&self, host: &str) -> bool {
        self.lock().contains_key(host)
    }
}

/// The sink handed to monitors: records snapshots, then forwards.
///
/// Events of hosts that have already been removed are dropped.
struct ForwardingSink {
    snapshots: Arc<SnapshotStore>,
    inner: Arc<dyn EventSink>,
}

impl EventSink for ForwardingSink {
    fn on_metrics_update(&self, host: &str, metrics: HostMetrics) {
        if self.snapshots.update(host, &metrics) {
            self.inner.on_metrics_update(host, metrics);
        }
    }

    fn on_probe_error(&self, host: &str, kind: &ProbeErrorKind, message: &str) {
        if self.snapshots.contains(host) {
            self.inner.on_probe_error(host, kind, message);
        }
    }

    fn on_status(&self, message: &str, at: DateTime<Local>) {
        self.inner.on_status(message, at);
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
