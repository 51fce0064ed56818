use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use colored::*;
use hostwatch_common::config::Config;
use hostwatch_common::{success, warn};
use hostwatch_core::hostlist::BatchReport;
use hostwatch_core::{MonitorRegistry, Prober};
use is_root::is_root;

use crate::commands::WatchArgs;
use crate::mprint;
use crate::terminal::sink::TerminalSink;
use crate::terminal::{print, spinner};

pub async fn watch(args: WatchArgs, cfg: &Config) -> anyhow::Result<()> {
    if !is_root() {
        warn!("Not running as root: ICMP needs unprivileged ping sockets to be allowed");
    }

    let sink = Arc::new(TerminalSink::new());
    let registry = MonitorRegistry::new(Prober::icmp(), sink.clone(), cfg);

    load_hosts(&registry, &args).await?;
    if registry.is_empty().await {
        bail!("no valid hosts to monitor");
    }
    for host in registry.hosts().await {
        sink.track(&host);
    }

    print::header("monitoring", cfg.quiet);
    let start_time = Instant::now();
    registry.start_all().await;
    let spinner = spinner::start();

    wait_for_shutdown(args.duration).await?;

    registry.stop_all().await;
    spinner.finish_and_clear();

    summary(&registry, start_time.elapsed(), cfg).await;

    if let Some(path) = &args.export {
        let rows = registry
            .export_csv(path)
            .await
            .with_context(|| format!("exporting to {}", path.display()))?;
        success!("{rows} hosts exported to {}", path.display());
    }
    Ok(())
}

async fn load_hosts(registry: &MonitorRegistry, args: &WatchArgs) -> anyhow::Result<()> {
    if !args.hosts.is_empty() {
        let report = registry.add_hosts(&args.hosts.join("\n")).await;
        report_rejections(&report);
    }

    if let Some(path) = &args.list {
        let text = read_list(path).await?;
        let report = registry.add_hosts(&text).await;
        report_rejections(&report);
    }

    if let Some(path) = &args.file {
        let report = registry
            .import_csv(path)
            .await
            .with_context(|| format!("importing {}", path.display()))?;
        report_rejections(&report);
    }
    Ok(())
}

async fn read_list(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

fn report_rejections(report: &BatchReport) {
    if report.rejected() > 0 {
        warn!(
            "{} added, {} invalid, {} already listed",
            report.added.len(),
            report.invalid.len(),
            report.duplicates.len()
        );
    }
}

async fn wait_for_shutdown(duration: Option<u64>) -> anyhow::Result<()> {
    match duration {
        Some(secs) => {
            tokio::select! {
                res = tokio::signal::ctrl_c() => res.context("listening for Ctrl-C")?,
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
            }
        }
        None => tokio::signal::ctrl_c().await.context("listening for Ctrl-C")?,
    }
    Ok(())
}

async fn summary(registry: &MonitorRegistry, total_time: Duration, cfg: &Config) {
    let rows = registry.snapshot().await;

    if cfg.quiet > 0 {
        mprint!();
    }
    print::header("summary", cfg.quiet);
    print::metrics_table(&rows);

    let replying = rows.iter().filter(|row| row.last_rtt.is_some()).count();
    let replying: ColoredString = format!("{replying}/{} hosts replying", rows.len()).bold().green();
    let total_time: ColoredString = format!("{:.0}s", total_time.as_secs_f64()).bold().yellow();
    let output = format!("Monitoring ended: {replying} after {total_time}");

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
            print::end_of_program();
        }
        _ => success!("{}", output),
    }
}
