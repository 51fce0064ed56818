use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::*;
use hostwatch_common::config::Config;
use hostwatch_common::event::NullSink;
use hostwatch_core::hostlist::BatchReport;
use hostwatch_core::{MonitorRegistry, Prober};

use crate::terminal::{colors, print};

/// Runs a host list through the same validation as `watch`, without probing.
pub async fn check(path: &Path, cfg: &Config) -> anyhow::Result<()> {
    let registry = MonitorRegistry::new(Prober::icmp(), Arc::new(NullSink), cfg);

    let report: BatchReport = if is_csv(path) {
        registry
            .import_csv(path)
            .await
            .with_context(|| format!("importing {}", path.display()))?
    } else {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        registry.add_hosts(&text).await
    };

    print::aligned_line("Valid", report.added.len().to_string().green());
    print::aligned_line("Invalid", report.invalid.len().to_string().red());
    print::aligned_line("Duplicates", report.duplicates.len().to_string().yellow());

    for host in &report.invalid {
        print::print_status(format!("{} {}", host.color(colors::LOST), "invalid host format"));
    }
    for host in &report.duplicates {
        print::print_status(format!("{} {}", host.color(colors::RTT_SLOW), "listed more than once"));
    }

    if report.is_empty() {
        anyhow::bail!("no valid hosts in {}", path.display());
    }
    Ok(())
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
