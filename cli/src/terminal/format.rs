use std::time::Duration;

use colored::*;
use hostwatch_common::metrics::HostMetrics;

use crate::terminal::colors;

const SLOW_RTT: Duration = Duration::from_millis(100);

pub fn rtt(metrics: &HostMetrics) -> ColoredString {
    match metrics.last_rtt {
        Some(rtt) => {
            let color = if rtt < SLOW_RTT { colors::RTT_FAST } else { colors::RTT_SLOW };
            format!("{:>8.1}", rtt.as_secs_f64() * 1000.0).color(color)
        }
        None if metrics.has_completed_probe() => format!("{:>8}", "-").color(colors::LOST),
        None => format!("{:>8}", "n/a").color(colors::UNKNOWN),
    }
}

pub fn pct(value: f64, width: usize, probed: bool) -> ColoredString {
    if !probed {
        return format!("{:>width$}", "n/a").color(colors::UNKNOWN);
    }
    format!("{:>width$}", format!("{value}%")).color(colors::TEXT_DEFAULT)
}

pub fn last_seen(metrics: &HostMetrics) -> ColoredString {
    match metrics.last_probe_at {
        Some(at) => at.format("%H:%M:%S").to_string().color(colors::TEXT_DEFAULT),
        None => "00:00:00".color(colors::UNKNOWN),
    }
}
