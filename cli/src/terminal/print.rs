use std::fmt::Display;

use colored::*;
use hostwatch_common::metrics::HostMetrics;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::{colors, format};

pub const TOTAL_WIDTH: usize = 64;

/// Events with this target are written verbatim, without a level symbol.
pub const PRINT_TARGET: &str = "hostwatch::print";

const KEY_WIDTH: usize = 12;

#[macro_export]
macro_rules! mprint {
    () => {
        $crate::terminal::print::print("")
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg)
    };
}

pub fn print(msg: &str) {
    info!(target: "hostwatch::print", "{msg}");
}

/// `fill` repeated on both sides of `title` up to the full width.
fn ruled(title: &str, fill: &str, paint: fn(&str) -> ColoredString) -> String {
    let pad = TOTAL_WIDTH.saturating_sub(UnicodeWidthStr::width(title));
    let (left, right) = (pad / 2, pad - pad / 2);
    format!(
        "{}{}{}",
        fill.repeat(left).color(colors::SEPARATOR),
        paint(title),
        fill.repeat(right).color(colors::SEPARATOR)
    )
}

pub fn banner(quiet: u8) {
    if quiet > 0 {
        return;
    }
    let title = format!("⟦ HOSTWATCH v{} ⟧", env!("CARGO_PKG_VERSION"));
    print(&ruled(&title, "═", |s| s.color(colors::PRIMARY).bold()));
}

pub fn header(msg: &str, quiet: u8) {
    if quiet > 0 {
        return;
    }
    let title = format!("⟦ {} ⟧", msg.to_uppercase());
    print(&ruled(&title, "─", |s| s.color(colors::PRIMARY)));
}

pub fn fat_separator() {
    print(&"═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR).to_string());
}

/// `key.......: value`, keys padded to a common width.
pub fn aligned_line(key: &str, value: impl Display) {
    let dots = ".".repeat((KEY_WIDTH + 1).saturating_sub(key.len()));
    print_status(format!(
        "{}{} {}",
        key.color(colors::PRIMARY),
        format!("{dots}:").color(colors::SEPARATOR),
        value
    ));
}

pub fn print_status(msg: impl AsRef<str>) {
    print(&format!("{} {}", ">".color(colors::SEPARATOR), msg.as_ref()));
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{space}{msg}"));
}

/// Prints the host table: one row per host, in registry order.
pub fn metrics_table(rows: &[HostMetrics]) {
    let host_width = rows
        .iter()
        .map(|row| row.host.len())
        .max()
        .unwrap_or(0)
        .max("Host".len());

    let head = format!(
        "{:<host_width$}  {:>8}  {:>9}  {:>7}  {:>8}",
        "Host", "Ping, ms", "Delivered", "Lost", "Last"
    );
    print(&head.color(colors::SEPARATOR).to_string());

    for row in rows {
        let probed = row.has_completed_probe();
        print(&format!(
            "{}  {}  {}  {}  {}",
            format!("{:<host_width$}", row.host).color(colors::PRIMARY),
            format::rtt(row),
            format::pct(row.delivered_pct, 9, probed),
            format::pct(row.loss_pct, 7, probed),
            format::last_seen(row),
        ));
    }
}

pub fn end_of_program() {
    fat_separator();
}
