//! The live line under the log: elapsed time and how many hosts reply.
//!
//! While the spinner runs, every log line is printed above it through
//! [`SpinnerWriter`] so the two never tear each other apart.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const TICK_RATE: Duration = Duration::from_millis(120);
const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

pub struct Spinner {
    bar: ProgressBar,
    /// Last reported count, packed as `replying << 32 | total`.
    last: AtomicU64,
}

impl Spinner {
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }

    fn is_running(&self) -> bool {
        !self.bar.is_finished()
    }
}

static SPINNER: OnceLock<Spinner> = OnceLock::new();

/// Starts the spinner. Log output is routed above it from then on.
pub fn start() -> &'static Spinner {
    SPINNER.get_or_init(|| {
        let style = ProgressStyle::with_template("{spinner:.blue} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(format!("{}", "waiting for the first replies, Ctrl-C to stop".italic()));
        bar.enable_steady_tick(TICK_RATE);

        Spinner {
            bar,
            last: AtomicU64::new(u64::MAX),
        }
    })
}

fn get() -> Option<&'static Spinner> {
    SPINNER.get().filter(|spinner| spinner.is_running())
}

/// Shows `replying` out of `total` hosts. Repeated counts are not redrawn.
pub fn report_reachability(replying: usize, total: usize) {
    let Some(spinner) = get() else {
        return;
    };

    let packed = ((replying as u64) << 32) | (total as u64 & 0xffff_ffff);
    if spinner.last.swap(packed, Ordering::Relaxed) == packed {
        return;
    }

    let replying = if replying == total {
        replying.to_string().green().bold()
    } else if replying == 0 {
        replying.to_string().red().bold()
    } else {
        replying.to_string().yellow().bold()
    };
    spinner.bar.set_message(format!("{replying} of {total} hosts replying"));
}

/// Log writer printing above the spinner while it runs, to stderr otherwise.
pub struct SpinnerWriter;

impl std::io::Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        let msg = msg.trim_end();
        match get() {
            Some(spinner) => spinner.bar.println(msg),
            None => eprintln!("{msg}"),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
