//! # CSV Layout
//!
//! The on-disk table shared with spreadsheet users:
//!
//! ```text
//! \u{feff}Host;Ping, ms;% delivered;% lost;Last ping time
//! 10.0.0.1;5;100;0;14:03:59
//! ```
//!
//! UTF-8 with a byte order mark, semicolon-delimited. Import only restores
//! host identity; metrics start over as unknown. The first row is always the
//! header and never read as data, whatever its wording (older exports carry a
//! localised one).

use std::io::{BufRead, Write};

use hostwatch_common::host::validate_host;
use hostwatch_common::metrics::HostMetrics;
use thiserror::Error;

pub const HEADER: [&str; 5] = ["Host", "Ping, ms", "% delivered", "% lost", "Last ping time"];
pub const DELIMITER: char = ';';

const BOM: &str = "\u{feff}";
const NO_TIME: &str = "00:00:00";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A data row that failed host validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based line number in the file, header included.
    pub line: usize,
    pub value: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub hosts: Vec<String>,
    pub rejected: Vec<RejectedRow>,
    /// The first row, when it differs from [`HEADER`]. It is skipped all the same.
    pub unexpected_header: Option<String>,
}

pub fn export_csv<W: Write>(mut writer: W, rows: &[HostMetrics]) -> Result<(), PersistError> {
    write!(writer, "{BOM}")?;
    writeln!(writer, "{}", HEADER.join(&DELIMITER.to_string()))?;

    for row in rows {
        writeln!(writer, "{}", format_row(row))?;
    }
    writer.flush()?;
    Ok(())
}

fn format_row(metrics: &HostMetrics) -> String {
    let rtt = metrics
        .last_rtt
        .map(|rtt| rtt.as_millis().to_string())
        .unwrap_or_default();
    let last_seen = metrics
        .last_probe_at
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| NO_TIME.to_string());

    [
        metrics.host.clone(),
        rtt,
        format_pct(metrics.delivered_pct),
        format_pct(metrics.loss_pct),
        last_seen,
    ]
    .join(&DELIMITER.to_string())
}

/// `100.0` renders as `100`, `66.67` stays `66.67`.
fn format_pct(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Reads host identifiers back from the layout written by [`export_csv`].
///
/// The first row is skipped as the header. Rows with an empty first column
/// are skipped silently; rows whose first column is not a valid host are
/// reported in [`ImportReport::rejected`].
pub fn import_csv<R: BufRead>(reader: R, allow_hostnames: bool) -> Result<ImportReport, PersistError> {
    let mut lines = reader.lines();

    let mut report = ImportReport::default();

    let Some(header) = lines.next().transpose()? else {
        return Ok(report);
    };
    let header = header.strip_prefix(BOM).unwrap_or(header.as_str());
    if !is_header(header) {
        report.unexpected_header = Some(header.trim_end().to_string());
    }

    for (idx, line) in lines.enumerate() {
        let line = line?;
        let host = line.split(DELIMITER).next().unwrap_or_default().trim();
        if host.is_empty() {
            continue;
        }

        match validate_host(host, allow_hostnames) {
            Ok(()) => report.hosts.push(host.to_string()),
            Err(_) => report.rejected.push(RejectedRow {
                line: idx + 2,
                value: host.to_string(),
            }),
        }
    }
    Ok(report)
}

fn is_header(line: &str) -> bool {
    let columns: Vec<&str> = line.trim_end().split(DELIMITER).map(str::trim).collect();
    columns == HEADER
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
