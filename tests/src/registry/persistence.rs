use std::path::PathBuf;
use std::time::Duration;

use hostwatch_core::persist::{PersistError, HEADER};

use crate::support::{config, registry, Behavior, ScriptedEcho};

/// A file path under the system temp dir, removed on drop.
struct TempCsv(PathBuf);

impl TempCsv {
    fn new(name: &str) -> Self {
        let unique = format!("hostwatch-{}-{}-{name}.csv", std::process::id(), nanos());
        Self(std::env::temp_dir().join(unique))
    }
}

impl Drop for TempCsv {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn nanos() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}

#[tokio::test]
async fn export_then_import_restores_hosts_in_order() -> anyhow::Result<()> {
    let file = TempCsv::new("roundtrip");
    let echo = ScriptedEcho::new(Behavior::Reply(Duration::from_millis(5)))
        .with_host("10.0.0.2", Behavior::Timeout);
    let (source, sink) = registry(echo, &config(Duration::from_secs(60)));
    source.add_hosts("10.0.0.1\n10.0.0.2\n10.0.0.3").await;

    source.start_all().await;
    sink.wait_for("10.0.0.1", 1).await;
    sink.wait_for("10.0.0.2", 1).await;
    sink.wait_for("10.0.0.3", 1).await;
    source.stop_all().await;

    assert_eq!(source.export_csv(&file.0).await?, 3);

    let text = std::fs::read_to_string(&file.0)?;
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(format!("\u{feff}{}", HEADER.join(";")).as_str()));
    let first: Vec<&str> = lines.next().unwrap_or_default().split(';').collect();
    assert_eq!(&first[..4], ["10.0.0.1", "5", "100", "0"]);
    let second: Vec<&str> = lines.next().unwrap_or_default().split(';').collect();
    assert_eq!(&second[..4], ["10.0.0.2", "", "0", "100"]);

    let (target, _sink) = registry(ScriptedEcho::new(Behavior::Timeout), &config(Duration::from_secs(60)));
    let report = target.import_csv(&file.0).await?;

    assert_eq!(report.added, ["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    assert_eq!(target.hosts().await, source.hosts().await);
    assert!(target.snapshot().await.iter().all(|m| !m.has_completed_probe()));
    Ok(())
}

#[tokio::test]
async fn unprobed_hosts_export_with_zero_time() -> anyhow::Result<()> {
    let file = TempCsv::new("unprobed");
    let (registry, _sink) = registry(ScriptedEcho::new(Behavior::Timeout), &config(Duration::from_secs(1)));
    registry.add_host("10.0.0.1").await?;

    registry.export_csv(&file.0).await?;

    let text = std::fs::read_to_string(&file.0)?;
    assert_eq!(text.lines().nth(1), Some("10.0.0.1;;0;0;00:00:00"));
    Ok(())
}

#[tokio::test]
async fn import_skips_blank_and_reports_invalid_rows() -> anyhow::Result<()> {
    let file = TempCsv::new("invalid");
    let body = format!(
        "\u{feff}{}\n10.0.0.1;5;100;0;10:00:00\n;;;;\n999.0.0.1;;0;100;00:00:00\n10.0.0.1;;0;100;00:00:00\n10.0.0.4;;;;\n",
        HEADER.join(";")
    );
    std::fs::write(&file.0, body)?;

    let (registry, sink) = registry(ScriptedEcho::new(Behavior::Timeout), &config(Duration::from_secs(1)));
    let report = registry.import_csv(&file.0).await?;

    assert_eq!(report.added, ["10.0.0.1", "10.0.0.4"]);
    assert_eq!(report.invalid, ["999.0.0.1"]);
    assert_eq!(report.duplicates, ["10.0.0.1"]);
    assert_eq!(sink.statuses_containing("line 4: 999.0.0.1"), 1);
    Ok(())
}

#[tokio::test]
async fn foreign_header_is_skipped_with_a_warning() -> anyhow::Result<()> {
    let file = TempCsv::new("foreign-header");
    std::fs::write(
        &file.0,
        "\u{feff}Хост;Ping, мс;% доставлено;% потеряно;Время\n10.0.0.1;5;100;0;10:00:00\n10.0.0.2;;0;100;00:00:00\n",
    )?;

    let (registry, sink) = registry(ScriptedEcho::new(Behavior::Timeout), &config(Duration::from_secs(1)));
    let report = registry.import_csv(&file.0).await?;

    assert_eq!(report.added, ["10.0.0.1", "10.0.0.2"]);
    assert!(report.invalid.is_empty());
    assert_eq!(sink.statuses_containing("unexpected header row skipped: Хост;"), 1);
    Ok(())
}

#[tokio::test]
async fn headerless_file_loses_only_its_first_row() -> anyhow::Result<()> {
    let file = TempCsv::new("headerless");
    std::fs::write(&file.0, "10.0.0.1;5;100;0;10:00:00\n10.0.0.2;5;100;0;10:00:00\n")?;

    let (registry, sink) = registry(ScriptedEcho::new(Behavior::Timeout), &config(Duration::from_secs(1)));
    let report = registry.import_csv(&file.0).await?;

    assert_eq!(report.added, ["10.0.0.2"]);
    assert_eq!(registry.hosts().await, ["10.0.0.2"]);
    assert_eq!(sink.statuses_containing("unexpected header row skipped: 10.0.0.1;"), 1);
    Ok(())
}

#[tokio::test]
async fn import_of_missing_file_is_an_io_error() {
    let file = TempCsv::new("absent");
    let (registry, _sink) = registry(ScriptedEcho::new(Behavior::Timeout), &config(Duration::from_secs(1)));

    let err = registry.import_csv(&file.0).await.unwrap_err();
    assert!(matches!(err, PersistError::Io(_)));
}
