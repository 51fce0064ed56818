use std::time::{Duration, Instant};

use hostwatch_common::error::{HostError, ProbeErrorKind};

use crate::support::{config, registry, Behavior, ScriptedEcho};

#[tokio::test]
async fn duplicate_host_is_rejected_and_list_unchanged() {
    let (registry, _sink) = registry(ScriptedEcho::new(Behavior::Timeout), &config(Duration::from_secs(1)));

    registry.add_host("10.0.0.1").await.unwrap();
    let err = registry.add_host("10.0.0.1").await.unwrap_err();

    assert_eq!(err, HostError::DuplicateHost("10.0.0.1".into()));
    assert_eq!(registry.hosts().await, ["10.0.0.1"]);
}

#[tokio::test]
async fn pasted_batch_reports_each_line() {
    let (registry, sink) = registry(ScriptedEcho::new(Behavior::Timeout), &config(Duration::from_secs(1)));
    registry.add_host("10.0.0.9").await.unwrap();

    let report = registry
        .add_hosts("10.0.0.1\n\n  10.0.0.2  \n10.0.0.9\n300.1.1.1\nnot a host\n")
        .await;

    assert_eq!(report.added, ["10.0.0.1", "10.0.0.2"]);
    assert_eq!(report.duplicates, ["10.0.0.9"]);
    assert_eq!(report.invalid, ["300.1.1.1", "not a host"]);
    assert_eq!(registry.hosts().await, ["10.0.0.9", "10.0.0.1", "10.0.0.2"]);
    assert_eq!(sink.statuses_containing("Added 2 hosts"), 1);
}

#[tokio::test]
async fn new_host_starts_unknown_and_unmonitored() {
    let (registry, _sink) = registry(ScriptedEcho::new(Behavior::Timeout), &config(Duration::from_secs(1)));
    registry.add_host("10.0.0.1").await.unwrap();

    let metrics = registry.metrics("10.0.0.1").unwrap();
    assert!(!metrics.has_completed_probe());
    assert_eq!(metrics.delivered_pct, 0.0);
    assert_eq!(metrics.loss_pct, 0.0);
    assert!(!registry.is_monitored("10.0.0.1").await);
}

#[tokio::test]
async fn replying_host_reports_full_delivery() {
    let echo = ScriptedEcho::new(Behavior::Reply(Duration::from_millis(5)));
    let (registry, sink) = registry(echo, &config(Duration::from_millis(20)));
    registry.add_host("10.0.0.1").await.unwrap();

    assert_eq!(registry.start_all().await, 1);
    sink.wait_for("10.0.0.1", 1).await;
    registry.stop_all().await;

    let first = &sink.updates_for("10.0.0.1")[0];
    assert_eq!(first.last_rtt, Some(Duration::from_millis(5)));
    assert_eq!(first.delivered_pct, 100.0);
    assert_eq!(first.loss_pct, 0.0);
    assert!(first.last_probe_at.is_some());
    assert!(sink.errors_for("10.0.0.1").is_empty());
    assert_eq!(sink.statuses_containing("Ping 10.0.0.1 done"), sink.updates_for("10.0.0.1").len());

    let latest = registry.metrics("10.0.0.1").unwrap();
    assert!(latest.has_completed_probe());
}

#[tokio::test]
async fn timed_out_probe_reports_loss_and_one_error() {
    let (registry, sink) = registry(ScriptedEcho::new(Behavior::Timeout), &config(Duration::from_secs(60)));
    registry.add_host("10.0.0.1").await.unwrap();

    registry.start_all().await;
    sink.wait_for("10.0.0.1", 1).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    registry.stop_all().await;

    let updates = sink.updates_for("10.0.0.1");
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].last_rtt, None);
    assert_eq!(updates[0].delivered_pct, 0.0);
    assert_eq!(updates[0].loss_pct, 100.0);
    assert_eq!(sink.errors_for("10.0.0.1"), [ProbeErrorKind::Timeout]);
}

#[tokio::test]
async fn unresolvable_host_is_classified() {
    let echo = ScriptedEcho::new(Behavior::Reply(Duration::from_millis(1)))
        .with_host("10.0.0.2", Behavior::Unresolvable);
    let (registry, sink) = registry(echo, &config(Duration::from_secs(60)));
    registry.add_hosts("10.0.0.1\n10.0.0.2").await;

    registry.start_all().await;
    sink.wait_for("10.0.0.2", 1).await;
    registry.stop_all().await;

    assert_eq!(sink.errors_for("10.0.0.2"), [ProbeErrorKind::ResolutionFailed]);
    assert!(sink.errors_for("10.0.0.1").is_empty());
}

#[tokio::test]
async fn hanging_host_does_not_delay_others() {
    let echo = ScriptedEcho::new(Behavior::Reply(Duration::from_millis(2)))
        .with_host("10.0.0.1", Behavior::Hang);
    let (registry, sink) = registry(echo, &config(Duration::from_millis(10)));
    registry.add_hosts("10.0.0.1\n10.0.0.2").await;

    registry.start_all().await;
    sink.wait_for("10.0.0.2", 5).await;
    registry.stop_all().await;

    assert!(sink.updates_for("10.0.0.1").is_empty());
}

#[tokio::test]
async fn stop_all_is_prompt_for_many_hosts() {
    let echo = ScriptedEcho::new(Behavior::Hang);
    let (registry, _sink) = registry(echo, &config(Duration::from_millis(100)));
    let hosts: String = (1..=50).map(|i| format!("10.0.1.{i}\n")).collect();
    assert_eq!(registry.add_hosts(&hosts).await.added.len(), 50);

    assert_eq!(registry.start_all().await, 50);
    tokio::time::sleep(Duration::from_millis(20)).await;

    let started = Instant::now();
    assert_eq!(registry.stop_all().await, 50);
    assert!(started.elapsed() < Duration::from_millis(600), "stop took {:?}", started.elapsed());
    assert_eq!(registry.active_count().await, 0);
    assert_eq!(registry.len().await, 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn stuck_monitors_are_aborted_within_one_grace_period() {
    let echo = ScriptedEcho::new(Behavior::Stuck(Duration::from_secs(2)));
    let mut cfg = config(Duration::from_millis(10));
    cfg.grace_period = Duration::from_millis(200);
    let (registry, sink) = registry(echo, &cfg);
    registry.add_hosts("10.0.0.1\n10.0.0.2\n10.0.0.3\n10.0.0.4").await;

    registry.start_all().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let started = Instant::now();
    assert_eq!(registry.stop_all().await, 4);
    assert!(started.elapsed() < Duration::from_millis(1000), "stop took {:?}", started.elapsed());
    assert_eq!(sink.statuses_containing("had to be aborted"), 1);

    // The blocked probes eventually return; their results must not surface.
    tokio::time::sleep(Duration::from_millis(2200)).await;
    assert!(sink.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn removed_host_gets_no_further_updates() {
    let echo = ScriptedEcho::new(Behavior::Reply(Duration::from_millis(1)));
    let (registry, sink) = registry(echo, &config(Duration::from_millis(10)));
    registry.add_hosts("10.0.0.1\n10.0.0.2").await;

    registry.start_all().await;
    sink.wait_for("10.0.0.1", 2).await;
    registry.remove_host("10.0.0.1").await.unwrap();
    let seen = sink.updates_for("10.0.0.1").len();

    let before = sink.updates_for("10.0.0.2").len();
    sink.wait_for("10.0.0.2", before + 3).await;
    registry.stop_all().await;

    assert_eq!(sink.updates_for("10.0.0.1").len(), seen);
    assert_eq!(registry.hosts().await, ["10.0.0.2"]);
    assert!(registry.metrics("10.0.0.1").is_none());
    assert_eq!(sink.statuses_containing("Removed 10.0.0.1"), 1);
}

#[tokio::test]
async fn removing_unknown_host_fails() {
    let (registry, _sink) = registry(ScriptedEcho::new(Behavior::Timeout), &config(Duration::from_secs(1)));

    let err = registry.remove_host("10.0.0.1").await.unwrap_err();
    assert_eq!(err, HostError::NotFound("10.0.0.1".into()));
}

#[tokio::test]
async fn toggle_flips_monitoring() {
    let echo = ScriptedEcho::new(Behavior::Reply(Duration::from_millis(1)));
    let (registry, _sink) = registry(echo, &config(Duration::from_millis(50)));
    registry.add_hosts("10.0.0.1\n10.0.0.2").await;

    assert!(registry.toggle().await);
    assert_eq!(registry.active_count().await, 2);
    assert_eq!(registry.start_all().await, 0);

    assert!(!registry.toggle().await);
    assert!(!registry.is_monitoring().await);
    assert_eq!(registry.stop_all().await, 0);
}

#[tokio::test]
async fn toggle_on_empty_registry_stays_off() {
    let (registry, _sink) = registry(ScriptedEcho::new(Behavior::Timeout), &config(Duration::from_secs(1)));

    assert!(!registry.toggle().await);
    assert!(!registry.is_monitoring().await);
}
