use super::*;
use dcyfr_core::{Priority, TaskSource};
use dcyfr_registry::fixtures::FixedScanner;
use std::collections::HashMap;
use std::time::Duration as StdDuration;
use tempfile::tempdir;

fn test_config(workspace: &std::path::Path) -> Config {
    let mut cfg = Config::load(workspace);
    // Fast enough for tests without real sleeps measured in minutes.
    cfg.heartbeat_interval = StdDuration::from_millis(20);
    cfg.drain_timeout = StdDuration::from_millis(500);
    cfg
}

#[tokio::test]
async fn start_then_shutdown_is_clean() {
    let dir = tempdir().unwrap();
    let registry = ScannerRegistry::new();
    registry.register(std::sync::Arc::new(FixedScanner::passing("license-headers"))).unwrap();

    let supervisor = Supervisor::start(test_config(dir.path()), registry, HealthConfig::default())
        .await
        .unwrap();
    assert!(supervisor.is_running());

    supervisor.shutdown().await;
    assert!(!supervisor.is_running());
    assert!(!dir.path().join(".dcyfr").join("daemon.pid").exists());
}

#[tokio::test]
async fn shutdown_is_idempotent() {
    let dir = tempdir().unwrap();
    let registry = ScannerRegistry::new();
    let supervisor =
        Supervisor::start(test_config(dir.path()), registry, HealthConfig::default()).await.unwrap();

    supervisor.shutdown().await;
    supervisor.shutdown().await;
    supervisor.shutdown().await;
}

#[tokio::test]
async fn second_instance_is_refused_while_first_is_running() {
    let dir = tempdir().unwrap();
    let registry_a = ScannerRegistry::new();
    let supervisor =
        Supervisor::start(test_config(dir.path()), registry_a, HealthConfig::default()).await.unwrap();

    let registry_b = ScannerRegistry::new();
    let second = Supervisor::start(test_config(dir.path()), registry_b, HealthConfig::default()).await;
    assert!(matches!(second, Err(LifecycleError::AlreadyRunning { .. })));

    supervisor.shutdown().await;
}

#[tokio::test]
async fn heartbeat_writes_daemon_state_snapshot() {
    let dir = tempdir().unwrap();
    let registry = ScannerRegistry::new();
    let supervisor =
        Supervisor::start(test_config(dir.path()), registry, HealthConfig::default()).await.unwrap();

    tokio::time::sleep(StdDuration::from_millis(100)).await;

    let state_path = dir.path().join(".dcyfr").join("daemon-state.json");
    assert!(state_path.exists());
    let raw = std::fs::read_to_string(&state_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["pid"], std::process::id());

    supervisor.shutdown().await;
}

#[tokio::test]
async fn scan_result_flows_into_the_result_cache_via_the_event_bus() {
    let dir = tempdir().unwrap();
    let registry = ScannerRegistry::new();
    registry.register(std::sync::Arc::new(FixedScanner::passing("license-headers"))).unwrap();

    let supervisor =
        Supervisor::start(test_config(dir.path()), registry, HealthConfig::default()).await.unwrap();

    supervisor
        .queue()
        .enqueue(
            dcyfr_core::ScannerId::from("license-headers"),
            TaskSource::Cli,
            Priority::Normal,
            None,
            HashMap::new(),
        )
        .expect("enqueue should succeed");

    supervisor.queue().drain().await;
    tokio::time::sleep(StdDuration::from_millis(50)).await;

    assert!(supervisor
        .result_cache
        .snapshot()
        .iter()
        .any(|r| r.scanner == dcyfr_core::ScannerId::from("license-headers")));

    supervisor.shutdown().await;
}
