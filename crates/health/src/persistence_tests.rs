use super::*;
use chrono::{Duration, Utc};
use dcyfr_core::{HealthStatus, OverallHealth, WorkspaceHealth};
use std::collections::HashMap;
use tempfile::tempdir;

fn sample(timestamp: chrono::DateTime<Utc>) -> HealthSnapshot {
    HealthSnapshot {
        timestamp,
        overall: OverallHealth { score: 92.5, status: HealthStatus::Healthy },
        scanners: HashMap::new(),
        workspace: WorkspaceHealth { packages: 3, last_scan_duration_ms: 120 },
    }
}

#[tokio::test]
async fn save_then_load_snapshot_round_trips() {
    let dir = tempdir().unwrap();
    let persistence =
        HealthPersistence::new(dir.path().join("health.json"), dir.path().join("health-history.json"));
    let snapshot = sample(Utc::now());

    persistence.save_snapshot(&snapshot).await;
    let loaded = persistence.load_snapshot().await.unwrap();

    assert_eq!(loaded.timestamp, snapshot.timestamp);
    assert_eq!(loaded.overall.score, snapshot.overall.score);
    assert_eq!(loaded.overall.status, snapshot.overall.status);
    assert_eq!(loaded.workspace.packages, snapshot.workspace.packages);
}

#[tokio::test]
async fn load_snapshot_of_missing_file_is_none() {
    let dir = tempdir().unwrap();
    let persistence =
        HealthPersistence::new(dir.path().join("health.json"), dir.path().join("health-history.json"));
    assert!(persistence.load_snapshot().await.is_none());
}

#[tokio::test]
async fn load_snapshot_of_corrupt_file_is_none() {
    let dir = tempdir().unwrap();
    let snapshot_path = dir.path().join("health.json");
    tokio::fs::write(&snapshot_path, b"not json").await.unwrap();
    let persistence = HealthPersistence::new(snapshot_path, dir.path().join("health-history.json"));
    assert!(persistence.load_snapshot().await.is_none());
}

#[tokio::test]
async fn save_then_load_history_round_trips() {
    let dir = tempdir().unwrap();
    let persistence =
        HealthPersistence::new(dir.path().join("health.json"), dir.path().join("health-history.json"));
    let now = Utc::now();
    let history = vec![sample(now - Duration::days(1)), sample(now)];

    persistence.save_history(&history).await;
    let loaded = persistence.load_history().await;

    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].timestamp, history[0].timestamp);
    assert_eq!(loaded[1].timestamp, history[1].timestamp);
}

#[tokio::test]
async fn load_history_of_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let persistence =
        HealthPersistence::new(dir.path().join("health.json"), dir.path().join("health-history.json"));
    assert!(persistence.load_history().await.is_empty());
}

#[test]
fn prune_drops_entries_older_than_the_retention_window() {
    let now = Utc::now();
    let mut history =
        vec![sample(now - Duration::days(95)), sample(now - Duration::days(10)), sample(now)];
    prune(&mut history, now, Duration::days(90));
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|s| now - s.timestamp <= Duration::days(90)));
}
