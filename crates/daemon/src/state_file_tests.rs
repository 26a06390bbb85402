use super::*;
use tempfile::tempdir;

fn sample() -> DaemonStateSnapshot {
    DaemonStateSnapshot {
        pid: 4242,
        started_at: Utc::now(),
        uptime_ms: 1_000,
        last_heartbeat: Utc::now(),
        tasks_completed: 7,
        tasks_queued: 2,
        memory_usage_mb: 64,
        scheduler_active: true,
        watcher_active: true,
    }
}

#[tokio::test]
async fn save_writes_readable_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("daemon-state.json");

    save(&path, &sample()).await;

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["pid"], 4242);
    assert_eq!(value["tasks_completed"], 7);
}

#[tokio::test]
async fn save_creates_missing_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("daemon-state.json");

    save(&path, &sample()).await;

    assert!(path.exists());
}

#[tokio::test]
async fn save_leaves_no_tmp_file_behind() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("daemon-state.json");

    save(&path, &sample()).await;

    assert!(!path.with_extension("json.tmp").exists());
}
