use super::*;
use dcyfr_core::{Priority, ScannerId, TaskSource};
use std::collections::HashMap;
use tempfile::tempdir;

fn sample_task() -> Task {
    Task::new(ScannerId::from("tlp-headers"), Priority::Normal, TaskSource::Cli, None, HashMap::new(), Utc::now())
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let persistence = QueuePersistence::new(dir.path().join("queue.json"));
    let tasks = vec![sample_task()];
    persistence.save(&tasks, Utc::now()).await;
    let loaded = persistence.load().await;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].scanner.as_str(), "tlp-headers");
}

#[tokio::test]
async fn load_of_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let persistence = QueuePersistence::new(dir.path().join("missing.json"));
    assert!(persistence.load().await.is_empty());
}

#[tokio::test]
async fn load_of_corrupt_file_is_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.json");
    tokio::fs::write(&path, b"not json").await.unwrap();
    let persistence = QueuePersistence::new(path);
    assert!(persistence.load().await.is_empty());
}

#[tokio::test]
async fn save_does_not_leave_a_torn_file_visible() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.json");
    let persistence = QueuePersistence::new(path.clone());
    persistence.save(&[sample_task(), sample_task()], Utc::now()).await;
    assert!(!dir.path().join("queue.json.tmp").exists());
    assert!(path.exists());
}
