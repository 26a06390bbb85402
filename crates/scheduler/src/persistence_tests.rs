use super::*;
use tempfile::tempdir;

fn sample() -> ScheduleOverride {
    ScheduleOverride { id: "license-headers".to_string(), last_run: Some(Utc::now()), next_run: Some(Utc::now()), enabled: true }
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let persistence = SchedulePersistence::new(dir.path().join("schedules.json"));
    persistence.save(&[sample()]).await;
    let loaded = persistence.load().await;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "license-headers");
}

#[tokio::test]
async fn load_of_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let persistence = SchedulePersistence::new(dir.path().join("missing.json"));
    assert!(persistence.load().await.is_empty());
}

#[tokio::test]
async fn load_of_corrupt_file_is_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schedules.json");
    tokio::fs::write(&path, b"not json").await.unwrap();
    let persistence = SchedulePersistence::new(path);
    assert!(persistence.load().await.is_empty());
}

#[tokio::test]
async fn save_does_not_leave_a_torn_file_visible() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schedules.json");
    let persistence = SchedulePersistence::new(path.clone());
    persistence.save(&[sample(), sample()]).await;
    assert!(!dir.path().join("schedules.json.tmp").exists());
    assert!(path.exists());
}
