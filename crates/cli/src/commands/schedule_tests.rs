use super::*;
use tempfile::tempdir;

#[tokio::test]
async fn disable_then_enable_round_trips_through_the_override_file() {
    let dir = tempdir().unwrap();
    let config = Config::load(dir.path());

    run(&config, "workspace-health", false).await.unwrap();
    let after_disable = SchedulePersistence::new(config.schedules_path()).load().await;
    let entry = after_disable.iter().find(|o| o.id == "workspace-health").unwrap();
    assert!(!entry.enabled);

    run(&config, "workspace-health", true).await.unwrap();
    let after_enable = SchedulePersistence::new(config.schedules_path()).load().await;
    let entry = after_enable.iter().find(|o| o.id == "workspace-health").unwrap();
    assert!(entry.enabled);
}

#[tokio::test]
async fn disabling_an_unknown_id_creates_a_new_override_entry() {
    let dir = tempdir().unwrap();
    let config = Config::load(dir.path());

    run(&config, "not-a-default-entry", false).await.unwrap();

    let overrides = SchedulePersistence::new(config.schedules_path()).load().await;
    assert_eq!(overrides.len(), 1);
    assert_eq!(overrides[0].id, "not-a-default-entry");
    assert!(!overrides[0].enabled);
}
