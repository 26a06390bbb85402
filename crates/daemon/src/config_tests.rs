use super::*;
use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn default_state_dir_is_workspace_relative() {
    let dir = tempdir().unwrap();
    std::env::remove_var("DCYFR_STATE_DIR");

    let cfg = Config::load(dir.path());

    assert_eq!(cfg.state_dir, dir.path().join(STATE_DIR_NAME));
    assert_eq!(cfg.pid_path(), dir.path().join(STATE_DIR_NAME).join("daemon.pid"));
}

#[test]
#[serial]
fn state_dir_env_override_wins() {
    let dir = tempdir().unwrap();
    let override_dir = dir.path().join("elsewhere");
    std::env::set_var("DCYFR_STATE_DIR", &override_dir);

    let cfg = Config::load(dir.path());

    assert_eq!(cfg.state_dir, override_dir);
    std::env::remove_var("DCYFR_STATE_DIR");
}

#[test]
#[serial]
fn is_state_path_matches_state_dir_name() {
    let dir = tempdir().unwrap();
    std::env::remove_var("DCYFR_STATE_DIR");
    let cfg = Config::load(dir.path());

    assert!(cfg.is_state_path(".dcyfr/queue.json"));
    assert!(cfg.is_state_path(".dcyfr"));
    assert!(!cfg.is_state_path("src/lib.rs"));
}

#[test]
fn default_ignore_list_covers_common_build_output() {
    let ignores = default_ignore_list();
    assert!(ignores.contains(&"target/".to_string()));
    assert!(ignores.contains(&".git/".to_string()));
}
