use super::*;
use tempfile::tempdir;

#[test]
fn own_pid_is_reported_alive() {
    assert!(is_alive(std::process::id()));
}

#[test]
fn read_pid_returns_none_without_a_pid_file() {
    let dir = tempdir().unwrap();
    let config = Config::load(dir.path());
    assert_eq!(read_pid(&config), None);
}

#[test]
fn read_pid_parses_a_written_pid_file() {
    let dir = tempdir().unwrap();
    let config = Config::load(dir.path());
    std::fs::create_dir_all(config.pid_path().parent().unwrap()).unwrap();
    std::fs::write(config.pid_path(), "4242\n").unwrap();

    assert_eq!(read_pid(&config), Some(4242));
}

#[test]
fn is_running_is_none_for_a_stale_unreachable_pid() {
    let dir = tempdir().unwrap();
    let config = Config::load(dir.path());
    std::fs::create_dir_all(config.pid_path().parent().unwrap()).unwrap();
    // A pid astronomically unlikely to be alive in this process namespace.
    std::fs::write(config.pid_path(), "999999\n").unwrap();

    assert_eq!(is_running(&config), None);
}
