use super::*;
use tempfile::tempdir;

#[tokio::test]
async fn unknown_scanner_reports_exit_error() {
    let dir = tempdir().unwrap();
    let err = run(dir.path(), "does-not-exist").await.unwrap_err();

    let exit_err = err.downcast_ref::<ExitError>().unwrap();
    assert_eq!(exit_err.code, 2);
    assert!(exit_err.message.contains("does-not-exist"));
}
