use spotinline::config::{ConfigError, load_env_file};

#[test]
fn test_missing_env_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();

    assert!(load_env_file(&dir.path().join(".env")).is_ok());
}

#[test]
fn test_env_file_values_are_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "# comment\nSPOTINLINE_TEST_LOADED_VALUE=from-file\n").unwrap();

    load_env_file(&path).unwrap();

    assert_eq!(
        std::env::var("SPOTINLINE_TEST_LOADED_VALUE").as_deref(),
        Ok("from-file")
    );
}

#[test]
fn test_malformed_env_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "this is not an assignment\n").unwrap();

    let err = load_env_file(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Invalid { key: ".env", .. }));
}
