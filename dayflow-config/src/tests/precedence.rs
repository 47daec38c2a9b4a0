//! Tests for configuration precedence order

use crate::ConfigProvider;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

#[test]
#[serial]
fn test_environment_overrides_files() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("dayflow.toml"),
        r#"
[lock]
timeout_secs = 120

[rate_limit]
max_requests = 10
"#,
    )
    .unwrap();

    std::env::set_var("DAYFLOW_LOCK__TIMEOUT_SECS", "300");
    std::env::set_var("DAYFLOW_DATABASE__PATH", "/tmp/dayflow-env.db");

    let result = ConfigProvider::with_config_dir(temp_dir.path()).load();

    std::env::remove_var("DAYFLOW_LOCK__TIMEOUT_SECS");
    std::env::remove_var("DAYFLOW_DATABASE__PATH");

    let config = result.unwrap();
    assert_eq!(config.lock.timeout_secs, 300);
    assert_eq!(
        config.database.path.as_deref(),
        Some(std::path::Path::new("/tmp/dayflow-env.db"))
    );
    // File-only value should still be present
    assert_eq!(config.rate_limit.max_requests, 10);
}

#[test]
#[serial]
fn test_json_overrides_toml() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("dayflow.toml"),
        "[limits]\nmax_tools_per_workspace = 7\nmax_roadmap_nodes = 9\n",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("dayflow.json"),
        serde_json::json!({"limits": {"max_tools_per_workspace": 8}}).to_string(),
    )
    .unwrap();

    let config = ConfigProvider::with_config_dir(temp_dir.path())
        .load()
        .unwrap();
    assert_eq!(config.limits.max_tools_per_workspace, 8);
    assert_eq!(config.limits.max_roadmap_nodes, 9);
}

#[test]
#[serial]
fn test_invalid_env_value_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    std::env::set_var("DAYFLOW_LIMITS__MAX_COLUMNS_PER_WORKSPACE", "0");

    let result = ConfigProvider::with_config_dir(temp_dir.path()).load();

    std::env::remove_var("DAYFLOW_LIMITS__MAX_COLUMNS_PER_WORKSPACE");

    let err = result.unwrap_err();
    assert!(err
        .to_string()
        .contains("limits.max_columns_per_workspace"));
}
