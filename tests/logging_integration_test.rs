//! Integration tests for logging functionality

use tempfile::TempDir;
use xtractor::config::LoggingConfig;
use xtractor::logging::init_logging;
use xtractor::{log_download_failure, log_record_complete, log_record_start};

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert!(!config.local_path.is_empty());
}

#[test]
fn test_invalid_level_is_rejected_before_install() {
    let err = init_logging("verbose", &LoggingConfig::default())
        .err()
        .unwrap();
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("verbose"));
}

// The only test in this binary that installs the global subscriber
#[test]
fn test_file_logging_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };
    assert!(!log_path.exists());

    let guard = init_logging("debug", &config).unwrap();
    log_record_start!(1, "/blog/my-post");
    log_record_complete!(1, "my-post", "out/Blog.Post/my-post/my-post.xml");
    log_download_failure!("my-post", "https://example.com/a.png", "HTTP 404");
    drop(guard);

    assert!(log_path.is_dir());
}
