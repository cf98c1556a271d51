//! Comprehensive unit tests for config.rs module

use waymark_settings::config::AppConfig;

#[test]
fn test_default_config_values() {
    let config = AppConfig::default();

    assert_eq!(config.storage.data_dir, "data/preferences");
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file_path, None);
    assert_eq!(config.logging.format, "text");
    assert!(config.import.pretty);
}

#[test]
fn test_config_validation_success() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_empty_data_dir() {
    let mut config = AppConfig::default();
    config.storage.data_dir = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_traversal_in_data_dir() {
    let mut config = AppConfig::default();
    config.storage.data_dir = "../outside".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_invalid_log_level() {
    let mut config = AppConfig::default();
    config.logging.level = "invalid".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_valid_log_levels() {
    let valid_levels = vec!["trace", "debug", "info", "warn", "error"];
    for level in valid_levels {
        let mut config = AppConfig::default();
        config.logging.level = level.to_string();
        assert!(config.validate().is_ok(), "Failed for level: {}", level);
    }
}

#[test]
fn test_config_validation_invalid_log_format() {
    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_valid_log_formats() {
    let valid_formats = vec!["text", "json"];
    for format in valid_formats {
        let mut config = AppConfig::default();
        config.logging.format = format.to_string();
        assert!(config.validate().is_ok(), "Failed for format: {}", format);
    }
}

#[test]
fn test_get_log_level_prefers_env() {
    let config = AppConfig::default();
    // Without RUST_LOG set, the configured level wins
    if std::env::var("RUST_LOG").is_err() {
        assert_eq!(config.get_log_level(), "info");
    }
}
