//! Config serialize/load roundtrip integration tests.

use secretfile_core::config::{Config, LogLevel};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_config(path: &Path, config: &Config) {
    std::fs::write(path, serde_json::to_string_pretty(config).unwrap()).unwrap();
}

#[test]
fn test_config_default_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let config = Config::default();
    write_config(&path, &config);

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.cache, config.cache);
    assert_eq!(loaded.logging.level, config.logging.level);
    assert!(loaded.secrets_file.is_none());
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.cache.capacity = 3;
    config.cache.recheck_interval_ms = 250;
    config.secrets_file = Some(PathBuf::from("/var/lib/app/secrets.json"));
    config.logging.level = LogLevel::Debug;
    write_config(&path, &config);

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.cache.capacity, 3);
    assert_eq!(loaded.cache.recheck_interval_ms, 250);
    assert_eq!(
        loaded.secrets_file.as_deref(),
        Some(Path::new("/var/lib/app/secrets.json"))
    );
    assert_eq!(loaded.logging.level, LogLevel::Debug);
}

#[test]
fn test_config_load_json5_with_comments() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json5");
    std::fs::write(
        &path,
        r#"{
            // keep a handful of files around
            cache: { capacity: 4 },
            logging: { level: "info" },
        }"#,
    )
    .unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.cache.capacity, 4);
    assert_eq!(loaded.cache.recheck_interval_ms, 5000);
    assert_eq!(loaded.logging.level, LogLevel::Info);
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/config.json"));
    assert!(result.is_err());
}

#[test]
fn test_config_load_or_default_missing_file() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(&dir.path().join("absent.json5")).unwrap();
    assert_eq!(config.cache.capacity, 64);
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json");
    assert!(result.is_err());
}
