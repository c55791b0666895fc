//! Tests for the layered configuration manager

use std::fs;
use tempfile::TempDir;
use treehash_cli::{ConfigManager, OutputFormat};
use treehash_core::{DEFAULT_EXCLUDE_PATTERN, HashAlgorithm};

fn manager(dir: &TempDir) -> ConfigManager {
    ConfigManager::with_path(dir.path().join("nested").join("config.toml"))
}

#[test]
fn test_defaults_without_file() {
    let dir = TempDir::new().unwrap();
    let config = manager(&dir).load().unwrap();

    assert_eq!(config.scan.algorithm, HashAlgorithm::Md5);
    assert_eq!(config.scan.exclude, DEFAULT_EXCLUDE_PATTERN);
    assert_eq!(config.scan.max_hash_size, None);
    assert_eq!(config.output.format, OutputFormat::Text);
    assert!(!config.output.stats);
}

#[test]
fn test_set_creates_file_and_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let mut manager = manager(&dir);

    manager.set("scan.workers", "6").unwrap();
    manager.set("scan.algorithm", "blake3").unwrap();
    manager.set("output.stats", "true").unwrap();

    let content = fs::read_to_string(manager.get_config_path()).unwrap();
    assert!(content.contains("workers = 6"));

    let config = manager.load().unwrap();
    assert_eq!(config.scan.workers, 6);
    assert_eq!(config.scan.algorithm, HashAlgorithm::Blake3);
    assert!(config.output.stats);
}

#[test]
fn test_set_preserves_other_keys() {
    let dir = TempDir::new().unwrap();
    let mut manager = manager(&dir);

    manager.set("scan.max_hash_size", "1MiB").unwrap();
    manager.set("output.format", "csv").unwrap();
    manager.set("scan.exclude", r"\.tmp$").unwrap();

    let config = manager.load().unwrap();
    assert_eq!(config.scan.max_hash_size, Some(1024 * 1024));
    assert_eq!(config.scan.exclude, r"\.tmp$");
    assert_eq!(config.output.format, OutputFormat::Csv);
}

#[test]
fn test_set_rejects_invalid_values_without_writing() {
    let dir = TempDir::new().unwrap();
    let mut manager = manager(&dir);

    assert!(manager.set("scan.workers", "0").is_err());
    assert!(manager.set("scan.exclude", "[").is_err());
    assert!(manager.set("output.format", "xml").is_err());
    assert!(!manager.get_config_path().exists());
}

#[test]
fn test_get_values() {
    let dir = TempDir::new().unwrap();
    let mut manager = manager(&dir);

    assert_eq!(manager.get("scan.algorithm").unwrap(), "md5");
    assert_eq!(manager.get("scan.max_hash_size").unwrap(), "unset");
    assert!(manager.get("scan.nonsense").is_err());

    manager.set("scan.queue_capacity", "128").unwrap();
    assert_eq!(manager.get("scan.queue_capacity").unwrap(), "128");
}

#[test]
fn test_list_is_sorted_and_flat() {
    let dir = TempDir::new().unwrap();
    let items = manager(&dir).list().unwrap();

    let keys: Vec<&str> = items.iter().map(|(k, _)| k.as_str()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert!(keys.contains(&"scan.workers"));
    assert!(keys.contains(&"output.format"));
    assert!(!keys.contains(&"scan.max_hash_size"));
}

#[test]
fn test_invalid_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let manager = manager(&dir);
    fs::create_dir_all(manager.get_config_path().parent().unwrap()).unwrap();
    fs::write(manager.get_config_path(), "[scan]\nworkers = \"lots\"\n").unwrap();

    let error = manager.load().unwrap_err();
    assert!(format!("{error:#}").contains("config.toml"));
}
