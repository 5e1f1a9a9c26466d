//! Integration tests for loading configuration files.

use gallery_core::{CatalogClient, CatalogSession, GalleryConfig};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_partial_config_file_uses_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("gallery.json");
    std::fs::write(
        &path,
        r#"{"page_size": 12, "search_debounce": 250, "cache_max_entries": 8}"#,
    )
    .unwrap();

    let config = GalleryConfig::from_json_file(&path).unwrap();
    assert_eq!(config.page_size, 12);
    assert_eq!(config.search_debounce, Duration::from_millis(250));
    assert_eq!(config.cache_max_entries, 8);
    assert_eq!(config.api_base_url, GalleryConfig::default().api_base_url);

    let client = CatalogClient::from_config(&config).unwrap();
    let session = CatalogSession::from_config(Arc::new(client), &config);
    assert_eq!(session.page_size(), 12);
}

#[test]
fn test_missing_config_file_is_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    assert!(GalleryConfig::from_json_file(temp_dir.path().join("missing.json")).is_err());
}
