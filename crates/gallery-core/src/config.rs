//! Centralized configuration for the gallery library.
//!
//! Constants live in unit structs grouped by concern. [`GalleryConfig`] is
//! the runtime view of the same values and can be loaded from a JSON file.

use crate::error::{GalleryError, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::path::Path;
use std::time::Duration;

/// Remote catalog API endpoints and projections.
pub struct ApiConfig;

impl ApiConfig {
    pub const BASE_URL: &'static str = "https://api.artic.edu/api/v1";
    pub const IMAGE_BASE_URL: &'static str = "https://www.artic.edu/iiif/2";
    pub const LIST_FIELDS: &'static str =
        "id,title,artist_display,date_display,image_id,thumbnail";
    pub const DETAIL_FIELDS: &'static str = "id,title,artist_display,date_display,image_id,thumbnail,medium_display,dimensions,credit_line,publication_history,exhibition_history,provenance_text,artist_id,artist_title";
    pub const DEFAULT_PAGE_SIZE: u32 = 20;
    /// Width recommended by the image provider.
    pub const DEFAULT_IMAGE_WIDTH: u32 = 843;
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
    pub const IMAGE_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    /// The image edge rejects requests without a browser-like agent.
    pub const USER_AGENT: &'static str =
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
    pub const REFERER: &'static str = "https://www.artic.edu/";
}

/// Catalog session timing.
pub struct SessionConfig;

impl SessionConfig {
    pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);
}

/// Image cache budgets.
pub struct ImageCacheConfig;

impl ImageCacheConfig {
    pub const MAX_ENTRIES: usize = 100;
    pub const MAX_COST_BYTES: u64 = 50 * 1024 * 1024; // 50 MiB
}

/// Runtime configuration for the catalog client, session, and image loader.
///
/// Durations are written as milliseconds.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GalleryConfig {
    pub api_base_url: String,
    pub image_base_url: String,
    pub page_size: u32,
    pub image_width: u32,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub search_debounce: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub request_timeout: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub image_timeout: Duration,
    pub user_agent: String,
    pub referer: String,
    pub cache_max_entries: usize,
    pub cache_max_cost_bytes: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            api_base_url: ApiConfig::BASE_URL.to_string(),
            image_base_url: ApiConfig::IMAGE_BASE_URL.to_string(),
            page_size: ApiConfig::DEFAULT_PAGE_SIZE,
            image_width: ApiConfig::DEFAULT_IMAGE_WIDTH,
            search_debounce: SessionConfig::SEARCH_DEBOUNCE,
            request_timeout: NetworkConfig::REQUEST_TIMEOUT,
            image_timeout: NetworkConfig::IMAGE_REQUEST_TIMEOUT,
            user_agent: NetworkConfig::USER_AGENT.to_string(),
            referer: NetworkConfig::REFERER.to_string(),
            cache_max_entries: ImageCacheConfig::MAX_ENTRIES,
            cache_max_cost_bytes: ImageCacheConfig::MAX_COST_BYTES,
        }
    }
}

impl GalleryConfig {
    /// Load and validate a configuration from a JSON file.
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| GalleryError::io_with_path(e, path))?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| GalleryError::Config {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = url.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_image_width(mut self, width: u32) -> Self {
        self.image_width = width;
        self
    }

    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }

    pub fn with_cache_budget(mut self, max_entries: usize, max_cost_bytes: u64) -> Self {
        self.cache_max_entries = max_entries;
        self.cache_max_cost_bytes = max_cost_bytes;
        self
    }

    /// Reject values the rest of the crate cannot work with.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("api_base_url", &self.api_base_url),
            ("image_base_url", &self.image_base_url),
        ] {
            url::Url::parse(value).map_err(|e| GalleryError::Config {
                message: format!("{} is not a valid URL ({}): {}", field, value, e),
            })?;
        }
        if self.page_size == 0 {
            return Err(GalleryError::Config {
                message: "page_size must be positive".into(),
            });
        }
        if self.image_width == 0 {
            return Err(GalleryError::Config {
                message: "image_width must be positive".into(),
            });
        }
        if self.cache_max_entries == 0 || self.cache_max_cost_bytes == 0 {
            return Err(GalleryError::Config {
                message: "cache budgets must be positive".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = GalleryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, 20);
        assert_eq!(config.image_width, 843);
        assert_eq!(config.search_debounce, Duration::from_millis(500));
        assert_eq!(config.cache_max_entries, 100);
        assert_eq!(config.cache_max_cost_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let config = GalleryConfig::default().with_page_size(0);
        assert!(matches!(config.validate(), Err(GalleryError::Config { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = GalleryConfig::default().with_api_base_url("not a url");
        assert!(matches!(config.validate(), Err(GalleryError::Config { .. })));
    }

    #[test]
    fn test_from_json_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"page_size": 50, "search_debounce": 250}}"#).unwrap();

        let config = GalleryConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.search_debounce, Duration::from_millis(250));
        assert_eq!(config.api_base_url, ApiConfig::BASE_URL);
    }

    #[test]
    fn test_durations_serialize_as_millis() {
        let config = GalleryConfig::default().with_search_debounce(Duration::from_millis(750));
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["search_debounce"], 750);
        assert_eq!(value["request_timeout"], 15_000);
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = GalleryConfig::from_json_file("/nonexistent/gallery.json");
        assert!(matches!(result, Err(GalleryError::Io { .. })));
    }

    #[test]
    fn test_from_json_file_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"image_width": 0}}"#).unwrap();
        assert!(GalleryConfig::from_json_file(file.path()).is_err());
    }
}
