//! Catalog client for the remote artwork API.
//!
//! Turns a [`Scope`], a page number, and a page size into a decoded
//! [`Page`]. It owns URL construction and response decoding only: no
//! pagination bookkeeping, no caching, no retry. One request per call.

use super::client::HttpClient;
use crate::config::{ApiConfig, GalleryConfig};
use crate::error::{GalleryError, Result};
use crate::models::{ArtworkDetail, DetailResponse, ListResponse, Page, Scope};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Source of catalog pages and artwork details.
///
/// [`CatalogClient`] talks HTTP; tests and embedders can plug in their own.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one page of results for `scope`.
    ///
    /// `page` and `page_size` are positive. An empty search term is a
    /// caller error; route it to [`Scope::Browse`] instead.
    async fn fetch_page(&self, scope: &Scope, page: u32, page_size: u32) -> Result<Page>;

    /// Fetch the extended record for a single artwork.
    async fn fetch_detail(&self, id: i64) -> Result<ArtworkDetail>;
}

/// HTTP implementation of [`CatalogSource`].
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: HttpClient,
    base_url: String,
}

impl CatalogClient {
    /// Create a client against the public catalog API.
    pub fn new() -> Result<Self> {
        Self::with_base_url(ApiConfig::BASE_URL)
    }

    /// Create a client against a different API base (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            base_url: normalize_base(base_url.into()),
        })
    }

    /// Create a client from runtime configuration.
    pub fn from_config(config: &GalleryConfig) -> Result<Self> {
        let http = HttpClient::with_options(config.request_timeout, &config.user_agent, None)?;
        Ok(Self {
            http,
            base_url: normalize_base(config.api_base_url.clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL for one page of `scope`.
    pub fn page_url(&self, scope: &Scope, page: u32, page_size: u32) -> Result<String> {
        validate_positive("page", page)?;
        validate_positive("page_size", page_size)?;

        match scope {
            Scope::Browse => Ok(format!(
                "{}/artworks?page={}&limit={}&fields={}",
                self.base_url,
                page,
                page_size,
                ApiConfig::LIST_FIELDS
            )),
            Scope::Search(term) => {
                if term.is_empty() {
                    return Err(GalleryError::Validation {
                        field: "term".into(),
                        message: "empty search term; browse instead".into(),
                    });
                }
                Ok(format!(
                    "{}/artworks/search?q={}&page={}&limit={}&fields={}",
                    self.base_url,
                    urlencoding::encode(term),
                    page,
                    page_size,
                    ApiConfig::LIST_FIELDS
                ))
            }
        }
    }

    /// Build the URL for an artwork's detail record.
    pub fn detail_url(&self, id: i64) -> String {
        format!(
            "{}/artworks/{}?fields={}",
            self.base_url,
            id,
            ApiConfig::DETAIL_FIELDS
        )
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_page(&self, scope: &Scope, page: u32, page_size: u32) -> Result<Page> {
        let url = self.page_url(scope, page, page_size)?;
        debug!("Fetching {} page {} (limit {})", scope, page, page_size);

        let response: ListResponse = self.http.get_json(&url).await.map_err(|e| {
            warn!("Catalog fetch for {} page {} failed: {}", scope, page, e);
            e
        })?;

        Ok(Page::from(response))
    }

    async fn fetch_detail(&self, id: i64) -> Result<ArtworkDetail> {
        let url = self.detail_url(id);
        debug!("Fetching detail for artwork {}", id);

        let response: DetailResponse = self.http.get_json(&url).await.map_err(|e| {
            warn!("Detail fetch for artwork {} failed: {}", id, e);
            e
        })?;

        Ok(response.data)
    }
}

fn normalize_base(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

fn validate_positive(field: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(GalleryError::Validation {
            field: field.into(),
            message: "must be a positive integer".into(),
        });
    }
    Ok(())
}
