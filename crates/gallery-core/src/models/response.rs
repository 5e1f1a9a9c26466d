//! Catalog API response envelopes and the decoded [`Page`].

use super::artwork::{ArtworkDetail, ArtworkSummary};
use serde::{Deserialize, Serialize};

/// Pagination block shared by list and search responses.
///
/// `current_page` and `total_pages` are 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub limit: u32,
    #[serde(default)]
    pub offset: u64,
    pub total_pages: u32,
    pub current_page: u32,
    #[serde(default)]
    pub next_url: Option<String>,
    #[serde(default)]
    pub prev_url: Option<String>,
}

/// The `config` block of every response.
///
/// The image base it carries is not used; image URLs come from a fixed
/// template instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiImageConfig {
    pub iiif_url: String,
    #[serde(default)]
    pub website_url: Option<String>,
}

/// Envelope of the list and search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    pub pagination: Pagination,
    pub data: Vec<ArtworkSummary>,
    pub config: ApiImageConfig,
}

/// Envelope of the detail endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailResponse {
    pub data: ArtworkDetail,
    pub config: ApiImageConfig,
}

/// One decoded page of catalog results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<ArtworkSummary>,
    pub total_pages: u32,
    pub current_page: u32,
    /// Total number of matching records across all pages.
    pub total: u64,
    pub next_url: Option<String>,
}

impl Page {
    /// `true` once `current_page` has run past `total_pages`.
    pub fn is_exhausted(&self) -> bool {
        self.current_page > self.total_pages
    }

    /// Whether a page after this one exists.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

impl From<ListResponse> for Page {
    fn from(response: ListResponse) -> Self {
        Self {
            items: response.data,
            total_pages: response.pagination.total_pages,
            current_page: response.pagination.current_page,
            total: response.pagination.total,
            next_url: response.pagination.next_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_JSON: &str = r#"{
        "pagination": {
            "total": 128194,
            "limit": 2,
            "offset": 0,
            "total_pages": 64097,
            "current_page": 1,
            "next_url": "https://api.artic.edu/api/v1/artworks?page=2&limit=2"
        },
        "data": [
            {"id": 1, "title": "First"},
            {"id": 2, "title": "Second", "date_display": "1890"}
        ],
        "info": {"license_text": "ignored"},
        "config": {
            "iiif_url": "https://www.artic.edu/iiif/2",
            "website_url": "http://www.artic.edu"
        }
    }"#;

    #[test]
    fn test_list_response_to_page() {
        let response: ListResponse = serde_json::from_str(LIST_JSON).unwrap();
        assert_eq!(response.config.iiif_url, "https://www.artic.edu/iiif/2");

        let page = Page::from(response);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_pages, 64097);
        assert_eq!(page.total, 128194);
        assert!(page.has_next());
        assert!(!page.is_exhausted());
    }

    #[test]
    fn test_one_bad_record_fails_the_page() {
        let json = r#"{
            "pagination": {"total": 2, "limit": 2, "offset": 0, "total_pages": 1, "current_page": 1},
            "data": [{"id": 1, "title": "Fine"}, {"id": "two", "title": "Broken"}],
            "config": {"iiif_url": "https://www.artic.edu/iiif/2"}
        }"#;
        assert!(serde_json::from_str::<ListResponse>(json).is_err());
    }

    #[test]
    fn test_missing_pagination_fails() {
        let json = r#"{"data": [], "config": {"iiif_url": "x"}}"#;
        assert!(serde_json::from_str::<ListResponse>(json).is_err());
    }

    #[test]
    fn test_exhaustion() {
        let page = Page {
            items: vec![],
            total_pages: 3,
            current_page: 4,
            total: 60,
            next_url: None,
        };
        assert!(page.is_exhausted());
        assert!(!page.has_next());
    }
}
