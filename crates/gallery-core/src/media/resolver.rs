//! Decides where an artwork's image comes from.
//!
//! The inline placeholder always wins over the remote image: it needs no
//! network round-trip and sidesteps the image edge rejecting requests.

use super::decode::is_inline_image_uri;
use crate::config::{ApiConfig, GalleryConfig};
use crate::models::ArtworkSummary;

/// Where to get the pixels for an artwork.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// Embedded `data:image/...` URI.
    Inline(String),
    /// Remote image URL.
    Remote(String),
    /// Nothing to show.
    None,
}

impl ImageSource {
    /// The string identifying this source in the image cache.
    pub fn key(&self) -> Option<&str> {
        match self {
            ImageSource::Inline(uri) => Some(uri),
            ImageSource::Remote(url) => Some(url),
            ImageSource::None => None,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ImageSource::Remote(_))
    }
}

/// Builds [`ImageSource`]s from artwork summaries.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    base_url: String,
    width: u32,
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new(ApiConfig::IMAGE_BASE_URL, ApiConfig::DEFAULT_IMAGE_WIDTH)
    }
}

impl ImageResolver {
    pub fn new(base_url: impl Into<String>, width: u32) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            width,
        }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(config.image_base_url.clone(), config.image_width)
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Remote URL for an image id at the configured width.
    pub fn remote_url(&self, image_id: &str) -> String {
        format!(
            "{}/{}/full/{},/0/default.jpg",
            self.base_url, image_id, self.width
        )
    }

    /// Resolve the image source for `summary`.
    pub fn resolve(&self, summary: &ArtworkSummary) -> ImageSource {
        let inline = summary
            .thumbnail
            .as_ref()
            .and_then(|t| t.inline_data_uri.as_deref())
            .filter(|uri| is_inline_image_uri(uri));
        if let Some(uri) = inline {
            return ImageSource::Inline(uri.to_string());
        }

        match summary.image_id.as_deref() {
            Some(image_id) if !image_id.is_empty() => {
                ImageSource::Remote(self.remote_url(image_id))
            }
            _ => ImageSource::None,
        }
    }
}
