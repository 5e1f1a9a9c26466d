//! Image loading: resolve, consult the cache, fetch, decode, store.
//!
//! Failures never escape as errors. Anything that goes wrong while loading
//! an image becomes [`ImageOutcome::Unavailable`] and the caller shows a
//! placeholder.

use super::cache::ImageCache;
use super::decode::{decode_data_uri, decode_image_bytes, DecodedImage};
use super::resolver::{ImageResolver, ImageSource};
use crate::config::{GalleryConfig, NetworkConfig};
use crate::error::{GalleryError, Result};
use crate::models::ArtworkSummary;
use crate::network::HttpClient;
use async_trait::async_trait;
use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Fetches raw image bytes for a remote URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}

/// [`ImageFetcher`] over HTTP with browser-like headers.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    http: HttpClient,
}

impl HttpImageFetcher {
    pub fn new() -> Result<Self> {
        let http = HttpClient::with_options(
            NetworkConfig::IMAGE_REQUEST_TIMEOUT,
            NetworkConfig::USER_AGENT,
            Some(NetworkConfig::REFERER),
        )?;
        Ok(Self { http })
    }

    pub fn from_config(config: &GalleryConfig) -> Result<Self> {
        let http = HttpClient::with_options(
            config.image_timeout,
            &config.user_agent,
            Some(&config.referer),
        )?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        self.http.get_bytes(url).await
    }
}

/// Result of an image request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Loaded(DecodedImage),
    /// No image could be produced; render a placeholder.
    Unavailable,
}

impl ImageOutcome {
    pub fn image(&self) -> Option<&DecodedImage> {
        match self {
            ImageOutcome::Loaded(image) => Some(image),
            ImageOutcome::Unavailable => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ImageOutcome::Loaded(_))
    }
}

impl From<Option<DecodedImage>> for ImageOutcome {
    fn from(image: Option<DecodedImage>) -> Self {
        image.map_or(ImageOutcome::Unavailable, ImageOutcome::Loaded)
    }
}

type InFlight = Shared<BoxFuture<'static, Option<DecodedImage>>>;
type InFlightMap = Arc<Mutex<HashMap<String, InFlight>>>;

fn lock_in_flight(map: &Mutex<HashMap<String, InFlight>>) -> MutexGuard<'_, HashMap<String, InFlight>> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Loads artwork images through the shared [`ImageCache`].
///
/// Concurrent requests for the same remote URL share a single fetch.
pub struct ImageLoader<F: ImageFetcher = HttpImageFetcher> {
    fetcher: Arc<F>,
    cache: Arc<ImageCache>,
    resolver: ImageResolver,
    in_flight: InFlightMap,
}

impl ImageLoader<HttpImageFetcher> {
    /// Create a loader with an HTTP fetcher configured from `config`.
    pub fn from_config(config: &GalleryConfig, cache: Arc<ImageCache>) -> Result<Self> {
        Ok(Self::new(
            Arc::new(HttpImageFetcher::from_config(config)?),
            cache,
            ImageResolver::from_config(config),
        ))
    }
}

impl<F: ImageFetcher + 'static> ImageLoader<F> {
    pub fn new(fetcher: Arc<F>, cache: Arc<ImageCache>, resolver: ImageResolver) -> Self {
        Self {
            fetcher,
            cache,
            resolver,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn cache(&self) -> &Arc<ImageCache> {
        &self.cache
    }

    /// Load the image for an artwork.
    pub async fn load(&self, summary: &ArtworkSummary) -> ImageOutcome {
        let source = self.resolver.resolve(summary);
        self.load_source(&source).await
    }

    /// Load an already resolved image source.
    pub async fn load_source(&self, source: &ImageSource) -> ImageOutcome {
        match source {
            ImageSource::None => ImageOutcome::Unavailable,
            ImageSource::Inline(uri) => self.load_inline(uri).into(),
            ImageSource::Remote(url) => self.load_remote(url).await.into(),
        }
    }

    fn load_inline(&self, uri: &str) -> Option<DecodedImage> {
        if let Some(image) = self.cache.get(uri) {
            return Some(image);
        }

        match decode_data_uri(uri) {
            Ok(image) => {
                self.cache.put(uri, image.clone(), image.cost_bytes());
                Some(image)
            }
            Err(e) => {
                debug!("Inline image unusable: {}", e);
                None
            }
        }
    }

    async fn load_remote(&self, url: &str) -> Option<DecodedImage> {
        if let Some(image) = self.cache.get(url) {
            return Some(image);
        }

        let request = {
            let mut in_flight = lock_in_flight(&self.in_flight);
            match in_flight.get(url) {
                Some(existing) => existing.clone(),
                None => {
                    let request = self.spawn_request(url.to_string());
                    in_flight.insert(url.to_string(), request.clone());
                    request
                }
            }
        };

        request.await
    }

    /// Start the fetch on its own task so it finishes and leaves the
    /// in-flight map even when every waiter has gone away.
    fn spawn_request(&self, url: String) -> InFlight {
        let fetcher = Arc::clone(&self.fetcher);
        let cache = Arc::clone(&self.cache);
        let in_flight = Arc::clone(&self.in_flight);

        let task = tokio::spawn(async move {
            let image = match fetch_and_decode(fetcher.as_ref(), &url).await {
                Ok(image) => {
                    cache.put(url.clone(), image.clone(), image.cost_bytes());
                    Some(image)
                }
                Err(e) => {
                    debug!("Image {} unavailable: {}", url, e);
                    None
                }
            };
            // Cached before leaving the map so later callers hit the cache
            lock_in_flight(&in_flight).remove(&url);
            image
        });

        async move {
            task.await.unwrap_or_else(|e| {
                debug!("Image task failed: {}", e);
                None
            })
        }
        .boxed()
        .shared()
    }
}

async fn fetch_and_decode<F: ImageFetcher + ?Sized>(fetcher: &F, url: &str) -> Result<DecodedImage> {
    let bytes = fetcher.fetch(url).await?;
    tokio::task::spawn_blocking(move || decode_image_bytes(&bytes))
        .await
        .map_err(|e| GalleryError::ImageDecode {
            message: format!("decode task failed: {}", e),
        })?
}
