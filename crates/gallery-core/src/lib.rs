//! Gallery Core - Headless data-access layer for an artwork catalog.
//!
//! This crate pages through the catalog listing or a keyword search,
//! resolves and decodes artwork images, and keeps decoded images in a
//! bounded in-memory cache. It has no UI of its own; front ends observe
//! the published session state.
//!
//! # Example
//!
//! ```rust,ignore
//! use gallery_core::{CatalogClient, CatalogSession, GalleryConfig, ImageCache, ImageLoader};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> gallery_core::Result<()> {
//!     let config = GalleryConfig::default();
//!     let client = Arc::new(CatalogClient::from_config(&config)?);
//!     let session = Arc::new(CatalogSession::from_config(client, &config));
//!
//!     session.apply_search_term("water lilies").await;
//!     let state = session.state();
//!     println!("{} results so far", state.items.len());
//!
//!     let loader = ImageLoader::from_config(&config, Arc::new(ImageCache::from_config(&config)))?;
//!     if let Some(first) = state.items.first() {
//!         let outcome = loader.load(first).await;
//!         println!("image loaded: {}", outcome.is_loaded());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod media;
pub mod models;
pub mod network;
pub mod session;

// Re-export commonly used types
pub use config::GalleryConfig;
pub use error::{ErrorKind, GalleryError, Result, SessionError};
pub use media::{
    CacheStats, DecodedImage, HttpImageFetcher, ImageCache, ImageFetcher, ImageLoader,
    ImageOutcome, ImageResolver, ImageSource,
};
pub use models::{ArtworkDetail, ArtworkSummary, Mode, Page, Scope};
pub use network::{CatalogClient, CatalogSource};
pub use session::{
    CatalogSession, DetailLoader, DetailState, FetchOutcome, SessionPhase, SessionState,
};
