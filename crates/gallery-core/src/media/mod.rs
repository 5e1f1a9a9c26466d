//! Artwork images: source resolution, decoding, caching, and loading.
//!
//! - `resolver` picks the inline placeholder or the remote URL
//! - `cache` bounds decoded images by entry count and byte cost
//! - `loader` ties them together and never surfaces image failures

mod cache;
mod decode;
mod loader;
mod resolver;

pub use cache::{CacheEntry, CacheStats, ImageCache};
pub use decode::{decode_data_uri, decode_image_bytes, is_inline_image_uri, DecodedImage};
pub use loader::{HttpImageFetcher, ImageFetcher, ImageLoader, ImageOutcome};
pub use resolver::{ImageResolver, ImageSource};
