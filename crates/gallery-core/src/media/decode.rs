//! Image payload decoding.

use crate::error::{GalleryError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;

/// Prefix every usable inline placeholder starts with.
pub const DATA_URI_IMAGE_PREFIX: &str = "data:image/";

/// Decoded RGBA8 pixels.
///
/// Cloning shares the pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Bytes,
}

impl DecodedImage {
    /// Memory held by the pixel buffer, used as the cache cost.
    pub fn cost_bytes(&self) -> u64 {
        self.pixels.len() as u64
    }
}

/// Marker between the media type and a base64 payload.
const BASE64_MARKER: &str = ";base64,";

/// Whether `uri` is a base64 embedded image URI with a payload section.
///
/// Percent-encoded data URIs are not inline images here; they are mostly
/// SVG, which is not decodable into pixels.
pub fn is_inline_image_uri(uri: &str) -> bool {
    uri.starts_with(DATA_URI_IMAGE_PREFIX) && uri.contains(BASE64_MARKER)
}

/// Decode encoded image bytes (JPEG, PNG, GIF, WebP) into RGBA pixels.
pub fn decode_image_bytes(data: &[u8]) -> Result<DecodedImage> {
    let img = image::load_from_memory(data).map_err(|e| GalleryError::ImageDecode {
        message: e.to_string(),
    })?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(DecodedImage {
        width,
        height,
        pixels: Bytes::from(rgba.into_raw()),
    })
}

/// Decode a `data:image/...;base64,` URI.
pub fn decode_data_uri(uri: &str) -> Result<DecodedImage> {
    if !is_inline_image_uri(uri) {
        return Err(GalleryError::ImageDecode {
            message: "not an embedded image URI".into(),
        });
    }

    // Checked above
    let Some((_, payload)) = uri.split_once(BASE64_MARKER) else {
        return Err(GalleryError::ImageDecode {
            message: "missing payload".into(),
        });
    };

    let data = STANDARD
        .decode(payload.trim())
        .map_err(|e| GalleryError::ImageDecode {
            message: format!("invalid base64 payload: {}", e),
        })?;

    decode_image_bytes(&data)
}
