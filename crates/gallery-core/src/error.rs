//! Error types for the gallery data-access layer.
//!
//! Catalog failures are returned as values and stored by the session so it
//! stays resumable. Image failures never leave the image loader; they turn
//! into a placeholder outcome instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the gallery library.
#[derive(Debug, Error)]
pub enum GalleryError {
    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// HTTP status when the server answered with a non-2xx code
        status: Option<u16>,
        /// Optional cause description
        cause: Option<String>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    // Response shape errors
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Failed to decode image: {message}")]
    ImageDecode { message: String },

    // Caller errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },
}

/// Result type alias for gallery operations.
pub type Result<T> = std::result::Result<T, GalleryError>;

/// Coarse classification of a failure, cheap to clone into published state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Connectivity, timeout, or non-2xx status.
    Network,
    /// Response body did not match the expected shape.
    Decode,
    /// Bytes did not parse as an image.
    ImageDecode,
    /// Caller or configuration error.
    Invalid,
}

/// The error recorded in session state after a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl SessionError {
    /// Whether trying the same fetch again can succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind == ErrorKind::Network
    }
}

impl From<&GalleryError> for SessionError {
    fn from(err: &GalleryError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for GalleryError {
    fn from(err: std::io::Error) -> Self {
        GalleryError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for GalleryError {
    fn from(err: serde_json::Error) -> Self {
        GalleryError::Decode {
            message: err.to_string(),
        }
    }
}

impl GalleryError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        GalleryError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GalleryError::Network { .. } | GalleryError::Timeout(_) | GalleryError::Io { .. } => {
                ErrorKind::Network
            }
            GalleryError::Decode { .. } => ErrorKind::Decode,
            GalleryError::ImageDecode { .. } => ErrorKind::ImageDecode,
            GalleryError::Validation { .. } | GalleryError::Config { .. } => ErrorKind::Invalid,
        }
    }

    /// Whether offering the user a manual retry makes sense.
    ///
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GalleryError::Network { .. } | GalleryError::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GalleryError::Network {
            message: "GET /artworks returned 503".into(),
            status: Some(503),
            cause: None,
        };
        assert_eq!(err.to_string(), "Network error: GET /artworks returned 503");

        let err = GalleryError::Decode {
            message: "missing field `data`".into(),
        };
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            GalleryError::Timeout(std::time::Duration::from_secs(1)).kind(),
            ErrorKind::Network
        );
        assert_eq!(
            GalleryError::Decode { message: String::new() }.kind(),
            ErrorKind::Decode
        );
        assert_eq!(
            GalleryError::ImageDecode { message: String::new() }.kind(),
            ErrorKind::ImageDecode
        );
        assert_eq!(
            GalleryError::Validation {
                field: "term".into(),
                message: "empty".into()
            }
            .kind(),
            ErrorKind::Invalid
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(GalleryError::Network {
            message: "offline".into(),
            status: None,
            cause: None,
        }
        .is_retryable());
        assert!(!GalleryError::Decode { message: String::new() }.is_retryable());
    }

    #[test]
    fn test_serde_error_maps_to_decode() {
        let err: GalleryError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_session_error_from_gallery_error() {
        let err = GalleryError::Network {
            message: "boom".into(),
            status: Some(500),
            cause: None,
        };
        let recorded = SessionError::from(&err);
        assert_eq!(recorded.kind, ErrorKind::Network);
        assert!(recorded.is_retryable());

        let decode = SessionError::from(&GalleryError::Decode {
            message: "missing field `id`".into(),
        });
        assert!(!decode.is_retryable());
        assert_eq!(recorded.message, "Network error: boom");
    }
}
