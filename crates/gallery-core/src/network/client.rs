//! HTTP client wrapper shared by the catalog client and the image fetcher.
//!
//! Provides a thin layer over reqwest with:
//! - Configurable timeouts and user agent
//! - Default headers (the image edge wants a referer)
//! - Non-2xx statuses turned into [`GalleryError::Network`]
//! - JSON bodies decoded into [`GalleryError::Decode`] on mismatch

use crate::config::NetworkConfig;
use crate::{GalleryError, Result};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// HTTP client with a fixed timeout and identity.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    /// Default timeout for requests.
    default_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_timeout(NetworkConfig::REQUEST_TIMEOUT)
    }

    /// Create a new HTTP client with a custom default timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::with_options(timeout, NetworkConfig::USER_AGENT, None)
    }

    /// Create a new HTTP client with a custom timeout, user agent, and
    /// optional referer sent on every request.
    pub fn with_options(
        timeout: Duration,
        user_agent: &str,
        referer: Option<&str>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(referer) = referer {
            let value = HeaderValue::from_str(referer).map_err(|e| GalleryError::Config {
                message: format!("Invalid referer header {}: {}", referer, e),
            })?;
            headers.insert(REFERER, value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| GalleryError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                status: None,
                cause: None,
            })?;

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Make a GET request. Fails on transport errors and non-2xx statuses.
    pub async fn get(&self, url: &str) -> Result<Response> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error("GET", url, e))?;

        check_response_status(response, url)
    }

    /// GET a URL and decode its JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get_bytes(url).await?;
        serde_json::from_slice(&body).map_err(|e| GalleryError::Decode {
            message: format!("Unexpected response from {}: {}", extract_domain(url), e),
        })
    }

    /// GET a URL and return the raw body.
    pub async fn get_bytes(&self, url: &str) -> Result<Bytes> {
        let response = self.get(url).await?;
        response
            .bytes()
            .await
            .map_err(|e| self.transport_error("GET", url, e))
    }

    fn transport_error(&self, method: &str, url: &str, err: reqwest::Error) -> GalleryError {
        if err.is_timeout() {
            GalleryError::Timeout(self.default_timeout)
        } else {
            GalleryError::Network {
                message: format!("{} {} failed: {}", method, url, err),
                status: None,
                cause: Some(err.to_string()),
            }
        }
    }
}

fn check_response_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(GalleryError::Network {
        message: format!("{} returned {}", url, status),
        status: Some(status.as_u16()),
        cause: None,
    })
}

/// Extract domain from a URL.
pub fn extract_domain(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.host_str().unwrap_or("unknown").to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_extract_domain() {
        assert_eq!(
            extract_domain("https://api.artic.edu/api/v1/artworks"),
            "api.artic.edu"
        );
        assert_eq!(extract_domain("invalid-url"), "unknown");
    }

    #[tokio::test]
    async fn test_slow_body_is_timeout() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/slow")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(2));
                w.write_all(b"late")
            })
            .create_async()
            .await;

        let client = HttpClient::with_timeout(Duration::from_millis(200)).unwrap();
        let err = client
            .get_bytes(&format!("{}/slow", server.url()))
            .await
            .unwrap_err();

        assert!(matches!(err, GalleryError::Timeout(t) if t == Duration::from_millis(200)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_invalid_referer_is_config_error() {
        let result = HttpClient::with_options(Duration::from_secs(1), "ua", Some("bad\nvalue"));
        assert!(matches!(result, Err(GalleryError::Config { .. })));
    }

    #[tokio::test]
    async fn test_non_success_status_is_network_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let err = client
            .get(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();

        match err {
            GalleryError::Network { status, .. } => assert_eq!(status, Some(404)),
            other => panic!("unexpected error: {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_headers_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("user-agent", "gallery-test")
            .match_header("referer", "https://www.artic.edu/")
            .with_status(200)
            .with_body("pong")
            .create_async()
            .await;

        let client = HttpClient::with_options(
            Duration::from_secs(5),
            "gallery-test",
            Some("https://www.artic.edu/"),
        )
        .unwrap();
        let body = client
            .get_bytes(&format!("{}/ping", server.url()))
            .await
            .unwrap();

        assert_eq!(&body[..], b"pong");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_json_decode_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/json")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let result: Result<serde_json::Value> =
            client.get_json(&format!("{}/json", server.url())).await;
        assert!(matches!(result, Err(GalleryError::Decode { .. })));
    }
}
