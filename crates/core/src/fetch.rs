//! Content fetching from URLs and local files.
//!
//! Fetching is a single attempt by design of the pipeline: a timeout, a refused
//! connection or a non-2xx status is reported once and never retried.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use serde::de::DeserializeOwned;
#[cfg(feature = "fetch")]
use url::Url;

use crate::{LinkpressError, Result};

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
            user_agent: "Mozilla/5.0 (compatible; Linkpress/0.3; offline reading digest)".to_string(),
        }
    }
}

impl FetchConfig {
    /// Default configuration with a caller-chosen timeout.
    pub fn with_timeout(timeout: u64) -> Self {
        Self { timeout, ..Default::default() }
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Fetches HTML content from a URL with one GET request.
///
/// Follows redirects and applies the configured timeout to the whole
/// request. Any status outside 2xx is an error.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let response = send(url, config, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8").await?;
    response.text().await.map_err(|e| map_transport_error(e, config))
}

/// Fetches and decodes a JSON document with one GET request.
#[cfg(feature = "fetch")]
pub async fn fetch_json<T: DeserializeOwned>(url: &str, config: &FetchConfig) -> Result<T> {
    let response = send(url, config, "application/json").await?;
    response.json::<T>().await.map_err(|e| map_transport_error(e, config))
}

#[cfg(feature = "fetch")]
async fn send(url: &str, config: &FetchConfig, accept: &str) -> Result<reqwest::Response> {
    let parsed_url = Url::parse(url).map_err(|e| LinkpressError::InvalidUrl(e.to_string()))?;

    let client = Client::builder()
        .timeout(config.timeout_duration())
        .build()
        .map_err(LinkpressError::HttpError)?;

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header("Accept", accept)
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| map_transport_error(e, config))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LinkpressError::HttpStatus { status: status.as_u16(), url: url.to_string() });
    }
    Ok(response)
}

#[cfg(feature = "fetch")]
fn map_transport_error(err: reqwest::Error, config: &FetchConfig) -> LinkpressError {
    if err.is_timeout() { LinkpressError::Timeout { timeout: config.timeout } } else { LinkpressError::HttpError(err) }
}

/// Reads HTML content from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(LinkpressError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(LinkpressError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 15);
        assert!(config.user_agent.contains("Linkpress"));
    }

    #[test]
    fn test_fetch_config_with_timeout() {
        let config = FetchConfig::with_timeout(3);
        assert_eq!(config.timeout_duration(), Duration::from_secs(3));
        assert!(config.user_agent.contains("Linkpress"));
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(LinkpressError::FileNotFound(_))));
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_fetch_url_invalid() {
        let config = FetchConfig::default();
        let result = std::thread::spawn(move || {
            tokio::runtime::Runtime::new()
                .unwrap()
                .block_on(fetch_url("not-a-url", &config))
        })
        .join()
        .unwrap();

        assert!(matches!(result, Err(LinkpressError::InvalidUrl(_))));
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_fetch_url_non_success_status() {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream
                    .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot found");
            }
        });

        let url = format!("http://{}/missing", addr);
        let config = FetchConfig::with_timeout(5);
        let result = std::thread::spawn(move || {
            tokio::runtime::Runtime::new()
                .unwrap()
                .block_on(async { fetch_url(&url, &config).await })
        })
        .join()
        .unwrap();

        assert!(matches!(result, Err(LinkpressError::HttpStatus { status: 404, .. })));
    }
}
