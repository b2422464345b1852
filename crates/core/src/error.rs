//! Error types for Linkpress operations.
//!
//! [`LinkpressError`] covers everything the library can report: transport
//! failures while fetching, extraction failures inside a single strategy,
//! packaging failures while writing the EPUB, and configuration errors at the
//! dispatcher boundary.
//!
//! The extractor never returns these to its caller; they are folded into a
//! failed [`ContentRecord`](crate::ContentRecord) instead. The compiler, the
//! source lister and the dispatcher return them directly.
//!
//! # Example
//!
//! ```rust
//! use linkpress_core::{LinkpressError, Result};
//!
//! fn require_recipients(list: &[String]) -> Result<()> {
//!     if list.is_empty() {
//!         return Err(LinkpressError::ConfigError("no recipients".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for extraction, packaging and delivery.
#[derive(Error, Debug)]
pub enum LinkpressError {
    /// HTTP request errors from reqwest.
    ///
    /// Wraps DNS failures, refused connections and other transport problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The server answered with a non-success status.
    #[error("HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// No element reached the minimum readability score.
    ///
    /// Typical for navigation pages, search results and link lists.
    #[error("Content is not readable (score {score} below threshold {threshold})")]
    NotReadable { score: f64, threshold: f64 },

    /// No content could be extracted from the document.
    #[error("No content could be extracted from the document")]
    NoContent,

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File write errors.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),

    /// The EPUB container could not be assembled.
    #[error("Failed to package document: {0}")]
    PackageError(String),

    /// Missing or malformed configuration, reported before any send attempt.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The dispatcher tried and failed to hand the document over.
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}

impl From<zip::result::ZipError> for LinkpressError {
    fn from(err: zip::result::ZipError) -> Self {
        LinkpressError::PackageError(err.to_string())
    }
}

/// Result type alias for LinkpressError.
pub type Result<T> = std::result::Result<T, LinkpressError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LinkpressError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_not_readable_error() {
        let err = LinkpressError::NotReadable { score: 15.0, threshold: 20.0 };
        assert!(err.to_string().contains("15"));
        assert!(err.to_string().contains("20"));
    }

    #[test]
    fn test_http_status_error() {
        let err = LinkpressError::HttpStatus { status: 404, url: "https://example.com/gone".to_string() };
        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("example.com/gone"));
    }

    #[test]
    fn test_config_error_is_distinct_from_delivery() {
        let config = LinkpressError::ConfigError("KINDLE_EMAILS is not set".to_string());
        let delivery = LinkpressError::DeliveryFailed("relay refused".to_string());
        assert!(config.to_string().starts_with("Configuration error"));
        assert!(delivery.to_string().starts_with("Delivery failed"));
    }
}
