//! The normalized result of one extraction attempt.
//!
//! A [`ContentRecord`] is what the extractor hands back for every URL, whether
//! or not anything could be read from it. Records can only be built through
//! the constructors below, which is where the success/failure invariants live:
//!
//! - a successful record always has a body with non-blank text;
//! - a failed record has either an empty body (transport failure) or the fixed
//!   [`UNEXTRACTABLE_PLACEHOLDER`], and always carries an error detail.

use serde::Serialize;

/// Body used for pages where every extraction strategy came back empty.
pub const UNEXTRACTABLE_PLACEHOLDER: &str = "[Content could not be extracted from this page]";

/// Error detail used when the strategy chain is exhausted.
pub const ALL_METHODS_FAILED: &str = "All extraction methods failed";

/// Normalized content for one source URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentRecord {
    title: String,
    author: String,
    body: String,
    source_url: String,
    succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_detail: Option<String>,
}

impl ContentRecord {
    /// Builds a successful record.
    ///
    /// Returns `None` when `body` is blank after trimming, so a strategy that
    /// technically ran but produced nothing cannot be mistaken for a success.
    pub fn extracted(
        source_url: impl Into<String>, title: impl Into<String>, author: impl Into<String>, body: impl Into<String>,
    ) -> Option<Self> {
        let body = body.into();
        if body.trim().is_empty() {
            return None;
        }

        Some(Self {
            title: title.into().trim().to_string(),
            author: author.into().trim().to_string(),
            body,
            source_url: source_url.into(),
            succeeded: true,
            error_detail: None,
        })
    }

    /// Record for a page that was fetched but could not be read by any strategy.
    pub fn unextractable(source_url: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            body: UNEXTRACTABLE_PLACEHOLDER.to_string(),
            source_url: source_url.into(),
            succeeded: false,
            error_detail: Some(ALL_METHODS_FAILED.to_string()),
        }
    }

    /// Record for a URL whose single fetch attempt failed.
    pub fn transport_failure(source_url: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            body: String::new(),
            source_url: source_url.into(),
            succeeded: false,
            error_detail: Some(format!("Failed to fetch URL: {}", detail)),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    /// Whether the record is worth compiling into a chapter.
    pub fn is_usable(&self) -> bool {
        self.succeeded && !self.body.trim().is_empty()
    }
}
