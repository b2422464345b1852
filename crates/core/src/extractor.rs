//! The multi-strategy content extractor.
//!
//! [`Extractor::extract`] never fails: every outcome, including a page that no
//! strategy could read, comes back as a [`ContentRecord`]. When the extractor
//! also does the fetching ([`Extractor::extract_content`]), transport problems
//! end up in the record as well.
//!
//! # Example
//!
//! ```rust
//! use linkpress_core::Extractor;
//!
//! let html = "<html><body><nav><a href='/'>Home</a></nav></body></html>";
//! let record = Extractor::new().extract("https://example.com", html);
//! assert!(!record.succeeded());
//! ```

use std::panic::{self, AssertUnwindSafe};

use crate::fetch::FetchConfig;
use crate::strategy::{ExtractionStrategy, default_strategies};
use crate::ContentRecord;

/// Runs an ordered list of strategies until one yields a record.
pub struct Extractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    fetch: FetchConfig,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    /// Extractor with the standard strategy chain and default fetch settings.
    pub fn new() -> Self {
        Self { strategies: default_strategies(), fetch: FetchConfig::default() }
    }

    /// Replaces the strategy chain. An empty list makes every page unextractable.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn with_fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn fetch_config(&self) -> &FetchConfig {
        &self.fetch
    }

    /// Extracts content from already-fetched markup.
    ///
    /// Strategies run in order; the first `Ok(Some(record))` wins and the rest
    /// are never called. Errors, panics and empty results are logged and
    /// skipped. A panic is only contained when the crate is built with
    /// unwinding; under `panic = "abort"` it still ends the process.
    pub fn extract(&self, url: &str, markup: &str) -> ContentRecord {
        for strategy in &self.strategies {
            let attempt = panic::catch_unwind(AssertUnwindSafe(|| strategy.attempt(url, markup)));
            match attempt {
                Ok(Ok(Some(record))) if record.is_usable() => {
                    tracing::debug!(url, strategy = strategy.name(), "extraction succeeded");
                    return record;
                }
                Ok(Ok(_)) => tracing::debug!(url, strategy = strategy.name(), "strategy yielded nothing"),
                Ok(Err(e)) => tracing::warn!(url, strategy = strategy.name(), error = %e, "strategy failed"),
                Err(payload) => {
                    tracing::warn!(url, strategy = strategy.name(), panic = panic_message(&*payload), "strategy panicked")
                }
            }
        }

        tracing::warn!(url, "all extraction strategies failed");
        ContentRecord::unextractable(url)
    }

    /// Fetches `url` once and extracts it.
    ///
    /// A failed fetch produces a transport-failure record without running any
    /// strategy.
    #[cfg(feature = "fetch")]
    pub async fn extract_content(&self, url: &str) -> ContentRecord {
        match crate::fetch::fetch_url(url, &self.fetch).await {
            Ok(markup) => self.extract(url, &markup),
            Err(e) => {
                tracing::warn!(url, error = %e, "fetch failed");
                ContentRecord::transport_failure(url, e)
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Extracts from markup with the standard strategy chain.
pub fn extract(url: &str, markup: &str) -> ContentRecord {
    Extractor::new().extract(url, markup)
}

/// Fetches and extracts `url` with the given timeout in seconds.
#[cfg(feature = "fetch")]
pub async fn extract_content(url: &str, timeout_seconds: u64) -> ContentRecord {
    Extractor::new()
        .with_fetch_config(FetchConfig::with_timeout(timeout_seconds))
        .extract_content(url)
        .await
}
