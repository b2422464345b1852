use url::Url;

use super::ExtractionStrategy;
use crate::extract::{RegionConfig, locate_region};
use crate::postprocess::{PostProcessConfig, render_fragment};
use crate::{ContentRecord, Document, LinkpressError, Result};

/// Settings for [`StructuredStrategy`].
#[derive(Debug, Clone, Default)]
pub struct StructuredConfig {
    pub region: RegionConfig,
    pub render: PostProcessConfig,
}

/// Region scoring followed by restricted-fragment rendering.
///
/// Produces an HTML body that keeps headings, lists, quotes, code and tables.
/// Title and author come from page metadata.
#[derive(Debug, Clone, Default)]
pub struct StructuredStrategy {
    config: StructuredConfig,
}

impl StructuredStrategy {
    pub fn new(config: StructuredConfig) -> Self {
        Self { config }
    }
}

impl ExtractionStrategy for StructuredStrategy {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn attempt(&self, url: &str, markup: &str) -> Result<Option<ContentRecord>> {
        let doc = Document::parse_with_preprocessing(markup, Url::parse(url).ok())?;

        let region = match locate_region(&doc, &self.config.region) {
            Ok(region) => region,
            Err(LinkpressError::NoContent | LinkpressError::NotReadable { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let body = render_fragment(&region.html, &self.config.render);
        tracing::debug!(url, score = region.top_score, elements = region.element_count, "structured region located");

        // JSON-LD lives in script tags, which preprocessing strips.
        let metadata = Document::parse(markup)?.extract_metadata();
        let author = metadata.author_line().unwrap_or_default();
        Ok(ContentRecord::extracted(url, metadata.title.unwrap_or_default(), author, body))
    }
}
