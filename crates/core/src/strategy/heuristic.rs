use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use super::ExtractionStrategy;
use crate::body::{BodyShape, reflow_plain_text};
use crate::parse::Element;
use crate::scoring::link_density;
use crate::text::{collapse_whitespace, count_words};
use crate::{ContentRecord, Document, Result};

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any", "are", "as",
        "at", "be", "because", "been", "before", "being", "below", "between", "both", "but", "by", "can", "could",
        "did", "do", "does", "doing", "down", "during", "each", "even", "few", "for", "from", "further", "had",
        "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how", "i", "if", "in", "into", "is",
        "it", "its", "just", "may", "me", "might", "more", "most", "much", "must", "my", "no", "nor", "not", "now",
        "of", "off", "on", "once", "only", "or", "other", "our", "out", "over", "own", "same", "she", "should",
        "so", "some", "such", "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
        "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
        "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    ]
    .into_iter()
    .collect()
});

static BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(cookies?|subscribe|newsletter|all rights reserved|copyright|©|sign up|log ?in|privacy policy|terms of (use|service)|advertisement|follow us)",
    )
    .unwrap()
});

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w']+").unwrap());

/// Settings for [`HeuristicStrategy`].
#[derive(Debug, Clone)]
pub struct HeuristicConfig {
    /// Blocks with fewer stopwords than this are not prose
    pub min_stopwords: usize,
    /// Blocks with a larger share of link text are navigation
    pub max_link_density: f64,
    /// Boilerplate phrases only disqualify blocks shorter than this many words
    pub boilerplate_max_words: usize,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self { min_stopwords: 3, max_link_density: 0.33, boilerplate_max_words: 40 }
    }
}

/// Text-block heuristic producing a plain-text body.
///
/// Text that would read as markup (`Vec<u8>`) comes back as escaped
/// paragraphs instead.
///
/// Paragraph-like blocks are scored by how many stopwords they contain;
/// each score goes in full to the block's parent and half to its
/// grandparent. The best-scoring container's blocks, in document order,
/// become the body, separated by blank lines.
#[derive(Debug, Clone, Default)]
pub struct HeuristicStrategy {
    config: HeuristicConfig,
}

impl HeuristicStrategy {
    pub fn new(config: HeuristicConfig) -> Self {
        Self { config }
    }

    fn is_prose(&self, element: &Element<'_>, text: &str) -> Option<usize> {
        let stopwords = stopword_count(text);
        if stopwords < self.config.min_stopwords || link_density(element) > self.config.max_link_density {
            return None;
        }
        if count_words(text) < self.config.boilerplate_max_words && BOILERPLATE.is_match(text) {
            return None;
        }
        Some(stopwords)
    }
}

struct Block<'a> {
    element: Element<'a>,
    text: String,
}

impl ExtractionStrategy for HeuristicStrategy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn attempt(&self, url: &str, markup: &str) -> Result<Option<ContentRecord>> {
        let doc = Document::parse(markup)?;

        let mut blocks = Vec::new();
        let mut containers: Vec<(Element<'_>, f64)> = Vec::new();
        let mut index = HashMap::new();

        for element in doc.body().select("p, pre, td, blockquote")? {
            if element.select("p, pre, td")?.len() > 0 {
                continue;
            }

            let text = collapse_whitespace(element.text().trim());
            let Some(score) = self.is_prose(&element, &text) else { continue };

            let parent = element.parent();
            let grandparent = parent.and_then(|p| p.parent());
            for (ancestor, weight) in [(parent, 1.0), (grandparent, 0.5)] {
                let Some(ancestor) = ancestor else { continue };
                let slot = *index.entry(ancestor.element_ref().id()).or_insert_with(|| {
                    containers.push((ancestor, 0.0));
                    containers.len() - 1
                });
                containers[slot].1 += score as f64 * weight;
            }

            blocks.push(Block { element, text });
        }

        let top = containers.iter().fold(None, |best: Option<&(Element<'_>, f64)>, candidate| match best {
            Some(best) if candidate.1 <= best.1 => Some(best),
            _ => Some(candidate),
        });
        let Some((top, _)) = top else { return Ok(None) };

        let body = blocks
            .iter()
            .filter(|block| block.element.is_descendant_of(top))
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        // Decoded text such as `Vec<u8>` would otherwise be read as markup downstream.
        let body = match BodyShape::detect(&body) {
            BodyShape::Html => reflow_plain_text(&body),
            BodyShape::PlainText => body,
        };

        tracing::debug!(url, blocks = blocks.len(), "heuristic blocks scored");

        let title = doc.extract_title().unwrap_or_default();
        let authors = doc.extract_authors().join(", ");
        Ok(ContentRecord::extracted(url, title, authors, body))
    }
}

fn stopword_count(text: &str) -> usize {
    WORD.find_iter(text)
        .filter(|word| STOPWORDS.contains(word.as_str().to_lowercase().as_str()))
        .count()
}
