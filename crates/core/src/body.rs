//! Telling HTML bodies from plain-text bodies.
//!
//! Extracted bodies come in two shapes: a markup fragment from the structured
//! strategy, or blank-line separated prose from the heuristic one. Chapters
//! re-render the first through the fragment sanitizer, so anything shaped
//! like markup comes out well-formed, and reflow the second into paragraphs.

use crate::postprocess::{PostProcessConfig, render_fragment};
use crate::text::escape_html;

/// Shape of a record or entry body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    Html,
    PlainText,
}

impl BodyShape {
    /// `Html` when a `<` appears somewhere before a `>`, otherwise `PlainText`.
    pub fn detect(body: &str) -> Self {
        match body.find('<') {
            Some(open) if body[open..].contains('>') => BodyShape::Html,
            _ => BodyShape::PlainText,
        }
    }
}

/// Turns plain text into paragraphs: blank lines split paragraphs, single
/// newlines become `<br/>`. Text is escaped first.
pub fn reflow_plain_text(text: &str) -> String {
    let escaped = escape_html(text.trim()).replace("\r\n", "\n");
    let paragraphs = escaped.replace("\n\n", "</p><p>").replace('\n', "<br/>");
    format!("<p>{}</p>", paragraphs)
}

/// Body ready for a chapter: HTML sanitized, plain text reflowed.
///
/// Clean fragments pass through unchanged. Markup-shaped text that renders
/// to nothing is reflowed as text instead.
pub fn render_body(body: &str) -> String {
    match BodyShape::detect(body) {
        BodyShape::Html => {
            let rendered = render_fragment(body, &PostProcessConfig::default());
            if rendered.is_empty() { reflow_plain_text(body) } else { rendered }
        }
        BodyShape::PlainText => reflow_plain_text(body),
    }
}
