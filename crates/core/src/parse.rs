//! HTML parsing and DOM access.
//!
//! [`Document`] wraps a parsed page and [`Element`] wraps one element in it.
//! Both are thin layers over `scraper` that the scoring and rendering code
//! share, so selector errors surface as [`LinkpressError::HtmlParseError`]
//! instead of panics.
//!
//! # Example
//!
//! ```rust
//! use linkpress_core::Document;
//!
//! let doc = Document::parse("<html><head><title>Test</title></head><body><p>Hi</p></body></html>").unwrap();
//! assert_eq!(doc.title(), Some("Test".to_string()));
//! assert_eq!(doc.select("p").unwrap().len(), 1);
//! ```

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::preprocess::{self, PreprocessConfig};
use crate::{LinkpressError, Result};

/// A parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML as-is, without any cleaning.
    pub fn parse(html: &str) -> Result<Self> {
        Ok(Self { html: Html::parse_document(html) })
    }

    /// Parses HTML after running the preprocessing pass.
    ///
    /// Scripts, styles, comments, hidden elements and obvious page chrome are
    /// removed first; relative links are resolved against `base_url`.
    pub fn parse_with_preprocessing(html: &str, base_url: Option<Url>) -> Result<Self> {
        let config = PreprocessConfig { base_url, ..Default::default() };
        let cleaned = preprocess::preprocess_html(html, &config);

        Ok(Self { html: Html::parse_document(&cleaned) })
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`LinkpressError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile_selector(selector)?;
        Ok(self.html.select(&sel).map(Element::from).collect())
    }

    /// First element matching `selector`, swallowing selector errors.
    pub fn select_first(&'_ self, selector: &str) -> Option<Element<'_>> {
        let sel = compile_selector(selector).ok()?;
        self.html.select(&sel).next().map(Element::from)
    }

    /// The `<body>` element, or the root element for fragments without one.
    pub fn body(&'_ self) -> Element<'_> {
        self.select_first("body")
            .unwrap_or_else(|| Element::from(self.html.root_element()))
    }

    /// Content of the `<title>` element, trimmed; `None` when missing or blank.
    pub fn title(&self) -> Option<String> {
        let title = self.select_first("title")?.text();
        let title = title.trim();
        if title.is_empty() { None } else { Some(title.to_string()) }
    }
}

fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| LinkpressError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// One element of a parsed [`Document`].
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> From<ElementRef<'a>> for Element<'a> {
    fn from(element: ElementRef<'a>) -> Self {
        Self { element }
    }
}

impl<'a> Element<'a> {
    /// The wrapped `scraper` reference.
    pub fn element_ref(&self) -> ElementRef<'a> {
        self.element
    }

    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Lowercase tag name.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Nearest ancestor that is an element.
    pub fn parent(&self) -> Option<Element<'a>> {
        self.element.parent().and_then(ElementRef::wrap).map(Element::from)
    }

    /// Direct children that are elements, in document order.
    pub fn child_elements(&self) -> Vec<Element<'a>> {
        self.element.child_elements().map(Element::from).collect()
    }

    /// Whether `self` sits somewhere below `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &Element<'a>) -> bool {
        self.element.ancestors().any(|node| node.id() == ancestor.element.id())
    }

    /// Identity comparison; two wrappers around the same node are equal.
    pub fn same_node(&self, other: &Element<'a>) -> bool {
        self.element.id() == other.element.id()
    }

    /// Selects descendant elements using a CSS selector.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile_selector(selector)?;
        Ok(self.element.select(&sel).map(Element::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>  Test Page </title>
        </head>
        <body>
            <div id="outer">
                <p class="content">Paragraph 1</p>
                <p class="content">Paragraph 2</p>
            </div>
            <a href="https://example.com">Link</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document_title_is_trimmed() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert_eq!(doc.title(), Some("Test Page".to_string()));
    }

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Paragraph 1");
        assert_eq!(elements[1].text(), "Paragraph 2");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert!(matches!(doc.select("[[invalid"), Err(LinkpressError::HtmlParseError(_))));
        assert!(doc.select_first("[[invalid").is_none());
    }

    #[test]
    fn test_parent_and_descendant() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let outer = doc.select_first("#outer").unwrap();
        let para = doc.select_first("p.content").unwrap();

        assert!(para.parent().unwrap().same_node(&outer));
        assert!(para.is_descendant_of(&outer));
        assert!(!outer.is_descendant_of(&para));
        assert_eq!(outer.child_elements().len(), 2);
    }

    #[test]
    fn test_body_falls_back_to_root() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert_eq!(doc.body().tag_name(), "body");
    }

    #[test]
    fn test_parse_with_preprocessing_resolves_links() {
        let base = Url::parse("https://example.com/posts/").unwrap();
        let doc = Document::parse_with_preprocessing(r#"<p><a href="next">Next</a></p>"#, Some(base)).unwrap();

        let link = doc.select_first("a").unwrap();
        assert_eq!(link.attr("href"), Some("https://example.com/posts/next"));
    }
}
