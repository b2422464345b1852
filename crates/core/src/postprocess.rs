//! Rendering a content region as a restricted XHTML fragment.
//!
//! Only a small set of structural tags survives: headings, paragraphs,
//! emphasis, quotes, lists, tables, preformatted code, line breaks and links
//! with a web or mail scheme. Media, scripts and forms are dropped with their
//! content; every other tag is unwrapped. Output is well-formed XHTML so it
//! can go straight into an EPUB chapter.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node};
use url::Url;

use crate::parse::Element;
use crate::scoring::link_density;
use crate::text::{collapse_whitespace, escape_attr, escape_html};

/// Removed together with everything inside them.
const DROPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "img", "picture", "video", "audio", "source", "track", "iframe",
    "object", "embed", "svg", "canvas", "map", "form", "input", "button", "select", "textarea", "nav", "aside",
];

const KEPT_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "em", "strong", "b", "i", "u", "blockquote", "ul", "ol", "li", "table",
    "thead", "tbody", "tfoot", "tr", "th", "td", "pre", "code", "sub", "sup",
];

const TABLE_TAGS: &[&str] = &["table", "thead", "tbody", "tfoot", "tr", "th", "td"];

/// Unwrapped tags that still read as a block of their own.
const BLOCK_CONTAINERS: &[&str] = &[
    "div", "section", "article", "main", "header", "figure", "figcaption", "center", "dl", "dt", "dd", "details",
    "summary", "address", "hgroup",
];

/// Tags whose content must stay phrasing-only.
const PHRASING_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "em", "strong", "b", "i", "u", "a", "code", "sub", "sup", "pre",
];

const TRIMMED_TAGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "td", "th"];

/// Checked for link density and boilerplate before rendering.
const PRUNABLE_TAGS: &[&str] = &["div", "section", "article", "header", "ul", "ol", "dl", "table", "p"];

static BLOCK_OUTPUT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(p|h[1-6]|ul|ol|li|table|blockquote|pre)[\s>]").unwrap());

static CHROME_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(advertisement|share( this( article| post)?)?|edit (this page )?on github|subscribe( now)?|sign up for (our|the) newsletter.*|related (articles|posts|stories)|read more|continue reading)$",
    )
    .unwrap()
});

/// Switches for [`render_fragment`].
#[derive(Debug, Clone)]
pub struct PostProcessConfig {
    /// Blocks with a larger share of link text are dropped
    pub max_link_density: f64,
    /// Keep tables; when false they are dropped entirely
    pub include_tables: bool,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self { max_link_density: 0.5, include_tables: true }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Context {
    pre: bool,
    phrasing: bool,
}

/// Renders `html` as a restricted XHTML fragment.
///
/// Returns an empty string when nothing renderable is left.
pub fn render_fragment(html: &str, config: &PostProcessConfig) -> String {
    let fragment = Html::parse_fragment(html);
    render_children(fragment.root_element(), Context::default(), config).trim().to_string()
}

fn render_children(parent: ElementRef<'_>, ctx: Context, config: &PostProcessConfig) -> String {
    let mut out = String::new();
    for child in parent.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&render_text(text, ctx)),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    out.push_str(&render_element(element, ctx, config));
                }
            }
            _ => {}
        }
    }
    out
}

fn render_text(text: &str, ctx: Context) -> String {
    if ctx.pre { escape_html(text) } else { escape_html(&collapse_whitespace(text)) }
}

fn render_element(element: ElementRef<'_>, ctx: Context, config: &PostProcessConfig) -> String {
    let tag = element.value().name().to_ascii_lowercase();
    let tag = tag.as_str();

    if DROPPED_TAGS.contains(&tag) || (!config.include_tables && TABLE_TAGS.contains(&tag)) {
        return String::new();
    }
    if tag == "br" {
        return "<br/>".to_string();
    }
    if PRUNABLE_TAGS.contains(&tag) && is_boilerplate(element, config) {
        return String::new();
    }

    let inner_ctx = Context { pre: ctx.pre || tag == "pre", phrasing: ctx.phrasing || PHRASING_TAGS.contains(&tag) };
    let mut inner = render_children(element, inner_ctx, config);
    if !inner_ctx.pre && TRIMMED_TAGS.contains(&tag) {
        inner = inner.trim().to_string();
    }
    let blank = inner.replace("<br/>", "").trim().is_empty();

    if tag == "a" {
        return match safe_href(element) {
            Some(href) if !blank => format!("<a href=\"{}\">{}</a>", escape_attr(href), inner),
            _ => inner,
        };
    }

    if KEPT_TAGS.contains(&tag) {
        if blank && !matches!(tag, "td" | "th") {
            return String::new();
        }
        return format!("<{}{}>{}</{}>", tag, cell_attributes(element, tag), inner, tag);
    }

    if BLOCK_CONTAINERS.contains(&tag) && !ctx.phrasing && !blank && !BLOCK_OUTPUT.is_match(&inner) {
        return format!("<p>{}</p>", inner.trim());
    }
    inner
}

/// Link-heavy blocks and short chrome phrases ("Share this", "Read more").
fn is_boilerplate(element: ElementRef<'_>, config: &PostProcessConfig) -> bool {
    let text: String = element.text().collect();
    let text = collapse_whitespace(text.trim());
    if text.is_empty() {
        return false;
    }

    CHROME_TEXT.is_match(&text) || link_density(&Element::from(element)) > config.max_link_density
}

fn safe_href(element: ElementRef<'_>) -> Option<&str> {
    let href = element.value().attr("href")?.trim();
    let url = Url::parse(href).ok()?;
    if matches!(url.scheme(), "http" | "https" | "mailto") { Some(href) } else { None }
}

fn cell_attributes(element: ElementRef<'_>, tag: &str) -> String {
    if !matches!(tag, "td" | "th") {
        return String::new();
    }

    ["colspan", "rowspan"]
        .iter()
        .filter_map(|name| {
            let value = element.value().attr(name)?.trim().parse::<u32>().ok()?;
            if value > 1 { Some(format!(" {}=\"{}\"", name, value)) } else { None }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(html: &str) -> String {
        render_fragment(html, &PostProcessConfig::default())
    }

    #[test]
    fn test_keeps_structure() {
        let html = r#"<article><h2>Part one</h2><p>Some <em>emphasis</em> and <strong>weight</strong>.</p>
            <ul><li>one</li><li>two</li></ul><blockquote><p>Quoted</p></blockquote></article>"#;

        let result = render(html);
        assert!(result.contains("<h2>Part one</h2>"));
        assert!(result.contains("<p>Some <em>emphasis</em> and <strong>weight</strong>.</p>"));
        assert!(result.contains("<ul><li>one</li><li>two</li></ul>"));
        assert!(result.contains("<blockquote><p>Quoted</p></blockquote>"));
        assert!(!result.contains("<article"));
    }

    #[test]
    fn test_drops_media_and_scripts() {
        let html = r#"<div><p>Text</p><img src="a.png" alt="alt text"/><script>var x = 1;</script>
            <video><source src="v.mp4"/>Fallback</video></div>"#;

        let result = render(html);
        assert_eq!(result, "<p>Text</p>");
    }

    #[test]
    fn test_unwraps_plain_container_into_paragraph() {
        let result = render(r#"<div class="lede"><span>Loose   text</span> in a div</div>"#);
        assert_eq!(result, "<p>Loose text in a div</p>");
    }

    #[test]
    fn test_link_schemes() {
        let html = r#"<p>See <a href="https://example.com/a?x=1&amp;y=2">this</a>, <a href="mailto:me@example.com">mail</a>
            and <a href="javascript:alert(1)">that</a> plus a longer sentence so links stay a minority here.</p>"#;

        let result = render(html);
        assert!(result.contains(r#"<a href="https://example.com/a?x=1&amp;y=2">this</a>"#));
        assert!(result.contains(r#"<a href="mailto:me@example.com">mail</a>"#));
        assert!(result.contains("and that plus"));
        assert!(!result.contains("javascript"));
    }

    #[test]
    fn test_escapes_text_and_closes_breaks() {
        let result = render("<p>a &lt; b &amp; c<br>next line</p>");
        assert_eq!(result, "<p>a &lt; b &amp; c<br/>next line</p>");
    }

    #[test]
    fn test_preserves_pre_whitespace() {
        let result = render("<pre><code>fn main() {\n    println!(\"hi\");\n}</code></pre>");
        assert!(result.contains("<pre><code>fn main() {\n    println!(\"hi\");\n}</code></pre>"));
    }

    #[test]
    fn test_prunes_link_lists_and_empty_blocks() {
        let html = r#"<div><p>Real paragraph with enough words to stand on its own.</p>
            <ul><li><a href="https://a.test">Link one</a></li><li><a href="https://b.test">Link two</a></li></ul>
            <p>   </p><p>Share this</p></div>"#;

        let result = render(html);
        assert_eq!(result, "<p>Real paragraph with enough words to stand on its own.</p>");
    }

    #[test]
    fn test_tables_keep_spans() {
        let html = r#"<table><tr><th colspan="2">Head</th></tr><tr><td>a</td><td></td></tr></table>"#;

        let result = render(html);
        assert!(result.contains(r#"<th colspan="2">Head</th>"#));
        assert!(result.contains("<td>a</td><td></td>"));

        let without = render_fragment(html, &PostProcessConfig { include_tables: false, ..Default::default() });
        assert!(without.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
        assert_eq!(render("<div> <span></span> </div>"), "");
    }
}
