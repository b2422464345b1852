//! Page cleaning before region scoring.
//!
//! One streaming `lol_html` pass strips non-content tags, drops hidden
//! elements and comment threads, unwraps page chrome (menus, sidebars,
//! banners) and resolves relative links. Whitespace is left alone so that
//! `<pre>` blocks survive intact.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Tags removed together with everything inside them.
const STRIPPED_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "svg", "canvas", "template"];

static HTML_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static UNLIKELY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|combx|community|extra|foot|header|menu|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|share|social)",
    )
    .unwrap()
});

static POSITIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story)").unwrap());

/// Discussion threads are dropped with their content, not just unwrapped.
static DISCUSSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(comments?|disqus|respond|replies)").unwrap());

static HIDDEN_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(display\s*:\s*none|visibility\s*:\s*hidden)").unwrap());

/// Switches for the preprocessing pass.
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Unwrap elements whose class or id looks like page chrome
    pub remove_unlikely: bool,
    /// Keep chrome-looking elements that also look like content (`post-header` etc.)
    pub keep_positive: bool,
    /// Remove comment threads entirely
    pub remove_discussion: bool,
    /// Remove elements hidden through inline styles or the `hidden` attribute
    pub remove_hidden: bool,
    /// Base URL for resolving relative links; links are untouched when `None`
    pub base_url: Option<Url>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { remove_unlikely: true, keep_positive: true, remove_discussion: true, remove_hidden: true, base_url: None }
    }
}

/// Runs the cleaning pass and returns the rewritten HTML.
///
/// If `lol_html` rejects the input the original markup is returned unchanged
/// (minus comments), leaving it to the DOM parser to cope.
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> String {
    let without_comments = HTML_COMMENT.replace_all(html, "");
    rewrite(&without_comments, config).unwrap_or_else(|| without_comments.into_owned())
}

fn rewrite(html: &str, config: &PreprocessConfig) -> Option<String> {
    let mut handlers: Vec<_> = STRIPPED_TAGS
        .iter()
        .map(|tag| {
            lol_html::element!(*tag, |el| {
                el.remove();
                Ok(())
            })
        })
        .collect();

    handlers.push(lol_html::element!("*", |el| {
        if config.remove_hidden && is_hidden(el.get_attribute("style").as_deref(), el.has_attribute("hidden")) {
            el.remove();
            return Ok(());
        }

        let markers = chrome_markers(el.get_attribute("id"), el.get_attribute("class"));
        if markers.is_empty() {
            return Ok(());
        }

        if config.remove_discussion && DISCUSSION.is_match(&markers) && !POSITIVE.is_match(&markers) {
            el.remove();
        } else if config.remove_unlikely && is_unlikely(&markers, config.keep_positive) {
            el.remove_and_keep_content();
        }
        Ok(())
    }));

    if let Some(base_url) = &config.base_url {
        handlers.push(lol_html::element!("a[href]", |el| {
            if let Some(href) = el.get_attribute("href")
                && let Ok(absolute) = base_url.join(&href)
            {
                el.set_attribute("href", absolute.as_str()).ok();
            }
            Ok(())
        }));
    }

    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings { element_content_handlers: handlers, ..Default::default() },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    rewriter.write(html.as_bytes()).ok()?;
    rewriter.end().ok()?;

    if output.is_empty() && !html.is_empty() { None } else { Some(output) }
}

fn chrome_markers(id: Option<String>, class: Option<String>) -> String {
    let mut markers = id.unwrap_or_default();
    if let Some(class) = class {
        markers.push(' ');
        markers.push_str(&class);
    }
    markers.trim().to_string()
}

fn is_hidden(style: Option<&str>, hidden_attr: bool) -> bool {
    hidden_attr || style.is_some_and(|style| HIDDEN_STYLE.is_match(style))
}

fn is_unlikely(markers: &str, keep_positive: bool) -> bool {
    markers
        .split_whitespace()
        .any(|marker| UNLIKELY.is_match(marker) && (!keep_positive || !POSITIVE.is_match(marker)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(html: &str) -> String {
        preprocess_html(html, &PreprocessConfig::default())
    }

    #[test]
    fn test_strips_non_content_tags() {
        let html = r#"
            <html>
                <head><script>alert('test');</script><style>body{color:red;}</style></head>
                <body>
                    <noscript>Enable JavaScript</noscript>
                    <iframe src="https://example.com"></iframe>
                    <svg><rect width="100" height="100"/></svg>
                    <canvas id="chart"></canvas>
                    <p>Content</p>
                </body>
            </html>
        "#;

        let result = clean(html);
        assert!(!result.contains("alert"));
        assert!(!result.contains("color:red"));
        assert!(!result.contains("Enable JavaScript"));
        assert!(!result.contains("example.com"));
        assert!(!result.contains("rect"));
        assert!(!result.contains("chart"));
        assert!(result.contains("<p>Content</p>"));
    }

    #[test]
    fn test_removes_multiline_comments() {
        let result = clean("<body><!-- one\n two --><p>Visible content</p></body>");
        assert!(!result.contains("<!--"));
        assert!(!result.contains("two"));
        assert!(result.contains("Visible content"));
    }

    #[test]
    fn test_unwraps_chrome_but_keeps_positive() {
        let html = r#"
            <body>
                <div id="sidebar">Sidebar text</div>
                <div class="post-header">Kept header</div>
                <div class="article">Article content</div>
            </body>
        "#;

        let result = clean(html);
        assert!(!result.contains("id=\"sidebar\""));
        assert!(result.contains("Sidebar text"));
        assert!(result.contains("class=\"post-header\""));
        assert!(result.contains("class=\"article\""));
    }

    #[test]
    fn test_drops_comment_threads() {
        let html = r#"<body><article><p>Story</p></article><section id="comments"><p>First!</p></section></body>"#;
        let result = clean(html);
        assert!(result.contains("Story"));
        assert!(!result.contains("First!"));
    }

    #[test]
    fn test_removes_hidden_elements() {
        let html = r#"
            <body>
                <div style="display: none">Hidden content</div>
                <div style="visibility:hidden">Invisible content</div>
                <div hidden>Attribute hidden</div>
                <div>Visible content</div>
            </body>
        "#;

        let result = clean(html);
        assert!(!result.contains("Hidden content"));
        assert!(!result.contains("Invisible content"));
        assert!(!result.contains("Attribute hidden"));
        assert!(result.contains("Visible content"));
    }

    #[test]
    fn test_resolves_relative_links() {
        let base = Url::parse("https://example.com/blog/").unwrap();
        let config = PreprocessConfig { base_url: Some(base), ..Default::default() };
        let html = r#"<body><a href="/about">About</a><a href="post.html">Post</a></body>"#;

        let result = preprocess_html(html, &config);
        assert!(result.contains("href=\"https://example.com/about\""));
        assert!(result.contains("href=\"https://example.com/blog/post.html\""));
    }

    #[test]
    fn test_preserves_preformatted_whitespace() {
        let result = clean("<body><pre>fn main() {\n    run();\n}</pre></body>");
        assert!(result.contains("fn main() {\n    run();\n}"));
    }
}
