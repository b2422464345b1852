//! Page metadata: the title and the authors.
//!
//! Every lookup walks a fixed fallback chain from the most structured source
//! (JSON-LD) down to plain markup. Values are trimmed and blank values are
//! treated as missing so the next source gets a chance.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::Document;

static BYLINE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*(written\s+)?by[:\s]+").unwrap());

/// Metadata gathered from one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub title: Option<String>,
    pub authors: Vec<String>,
}

impl Metadata {
    /// Authors joined with `", "`, or `None` when there are none.
    pub fn author_line(&self) -> Option<String> {
        if self.authors.is_empty() { None } else { Some(self.authors.join(", ")) }
    }
}

impl Document {
    /// Title from, in order: JSON-LD `headline`/`name`, `og:title`,
    /// `twitter:title`, meta `title`/`DC.title`, `<title>`, first `<h1>`.
    pub fn extract_title(&self) -> Option<String> {
        self.json_ld_string(&["headline", "name"])
            .or_else(|| self.meta_content("og:title"))
            .or_else(|| self.meta_content("twitter:title"))
            .or_else(|| self.meta_content("title"))
            .or_else(|| self.meta_content("DC.title"))
            .or_else(|| self.title())
            .or_else(|| self.select_first("h1").and_then(|el| non_blank(&el.text())))
    }

    /// Every author the page names, deduplicated, in the order found.
    ///
    /// Sources: JSON-LD `author` (string, object or list), meta
    /// `author`/`article:author`/`DC.creator`, `rel="author"` links,
    /// `itemprop="author"` and finally byline-looking class names. The first
    /// source that yields anything wins.
    pub fn extract_authors(&self) -> Vec<String> {
        let mut authors = Vec::new();
        for node in self.json_ld_nodes() {
            if let Some(author) = node.get("author") {
                collect_json_ld_authors(author, &mut authors);
            }
            if !authors.is_empty() {
                return dedup(authors);
            }
        }

        let from_meta = ["author", "article:author", "DC.creator"]
            .iter()
            .filter_map(|name| self.meta_content(name))
            .find(|value| !value.starts_with("http"));
        if let Some(author) = from_meta {
            return vec![author];
        }

        for selector in ["[rel=\"author\"]", "[itemprop=\"author\"]"] {
            let found: Vec<String> = self
                .select(selector)
                .unwrap_or_default()
                .iter()
                .filter_map(|el| clean_byline(&el.text()))
                .collect();
            if !found.is_empty() {
                return dedup(found);
            }
        }

        ["byline", "author", "writer"]
            .iter()
            .flat_map(|pattern| [format!("[class*=\"{}\"]", pattern), format!("[id*=\"{}\"]", pattern)])
            .find_map(|selector| {
                self.select(&selector)
                    .unwrap_or_default()
                    .iter()
                    .take(3)
                    .find_map(|el| clean_byline(&el.text()))
            })
            .into_iter()
            .collect()
    }

    pub fn extract_metadata(&self) -> Metadata {
        Metadata { title: self.extract_title(), authors: self.extract_authors() }
    }

    /// Content of `<meta name=..>` or `<meta property=..>`.
    fn meta_content(&self, key: &str) -> Option<String> {
        ["name", "property"].iter().find_map(|attr| {
            self.select_first(&format!("meta[{}=\"{}\"]", attr, key))
                .and_then(|el| el.attr("content"))
                .and_then(non_blank)
        })
    }

    /// All JSON-LD objects on the page, with top-level arrays and `@graph`
    /// containers flattened. Article-like nodes come first.
    fn json_ld_nodes(&self) -> Vec<Value> {
        let mut nodes = Vec::new();
        for script in self.select("script[type=\"application/ld+json\"]").unwrap_or_default() {
            if let Ok(value) = serde_json::from_str::<Value>(script.text().trim()) {
                flatten_json_ld(value, &mut nodes);
            }
        }

        nodes.sort_by_key(|node| !is_article_node(node));
        nodes
    }

    fn json_ld_string(&self, keys: &[&str]) -> Option<String> {
        self.json_ld_nodes()
            .iter()
            .filter(|node| is_article_node(node))
            .find_map(|node| keys.iter().find_map(|key| node.get(*key)?.as_str().and_then(non_blank)))
    }
}

fn flatten_json_ld(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => items.into_iter().for_each(|item| flatten_json_ld(item, out)),
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                flatten_json_ld(graph, out);
            }
            if !map.is_empty() {
                out.push(Value::Object(map));
            }
        }
        _ => {}
    }
}

fn is_article_node(node: &Value) -> bool {
    const ARTICLE_TYPES: &[&str] =
        &["Article", "NewsArticle", "BlogPosting", "TechArticle", "ScholarlyArticle", "Report", "WebPage"];

    let matches = |v: &Value| v.as_str().is_some_and(|t| ARTICLE_TYPES.contains(&t));
    match node.get("@type") {
        Some(Value::Array(types)) => types.iter().any(matches),
        Some(single) => matches(single),
        None => node.get("headline").is_some(),
    }
}

fn collect_json_ld_authors(author: &Value, out: &mut Vec<String>) {
    match author {
        Value::String(name) => out.extend(non_blank(name)),
        Value::Object(obj) => out.extend(obj.get("name").and_then(Value::as_str).and_then(non_blank)),
        Value::Array(items) => items.iter().for_each(|item| collect_json_ld_authors(item, out)),
        _ => {}
    }
}

fn clean_byline(text: &str) -> Option<String> {
    let collapsed = crate::text::collapse_whitespace(text);
    let stripped = BYLINE_PREFIX.replace(collapsed.trim(), "");
    let stripped = stripped.trim();
    if stripped.is_empty() || stripped.chars().count() >= 100 { None } else { Some(stripped.to_string()) }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(values.len());
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML_WITH_META: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <title>Test Page Title</title>
            <meta name="author" content="John Doe">
            <meta property="og:title" content="OG Title">
            <meta property="og:site_name" content="Example Site">
            <meta property="article:published_time" content="2024-01-15T10:30:00Z">
            <script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@type": "NewsArticle",
                "headline": "JSON-LD Headline",
                "author": [{"@type": "Person", "name": "Jane Smith"}, {"@type": "Person", "name": "Raj Patel"}],
                "datePublished": "2024-01-14",
                "publisher": {"@type": "Organization", "name": "JSON-LD Publisher"}
            }
            </script>
        </head>
        <body><h1>Main Heading</h1><p>Body text.</p></body>
        </html>
    "#;

    const HTML_WITHOUT_META: &str = r#"
        <html>
        <head><title> Simple Page </title></head>
        <body><h1>Heading</h1><p>This is a paragraph.</p></body>
        </html>
    "#;

    #[test]
    fn test_title_prefers_json_ld() {
        let doc = Document::parse(HTML_WITH_META).unwrap();
        assert_eq!(doc.extract_title(), Some("JSON-LD Headline".to_string()));
    }

    #[test]
    fn test_title_falls_back_to_title_element() {
        let doc = Document::parse(HTML_WITHOUT_META).unwrap();
        assert_eq!(doc.extract_title(), Some("Simple Page".to_string()));
    }

    #[test]
    fn test_title_falls_back_to_h1() {
        let doc = Document::parse("<body><h1> Only Heading </h1></body>").unwrap();
        assert_eq!(doc.extract_title(), Some("Only Heading".to_string()));
    }

    #[test]
    fn test_authors_from_json_ld_list() {
        let doc = Document::parse(HTML_WITH_META).unwrap();
        assert_eq!(doc.extract_authors(), vec!["Jane Smith".to_string(), "Raj Patel".to_string()]);
    }

    #[test]
    fn test_json_ld_graph_is_flattened() {
        let html = r#"<head><script type="application/ld+json">
            {"@context": "https://schema.org", "@graph": [
                {"@type": "WebSite", "name": "Site"},
                {"@type": "BlogPosting", "headline": "Graph Headline", "author": "Ada Lovelace"}
            ]}
        </script></head>"#;
        let doc = Document::parse(html).unwrap();

        assert_eq!(doc.extract_title(), Some("Graph Headline".to_string()));
        assert_eq!(doc.extract_authors(), vec!["Ada Lovelace".to_string()]);
    }

    #[test]
    fn test_author_from_meta_skips_profile_urls() {
        let html = r#"<head>
            <meta property="article:author" content="https://facebook.com/someone">
            <meta name="DC.creator" content="Grace Hopper">
        </head>"#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(doc.extract_authors(), vec!["Grace Hopper".to_string()]);
    }

    #[test]
    fn test_author_from_byline_strips_prefix() {
        let doc = Document::parse(r#"<body><p class="byline">By   Alan Turing</p></body>"#).unwrap();
        assert_eq!(doc.extract_authors(), vec!["Alan Turing".to_string()]);
    }

    #[test]
    fn test_no_author() {
        let doc = Document::parse(HTML_WITHOUT_META).unwrap();
        assert!(doc.extract_authors().is_empty());
        assert_eq!(doc.extract_metadata().author_line(), None);
    }

    #[test]
    fn test_extract_metadata() {
        let doc = Document::parse(HTML_WITH_META).unwrap();
        let metadata = doc.extract_metadata();

        assert_eq!(metadata.title, Some("JSON-LD Headline".to_string()));
        assert_eq!(metadata.author_line(), Some("Jane Smith, Raj Patel".to_string()));
    }
}
