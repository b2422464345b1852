//! One compiled chapter and its XHTML view.
//!
//! Everything here is derived from the entry and its position: ids, file
//! names, neighbour links and fallbacks for missing fields.

use super::ArticleEntry;
use super::theme::STYLESHEET_PATH;
use crate::body::render_body;
use crate::text::{escape_attr, escape_html, truncate_chars};

/// Characters of the source URL shown before it is cut with `...`.
const DISPLAY_URL_CHARS: usize = 50;

/// File name of the menu page.
pub const MENU_FILE: &str = "nav.xhtml";

/// A positioned entry inside a document of `total` chapters.
#[derive(Debug, Clone, Copy)]
pub struct Chapter<'a> {
    pub index: usize,
    pub total: usize,
    pub entry: &'a ArticleEntry,
}

/// Chapters for `entries`, in input order.
pub fn chapters(entries: &[ArticleEntry]) -> Vec<Chapter<'_>> {
    let total = entries.len();
    entries.iter().enumerate().map(|(index, entry)| Chapter { index, total, entry }).collect()
}

fn chapter_id(index: usize) -> String {
    format!("chapter_{}", index)
}

impl<'a> Chapter<'a> {
    /// Stable id, `chapter_<index>`.
    pub fn id(&self) -> String {
        chapter_id(self.index)
    }

    pub fn file_name(&self) -> String {
        format!("{}.xhtml", self.id())
    }

    pub fn prev_id(&self) -> Option<String> {
        if self.index == 0 { None } else { Some(chapter_id(self.index - 1)) }
    }

    pub fn next_id(&self) -> Option<String> {
        if self.index + 1 >= self.total { None } else { Some(chapter_id(self.index + 1)) }
    }

    /// Entry title, or `Post N` counting from one.
    pub fn display_title(&self) -> String {
        let title = self.entry.title.trim();
        if title.is_empty() { format!("Post {}", self.index + 1) } else { title.to_string() }
    }

    pub fn display_author(&self) -> &str {
        let author = self.entry.author.trim();
        if author.is_empty() { "Unknown" } else { author }
    }

    fn display_body(&self) -> String {
        if self.entry.body.trim().is_empty() {
            render_body("No content available")
        } else {
            render_body(&self.entry.body)
        }
    }

    /// Previous, menu and next links; the outer ones are left out at the ends.
    fn navigation(&self) -> String {
        let mut links = Vec::with_capacity(3);
        if let Some(prev) = self.prev_id() {
            links.push(format!("<a href=\"{}.xhtml\">\u{2190} Previous</a>", prev));
        }
        links.push(format!("<a href=\"{}\">Menu</a>", MENU_FILE));
        if let Some(next) = self.next_id() {
            links.push(format!("<a href=\"{}.xhtml\">Next \u{2192}</a>", next));
        }
        format!("<div class=\"chapter-nav\">{}</div>", links.join(" | "))
    }

    /// The full XHTML page for this chapter.
    pub fn render(&self) -> String {
        let title = escape_html(&self.display_title());
        let author = escape_html(self.display_author());
        let url = &self.entry.source_url;
        let display_url = escape_html(&truncate_chars(url, DISPLAY_URL_CHARS));
        let navigation = self.navigation();

        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="en" xml:lang="en">
<head>
  <title>{title}</title>
  <link rel="stylesheet" type="text/css" href="{css}"/>
</head>
<body>
  {navigation}
  <h1 class="chapter-title">{title}</h1>
  <div class="meta">
    <p>By: {author}</p>
    <p>Source: <a href="{href}">{display_url}</a></p>
  </div>
  <div class="content">
{body}
  </div>
  {navigation}
</body>
</html>
"#,
            title = title,
            css = STYLESHEET_PATH,
            navigation = navigation,
            author = author,
            href = escape_attr(url),
            display_url = display_url,
            body = self.display_body(),
        )
    }
}
