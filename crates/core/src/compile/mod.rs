//! Compiles article entries into one cross-linked EPUB.
//!
//! Each entry becomes a chapter with previous/menu/next links; a navigation
//! page listing every chapter is first in reading order, and all chapters
//! share one stylesheet.
//!
//! # Example
//!
//! ```rust,no_run
//! use linkpress_core::compile::{ArticleEntry, compile};
//!
//! let entries = vec![ArticleEntry::new("Hello", "Ann", "https://example.com", "<p>Hi</p>")];
//! let path = compile(&entries, "digest.epub", None).unwrap();
//! println!("wrote {}", path.display());
//! ```

pub mod chapter;
pub mod package;
pub mod theme;

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ContentRecord, Result};
pub use chapter::{Chapter, chapters};
pub use package::DocumentMeta;

/// One article ready for compilation, with every field already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleEntry {
    pub title: String,
    pub author: String,
    pub source_url: String,
    /// HTML fragment or plain text
    pub body: String,
}

impl ArticleEntry {
    pub fn new(
        title: impl Into<String>, author: impl Into<String>, source_url: impl Into<String>, body: impl Into<String>,
    ) -> Self {
        Self { title: title.into(), author: author.into(), source_url: source_url.into(), body: body.into() }
    }

    /// Copies the extractor's fields verbatim.
    pub fn from_record(record: &ContentRecord) -> Self {
        Self::new(record.title(), record.author(), record.source_url(), record.body())
    }
}

/// Compiler bound to one set of document metadata.
#[derive(Debug, Clone)]
pub struct Compiler {
    meta: DocumentMeta,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(DocumentMeta::today())
    }
}

impl Compiler {
    pub fn new(meta: DocumentMeta) -> Self {
        Self { meta }
    }

    pub fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    /// Writes the EPUB for `entries` into any seekable writer.
    pub fn write_to<W: Write + Seek>(&self, entries: &[ArticleEntry], writer: W) -> Result<W> {
        package::write_epub(writer, &self.meta, &chapters(entries))
    }

    /// Writes the EPUB for `entries` to `target` and returns the path.
    pub fn compile(&self, entries: &[ArticleEntry], target: impl AsRef<Path>) -> Result<PathBuf> {
        let target = target.as_ref();
        let file = BufWriter::new(File::create(target)?);
        let mut writer = self.write_to(entries, file)?;
        writer.flush()?;

        tracing::info!(
            path = %target.display(),
            chapters = entries.len(),
            title = %self.meta.title,
            "compiled document"
        );
        Ok(target.to_path_buf())
    }
}

/// Compiles `entries` to `target` with today's defaults.
///
/// `display_title` replaces the default `HN Daily - YYYY-MM-DD` title.
pub fn compile(entries: &[ArticleEntry], target: impl AsRef<Path>, display_title: Option<&str>) -> Result<PathBuf> {
    let meta = match display_title {
        Some(title) => DocumentMeta::today().with_title(title),
        None => DocumentMeta::today(),
    };
    Compiler::new(meta).compile(entries, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_record() {
        let record = ContentRecord::extracted("https://x.test", "T", "A", "<p>b</p>").unwrap();
        let entry = ArticleEntry::from_record(&record);
        assert_eq!(entry, ArticleEntry::new("T", "A", "https://x.test", "<p>b</p>"));
    }

    #[test]
    fn test_compile_writes_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.epub");
        let entries = vec![ArticleEntry::new("T", "A", "https://x.test", "body")];

        let path = compile(&entries, &target, Some("Custom")).unwrap();
        assert_eq!(path, target);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_compile_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing").join("out.epub");
        assert!(compile(&[], &target, None).is_err());
    }
}
