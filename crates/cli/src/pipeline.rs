//! The daily run and its offline counterpart.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::NaiveDate;
use linkpress_core::text::truncate_chars;
use linkpress_core::{
    ArticleEntry, Candidate, Compiler, ContentRecord, Dispatcher, DocumentMeta, Extractor, PipelineConfig,
    SourceLister, fetch_file,
};

use crate::echo::{format_size, print_info, print_item, print_step, print_success, print_warning};

const STEPS: usize = 4;

/// What a finished daily run left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub document: PathBuf,
    pub chapters: usize,
    pub delivered: bool,
    /// False once the document was removed after delivery
    pub document_kept: bool,
}

/// Builds the compiler entry for one candidate and its extracted record.
///
/// The listing's title wins when present; the extracted author wins over the
/// listing's submitter.
pub fn resolve_entry(candidate: &Candidate, record: &ContentRecord) -> ArticleEntry {
    let title = if candidate.title.trim().is_empty() { record.title() } else { candidate.title.as_str() };
    let author = if record.author().trim().is_empty() { candidate.author.as_str() } else { record.author() };
    ArticleEntry::new(title, author, candidate.url.as_str(), record.body())
}

/// Lists candidates, extracts them one at a time, compiles and delivers.
///
/// `dispatcher` must be present unless the configuration skips sending; that
/// is checked before anything touches the network.
pub async fn run_daily<L: SourceLister>(
    config: &PipelineConfig, lister: &L, extractor: &Extractor, dispatcher: Option<&dyn Dispatcher>, today: NaiveDate,
) -> anyhow::Result<RunSummary> {
    let delivery = if config.skip_send {
        None
    } else {
        let Some(dispatch) = config.dispatch.as_ref() else { bail!("Configuration error: delivery is not configured") };
        let Some(dispatcher) = dispatcher else { bail!("Configuration error: no dispatcher available") };
        Some((dispatcher, dispatch.recipients()))
    };

    print_step(1, STEPS, &format!("Fetching top {} stories", config.count));
    let candidates = lister.list(config.count).await;
    if candidates.is_empty() {
        bail!("No stories were listed");
    }
    print_success(&format!("Listed {} stories", candidates.len()));

    print_step(2, STEPS, "Extracting articles");
    let mut entries = Vec::new();
    for (i, candidate) in candidates.iter().enumerate() {
        print_item(i + 1, candidates.len(), &truncate_chars(&candidate.title, 50));

        let record = extractor.extract_content(&candidate.url).await;
        if record.is_usable() {
            entries.push(resolve_entry(candidate, &record));
        } else {
            let detail = record.error_detail().unwrap_or("No content");
            tracing::warn!(url = %candidate.url, detail, "story skipped");
            print_warning(&format!("Skipped: {}", detail));
        }
    }
    if entries.is_empty() {
        bail!("None of the {} stories could be extracted", candidates.len());
    }
    print_success(&format!("Extracted {} of {} stories", entries.len(), candidates.len()));

    print_step(3, STEPS, "Compiling EPUB");
    let target = config.output_path(today);
    let document = Compiler::new(DocumentMeta::for_date(today))
        .compile(&entries, &target)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    let size = fs::metadata(&document).map(|m| m.len()).unwrap_or(0);
    print_success(&format!("Created {} ({})", document.display(), format_size(size)));

    let Some((dispatcher, recipients)) = delivery else {
        print_step(4, STEPS, "Skipping delivery (--skip-send)");
        return Ok(RunSummary { document, chapters: entries.len(), delivered: false, document_kept: true });
    };

    print_step(4, STEPS, &format!("Delivering to {} recipient(s)", recipients.len()));
    dispatcher.dispatch(&document, recipients).context("Delivery failed")?;
    tracing::info!(document = %document.display(), recipients = recipients.len(), "digest delivered");
    print_success("Delivered");

    let document_kept = if config.removes_document() {
        fs::remove_file(&document).with_context(|| format!("Failed to remove {}", document.display()))?;
        print_info(&format!("Cleaned up {}", document.display()));
        false
    } else {
        print_info(&format!("EPUB kept at {}", document.display()));
        true
    };

    Ok(RunSummary { document, chapters: entries.len(), delivered: true, document_kept })
}

/// Extracts local HTML files and compiles the usable ones.
///
/// Each file's path stands in for its URL.
pub fn run_build(
    files: &[PathBuf], output: &Path, title: Option<&str>, extractor: &Extractor,
) -> anyhow::Result<PathBuf> {
    let mut entries = Vec::new();
    for (i, file) in files.iter().enumerate() {
        let path = file.to_string_lossy();
        print_item(i + 1, files.len(), &path);

        let html = fetch_file(&path).with_context(|| format!("Failed to read {}", path))?;
        let record = extractor.extract(&path, &html);
        if record.is_usable() {
            entries.push(ArticleEntry::from_record(&record));
        } else {
            let detail = record.error_detail().unwrap_or("No content");
            tracing::warn!(file = %path, detail, "file skipped");
            print_warning(&format!("Skipped {}: {}", path, detail));
        }
    }

    if entries.is_empty() {
        bail!("None of the {} files could be extracted", files.len());
    }

    let meta = match title {
        Some(title) => DocumentMeta::today().with_title(title),
        None => DocumentMeta::today(),
    };
    let document = Compiler::new(meta)
        .compile(&entries, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    print_success(&format!("Compiled {} chapter(s) into {}", entries.len(), document.display()));
    Ok(document)
}
