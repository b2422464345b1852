//! EPUB container assembly: package document, navigation and the zip itself.

use std::io::{Seek, Write};

use chrono::{Local, NaiveDate, Utc};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::chapter::{Chapter, MENU_FILE};
use super::theme::{STYLESHEET, STYLESHEET_PATH};
use crate::Result;
use crate::text::{escape_attr, escape_html};

const CONTAINER_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

const CONTENT_DIR: &str = "OEBPS";

/// Title of the menu page and of its table-of-contents entry.
const MENU_TITLE: &str = "Contents";

/// Book-level metadata written into the package document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    pub identifier: String,
    pub title: String,
    pub language: String,
    pub creator: String,
    /// `dcterms:modified`, formatted `YYYY-MM-DDThh:mm:ssZ`
    pub modified: String,
}

impl DocumentMeta {
    /// Defaults for the digest of `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        let day = date.format("%Y-%m-%d");
        Self {
            identifier: format!("hn-daily-{}", day),
            title: format!("HN Daily - {}", day),
            language: "en".to_string(),
            creator: "Linkpress".to_string(),
            modified: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        }
    }

    /// Defaults for today's digest, by the local calendar.
    pub fn today() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Writes a complete EPUB for `chapters` into `writer`.
///
/// `mimetype` goes first and uncompressed; every other entry is deflated.
pub fn write_epub<W: Write + Seek>(writer: W, meta: &DocumentMeta, chapters: &[Chapter<'_>]) -> Result<W> {
    let mut zip = ZipWriter::new(writer);

    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("mimetype", stored)?;
    zip.write_all(b"application/epub+zip")?;

    zip.start_file("META-INF/container.xml", deflated)?;
    zip.write_all(CONTAINER_XML)?;

    zip.start_file(format!("{}/content.opf", CONTENT_DIR), deflated)?;
    zip.write_all(generate_opf(meta, chapters).as_bytes())?;

    zip.start_file(format!("{}/toc.ncx", CONTENT_DIR), deflated)?;
    zip.write_all(generate_ncx(meta, chapters).as_bytes())?;

    zip.start_file(format!("{}/{}", CONTENT_DIR, MENU_FILE), deflated)?;
    zip.write_all(generate_nav(meta, chapters).as_bytes())?;

    zip.start_file(format!("{}/{}", CONTENT_DIR, STYLESHEET_PATH), deflated)?;
    zip.write_all(STYLESHEET.as_bytes())?;

    for chapter in chapters {
        zip.start_file(format!("{}/{}", CONTENT_DIR, chapter.file_name()), deflated)?;
        zip.write_all(chapter.render().as_bytes())?;
    }

    Ok(zip.finish()?)
}

/// The OPF package document: metadata, manifest and spine with `nav` first.
pub fn generate_opf(meta: &DocumentMeta, chapters: &[Chapter<'_>]) -> String {
    let mut opf = String::new();

    opf.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    opf.push('\n');
    opf.push_str(r#"<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="BookId">"#);
    opf.push('\n');

    opf.push_str(r#"  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">"#);
    opf.push('\n');
    opf.push_str(&format!("    <dc:identifier id=\"BookId\">{}</dc:identifier>\n", escape_html(&meta.identifier)));
    opf.push_str(&format!("    <dc:title>{}</dc:title>\n", escape_html(&meta.title)));
    opf.push_str(&format!("    <dc:language>{}</dc:language>\n", escape_html(&meta.language)));
    opf.push_str(&format!("    <dc:creator>{}</dc:creator>\n", escape_html(&meta.creator)));
    opf.push_str(&format!("    <meta property=\"dcterms:modified\">{}</meta>\n", escape_html(&meta.modified)));
    opf.push_str("  </metadata>\n");

    opf.push_str("  <manifest>\n");
    opf.push_str(&format!(
        "    <item id=\"nav\" href=\"{}\" media-type=\"application/xhtml+xml\" properties=\"nav\"/>\n",
        MENU_FILE
    ));
    opf.push_str("    <item id=\"ncx\" href=\"toc.ncx\" media-type=\"application/x-dtbncx+xml\"/>\n");
    opf.push_str(&format!("    <item id=\"style\" href=\"{}\" media-type=\"text/css\"/>\n", STYLESHEET_PATH));
    for chapter in chapters {
        opf.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"application/xhtml+xml\"/>\n",
            chapter.id(),
            chapter.file_name()
        ));
    }
    opf.push_str("  </manifest>\n");

    opf.push_str("  <spine toc=\"ncx\">\n");
    opf.push_str("    <itemref idref=\"nav\"/>\n");
    for chapter in chapters {
        opf.push_str(&format!("    <itemref idref=\"{}\"/>\n", chapter.id()));
    }
    opf.push_str("  </spine>\n");
    opf.push_str("</package>\n");

    opf
}

/// The EPUB 2 NCX table of contents.
///
/// Without chapters it holds a single entry pointing back at the menu page.
pub fn generate_ncx(meta: &DocumentMeta, chapters: &[Chapter<'_>]) -> String {
    let mut ncx = String::new();

    ncx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    ncx.push('\n');
    ncx.push_str(r#"<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">"#);
    ncx.push('\n');
    ncx.push_str(r#"<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">"#);
    ncx.push('\n');

    ncx.push_str("  <head>\n");
    ncx.push_str(&format!("    <meta name=\"dtb:uid\" content=\"{}\"/>\n", escape_attr(&meta.identifier)));
    ncx.push_str("    <meta name=\"dtb:depth\" content=\"1\"/>\n");
    ncx.push_str("    <meta name=\"dtb:totalPageCount\" content=\"0\"/>\n");
    ncx.push_str("    <meta name=\"dtb:maxPageNumber\" content=\"0\"/>\n");
    ncx.push_str("  </head>\n");

    ncx.push_str(&format!("  <docTitle><text>{}</text></docTitle>\n", escape_html(&meta.title)));

    ncx.push_str("  <navMap>\n");
    for (play_order, (label, href)) in toc_entries(chapters).iter().enumerate() {
        let n = play_order + 1;
        ncx.push_str(&format!("    <navPoint id=\"navPoint-{}\" playOrder=\"{}\">\n", n, n));
        ncx.push_str(&format!("      <navLabel><text>{}</text></navLabel>\n", escape_html(label)));
        ncx.push_str(&format!("      <content src=\"{}\"/>\n", escape_attr(href)));
        ncx.push_str("    </navPoint>\n");
    }
    ncx.push_str("  </navMap>\n");
    ncx.push_str("</ncx>\n");

    ncx
}

/// The EPUB 3 navigation document, doubling as the menu page.
pub fn generate_nav(meta: &DocumentMeta, chapters: &[Chapter<'_>]) -> String {
    let items = toc_entries(chapters)
        .iter()
        .map(|(label, href)| format!("      <li><a href=\"{}\">{}</a></li>", escape_attr(href), escape_html(label)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="{lang}" xml:lang="{lang}">
<head>
  <title>{title}</title>
  <link rel="stylesheet" type="text/css" href="{css}"/>
</head>
<body>
  <h1 class="chapter-title">{title}</h1>
  <nav epub:type="toc" id="toc">
    <ol>
{items}
    </ol>
  </nav>
</body>
</html>
"#,
        lang = escape_attr(&meta.language),
        title = escape_html(&meta.title),
        css = STYLESHEET_PATH,
        items = items,
    )
}

/// `(label, href)` pairs in reading order.
fn toc_entries(chapters: &[Chapter<'_>]) -> Vec<(String, String)> {
    if chapters.is_empty() {
        return vec![(MENU_TITLE.to_string(), MENU_FILE.to_string())];
    }
    chapters.iter().map(|c| (c.display_title(), c.file_name())).collect()
}
