//! The shared stylesheet every chapter links to.

/// Path of the stylesheet inside the content directory.
pub const STYLESHEET_PATH: &str = "style/main.css";

pub const STYLESHEET: &str = r#"body { font-family: Georgia, serif; line-height: 1.6; padding: 1em; }
h1.chapter-title { font-size: 1.8em; font-weight: bold; margin-top: 1em; margin-bottom: 0.5em; color: #333; }
h2 { font-size: 1.4em; font-weight: bold; margin-top: 1.5em; margin-bottom: 0.5em; color: #444; }
h3 { font-size: 1.2em; font-weight: bold; margin-top: 1.2em; margin-bottom: 0.4em; color: #555; }
.meta { color: #666; font-size: 0.9em; margin-bottom: 1.5em; border-bottom: 1px solid #eee; padding-bottom: 1em; }
.content { text-align: justify; }
.content pre { text-align: left; white-space: pre-wrap; font-size: 0.85em; }
.content table { border-collapse: collapse; }
.content th, .content td { border: 1px solid #ccc; padding: 0.2em 0.4em; }
.chapter-nav { margin: 20px 0; padding: 10px; border-top: 1px solid #ccc; }
nav#toc ol { list-style: none; padding-left: 0; }
nav#toc li { margin-bottom: 0.6em; }
a { color: #0066cc; }
"#;
