//! Chapter XHTML documents.

use crate::book::{ChapterDocument, chapter_filename, chapter_id};
use crate::xhtml::escape_xml;

use super::STYLESHEET_PATH;

/// Wrap a normalized fragment in a complete XHTML 1.1 document.
///
/// The title is escaped both in `<title>` and in the heading; the fragment is
/// inserted verbatim and must already be well-formed.
pub fn build_chapter_document(
    title: &str,
    fragment: &str,
    index: usize,
    language: &str,
) -> ChapterDocument {
    let title_xml = escape_xml(title);
    let lang = escape_xml(language);

    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}">
<head>
  <meta http-equiv="Content-Type" content="application/xhtml+xml; charset=utf-8" />
  <title>{title}</title>
  <link rel="stylesheet" type="text/css" href="{css}" />
</head>
<body>
<h1 class="chapter-title">{title}</h1>
{fragment}
</body>
</html>
"#,
        lang = lang,
        title = title_xml,
        css = STYLESHEET_PATH,
        fragment = fragment.trim_end(),
    );

    ChapterDocument {
        index,
        id: chapter_id(index),
        filename: chapter_filename(index),
        title: title.to_string(),
        content,
    }
}

/// Fragment used in place of an empty chapter body.
pub fn placeholder_fragment(text: &str) -> String {
    format!(r#"<h2 class="placeholder">{}</h2>"#, escape_xml(text))
}
