//! Manifest, spine, and navigation map (OPF + NCX).

use crate::book::{ChapterDocument, ManifestEntry, NavPoint, SpineEntry, XHTML_MEDIA_TYPE};
use crate::xhtml::escape_xml;

use super::{NCX_PATH, STYLESHEET_PATH};

/// Manifest id of the NCX, referenced by the spine's `toc` attribute.
pub const NCX_ID: &str = "ncx";
/// Manifest id of the shared stylesheet.
pub const STYLESHEET_ID: &str = "css";

/// Book-level metadata written into both package documents.
#[derive(Debug, Clone)]
pub struct BookMeta<'a> {
    pub title: &'a str,
    pub author: Option<&'a str>,
    pub language: &'a str,
    /// Unique identifier of this edition build.
    pub identifier: &'a str,
}

/// Per-chapter package entries, index-aligned with the chapter documents.
#[derive(Debug, Clone, Default)]
pub struct PackageEntries {
    pub manifest: Vec<ManifestEntry>,
    pub spine: Vec<SpineEntry>,
    pub nav: Vec<NavPoint>,
}

impl PackageEntries {
    /// One manifest entry, spine entry, and nav point per document, in the
    /// given order. Nothing is reordered or deduplicated.
    pub fn from_documents(documents: &[ChapterDocument]) -> Self {
        let mut entries = Self {
            manifest: Vec::with_capacity(documents.len()),
            spine: Vec::with_capacity(documents.len()),
            nav: Vec::with_capacity(documents.len()),
        };

        for (position, doc) in documents.iter().enumerate() {
            entries.manifest.push(ManifestEntry::new(
                doc.id.clone(),
                doc.filename.clone(),
                XHTML_MEDIA_TYPE,
            ));
            entries.spine.push(SpineEntry {
                idref: doc.id.clone(),
            });
            entries.nav.push(NavPoint {
                id: format!("nav_{}", position),
                play_order: position,
                label: doc.title.clone(),
                href: doc.filename.clone(),
            });
        }

        entries
    }

    pub fn len(&self) -> usize {
        self.spine.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spine.is_empty()
    }
}

/// Manifest entries for the non-chapter members.
fn static_manifest() -> [ManifestEntry; 2] {
    [
        ManifestEntry::new(NCX_ID, NCX_PATH, "application/x-dtbncx+xml"),
        ManifestEntry::new(STYLESHEET_ID, STYLESHEET_PATH, "text/css"),
    ]
}

/// Generate the EPUB 2 package document (`content.opf`).
pub fn build_opf(meta: &BookMeta<'_>, entries: &PackageEntries) -> String {
    let mut opf = String::with_capacity(1024 + entries.len() * 128);

    opf.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
"#,
    );

    opf.push_str(&format!(
        "    <dc:title>{}</dc:title>\n",
        escape_xml(meta.title)
    ));
    if let Some(author) = meta.author {
        opf.push_str(&format!(
            "    <dc:creator opf:role=\"aut\">{}</dc:creator>\n",
            escape_xml(author)
        ));
    }
    opf.push_str(&format!(
        "    <dc:language>{}</dc:language>\n",
        escape_xml(meta.language)
    ));
    opf.push_str(&format!(
        "    <dc:identifier id=\"BookId\">{}</dc:identifier>\n",
        escape_xml(meta.identifier)
    ));

    opf.push_str("  </metadata>\n  <manifest>\n");
    for item in static_manifest().iter().chain(&entries.manifest) {
        opf.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"/>\n",
            escape_xml(&item.id),
            escape_xml(&item.href),
            escape_xml(&item.media_type)
        ));
    }

    opf.push_str(&format!("  </manifest>\n  <spine toc=\"{}\">\n", NCX_ID));
    for item in &entries.spine {
        opf.push_str(&format!(
            "    <itemref idref=\"{}\"/>\n",
            escape_xml(&item.idref)
        ));
    }
    opf.push_str("  </spine>\n</package>\n");

    opf
}

/// Generate the NCX navigation document (`toc.ncx`).
pub fn build_ncx(meta: &BookMeta<'_>, entries: &PackageEntries) -> String {
    let mut ncx = String::with_capacity(1024 + entries.len() * 192);

    ncx.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content="{uid}"/>
    <meta name="dtb:depth" content="1"/>
    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
  <docTitle>
    <text>{title}</text>
  </docTitle>
"#,
        uid = escape_xml(meta.identifier),
        title = escape_xml(meta.title),
    ));

    if let Some(author) = meta.author {
        ncx.push_str(&format!(
            "  <docAuthor>\n    <text>{}</text>\n  </docAuthor>\n",
            escape_xml(author)
        ));
    }

    ncx.push_str("  <navMap>\n");
    for point in &entries.nav {
        ncx.push_str(&format!(
            "    <navPoint id=\"{}\" playOrder=\"{}\">\n",
            escape_xml(&point.id),
            point.play_order
        ));
        ncx.push_str(&format!(
            "      <navLabel>\n        <text>{}</text>\n      </navLabel>\n",
            escape_xml(&point.label)
        ));
        ncx.push_str(&format!(
            "      <content src=\"{}\"/>\n",
            escape_xml(&point.href)
        ));
        ncx.push_str("    </navPoint>\n");
    }
    ncx.push_str("  </navMap>\n</ncx>\n");

    ncx
}
