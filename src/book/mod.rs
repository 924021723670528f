//! Book input types and the intermediate package entities.
//!
//! Everything here is built fresh for one packaging call and never mutated
//! after construction.

use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Media type of a finished package.
pub const EPUB_MEDIA_TYPE: &str = "application/epub+zip";

/// Media type of chapter documents.
pub const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";

/// One unit of book content as supplied by the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chapter {
    /// Opaque, caller-defined identifier.
    pub id: String,
    /// 1-based position as known to the caller. Document order is the order
    /// of the chapter list, not this value.
    pub sequence: u32,
    pub title: String,
    /// Raw rich text (markdown) body.
    #[cfg_attr(feature = "serde", serde(default))]
    pub body: String,
}

impl Chapter {
    pub fn new(id: impl Into<String>, sequence: u32, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence,
            title: title.into(),
            body: String::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// True if there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// A request to package one book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BuildRequest {
    pub book_title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub author: Option<String>,
    pub chapters: Vec<Chapter>,
}

impl BuildRequest {
    pub fn new(book_title: impl Into<String>) -> Self {
        Self {
            book_title: book_title.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_chapter(mut self, chapter: Chapter) -> Self {
        self.chapters.push(chapter);
        self
    }
}

/// One packaged XHTML file.
#[derive(Debug, Clone)]
pub struct ChapterDocument {
    /// Zero-based position in the processed chapter list.
    pub index: usize,
    /// Manifest id, `ch_<index>`.
    pub id: String,
    /// Archive path, `ch_<index>.xhtml`.
    pub filename: String,
    /// Unescaped chapter title, used for the navigation label.
    pub title: String,
    /// Complete XHTML document.
    pub content: String,
}

/// Manifest id for the chapter at `index`.
pub fn chapter_id(index: usize) -> String {
    format!("ch_{}", index)
}

/// Archive path for the chapter at `index`.
pub fn chapter_filename(index: usize) -> String {
    format!("ch_{}.xhtml", index)
}

/// Declares one archive member to the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub id: String,
    pub href: String,
    pub media_type: String,
}

impl ManifestEntry {
    pub fn new(
        id: impl Into<String>,
        href: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            media_type: media_type.into(),
        }
    }
}

/// One step of the linear reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpineEntry {
    pub idref: String,
}

/// One table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPoint {
    pub id: String,
    /// Zero-based play order.
    pub play_order: usize,
    /// Unescaped label text.
    pub label: String,
    pub href: String,
}

/// Where a chapter came from, kept so navigation can be mapped back to the
/// caller's chapter identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRef {
    pub id: String,
    pub sequence: u32,
    pub href: String,
}

/// A position inside a packaged book, as reported to a progress tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingPosition<'a> {
    /// Zero-based chapter index in the package.
    pub index: usize,
    /// Caller-supplied sequence number.
    pub sequence: u32,
    /// Caller-supplied chapter id.
    pub chapter_id: &'a str,
}

/// A finished EPUB container.
#[derive(Debug, Clone)]
pub struct PackageBuffer {
    bytes: Vec<u8>,
    identifier: String,
    chapters: Vec<ChapterRef>,
}

impl PackageBuffer {
    pub(crate) fn new(bytes: Vec<u8>, identifier: String, chapters: Vec<ChapterRef>) -> Self {
        Self {
            bytes,
            identifier,
            chapters,
        }
    }

    /// Always `application/epub+zip`.
    pub fn media_type(&self) -> &'static str {
        EPUB_MEDIA_TYPE
    }

    /// The unique identifier written into the OPF and NCX.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Chapters in package order.
    pub fn chapters(&self) -> &[ChapterRef] {
        &self.chapters
    }

    /// Map a chapter href (e.g. `ch_3.xhtml#section`) to a reading position.
    pub fn position_for(&self, href: &str) -> Option<ReadingPosition<'_>> {
        let path = href.split('#').next().unwrap_or(href);
        let path = path.rsplit('/').next().unwrap_or(path);
        let index: usize = path
            .strip_prefix("ch_")?
            .strip_suffix(".xhtml")?
            .parse()
            .ok()?;
        let chapter = self.chapters.get(index)?;
        Some(ReadingPosition {
            index,
            sequence: chapter.sequence,
            chapter_id: &chapter.id,
        })
    }

    /// Write the package to a file on disk.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}
