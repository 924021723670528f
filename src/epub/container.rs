//! OCF container assembly.
//!
//! Readers sniff the first bytes of the archive for the mimetype marker, so
//! `mimetype` is always the first local file entry and is stored, never
//! deflated. Everything else follows in a fixed order.

use std::io::{Cursor, Write};

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::book::{ChapterDocument, EPUB_MEDIA_TYPE};
use crate::error::Result;

use super::{CONTAINER_PATH, CONTAINER_XML, MIMETYPE_PATH, NCX_PATH, OPF_PATH, STYLESHEET_PATH};

/// Default deflate level for everything except the mimetype.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Everything that goes into one archive.
#[derive(Debug, Clone, Copy)]
pub struct ContainerParts<'a> {
    pub stylesheet: &'a str,
    pub chapters: &'a [ChapterDocument],
    pub opf: &'a str,
    pub ncx: &'a str,
}

/// Serialize the container to an in-memory ZIP archive.
///
/// Member order: `mimetype`, `META-INF/container.xml`, the stylesheet, the
/// chapters in slice order, `content.opf`, `toc.ncx`.
pub fn assemble(parts: &ContainerParts<'_>, compression_level: Option<u32>) -> Result<Vec<u8>> {
    let level = compression_level.unwrap_or(DEFAULT_COMPRESSION_LEVEL).min(9);
    // Fixed timestamps keep builds with the same identifier byte-identical.
    let base = SimpleFileOptions::default().last_modified_time(DateTime::default());
    let stored = base.compression_method(CompressionMethod::Stored);
    // Level 0 means no compression at all; deflate rejects it.
    let deflated = match level {
        0 => stored,
        level => base
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(level as i64)),
    };

    let estimate = parts.chapters.iter().map(|c| c.content.len()).sum::<usize>()
        + parts.opf.len()
        + parts.ncx.len()
        + parts.stylesheet.len();
    let mut zip = ZipWriter::new(Cursor::new(Vec::with_capacity(estimate / 2 + 1024)));

    write_member(&mut zip, MIMETYPE_PATH, EPUB_MEDIA_TYPE.as_bytes(), stored)?;
    write_member(&mut zip, CONTAINER_PATH, CONTAINER_XML.as_bytes(), deflated)?;
    write_member(&mut zip, STYLESHEET_PATH, parts.stylesheet.as_bytes(), deflated)?;
    for chapter in parts.chapters {
        write_member(&mut zip, &chapter.filename, chapter.content.as_bytes(), deflated)?;
    }
    write_member(&mut zip, OPF_PATH, parts.opf.as_bytes(), deflated)?;
    write_member(&mut zip, NCX_PATH, parts.ncx.as_bytes(), deflated)?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn write_member(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    path: &str,
    data: &[u8],
    options: SimpleFileOptions,
) -> Result<()> {
    zip.start_file(path, options)?;
    zip.write_all(data).map_err(ZipError::Io)?;
    Ok(())
}
