//! # folio
//!
//! In-memory EPUB 2 packaging for chapter-based books.
//!
//! ## Features
//!
//! - Markdown chapters rendered to HTML and normalized to strict XHTML
//! - OPF manifest/spine and NCX navigation kept index-aligned with the chapters
//! - OCF-compliant ZIP output: `mimetype` first and stored
//! - Per-chapter rendering fans out across threads, output order is input order
//! - Scoped `blob:` handles for handing packages to a reading view
//!
//! ## Quick Start
//!
//! ```
//! use folio::{BuildRequest, Chapter, package_book};
//!
//! let request = BuildRequest::new("A Short Book")
//!     .with_author("Someone")
//!     .with_chapter(Chapter::new("intro", 1, "Intro").with_body("# Hi\n\nHello<br>World"))
//!     .with_chapter(Chapter::new("end", 2, "The End").with_body("Goodbye."));
//!
//! let book = package_book(&request)?;
//! assert_eq!(book.media_type(), "application/epub+zip");
//! assert_eq!(book.position_for("ch_1.xhtml").map(|p| p.sequence), Some(2));
//! # Ok::<(), folio::Error>(())
//! ```
//!
//! ## Customizing
//!
//! [`Packager`] accepts any [`MarkupRenderer`](render::MarkupRenderer) and
//! [`HtmlToXhtml`](xhtml::HtmlToXhtml) implementation plus a
//! [`PackagerConfig`].

pub mod book;
pub mod epub;
pub mod error;
pub mod handle;
pub mod packager;
pub mod render;
pub mod xhtml;

pub use book::{
    BuildRequest, Chapter, ChapterDocument, ChapterRef, EPUB_MEDIA_TYPE, ManifestEntry, NavPoint,
    PackageBuffer, ReadingPosition, SpineEntry,
};
pub use error::{BoxError, Error, Result};
pub use handle::{Blob, BlobHandle, BlobRegistry};
pub use packager::{Packager, PackagerConfig};

/// Package `request` with the Markdown renderer, the platform normalizer and
/// default settings.
pub fn package_book(request: &BuildRequest) -> Result<PackageBuffer> {
    Packager::new().package(request)
}
