//! Book packaging pipeline.
//!
//! A [`Packager`] drives one build from chapter list to finished archive:
//!
//! 1. render and normalize every chapter (in parallel, collected in input order)
//! 2. wrap each fragment in a chapter document
//! 3. derive manifest, spine, and navigation entries
//! 4. emit the OPF and NCX
//! 5. assemble the container
//!
//! Any failure aborts the whole build; there is no partial output.

mod config;

pub use config::PackagerConfig;

use log::{debug, info, warn};
use rayon::prelude::*;
use uuid::Uuid;

use crate::book::{BuildRequest, Chapter, ChapterDocument, ChapterRef, PackageBuffer};
use crate::epub::{
    BookMeta, ContainerParts, DEFAULT_STYLESHEET, PackageEntries, assemble,
    build_chapter_document, build_ncx, build_opf, placeholder_fragment,
};
use crate::error::{Error, Result};
use crate::render::{MarkdownRenderer, MarkupRenderer};
use crate::xhtml::{HtmlToXhtml, platform_normalizer};

/// Packages chapter lists into EPUB containers.
///
/// A packager holds no per-build state, so one instance can serve
/// concurrent builds.
///
/// # Example
///
/// ```
/// use folio::{BuildRequest, Chapter, Packager, PackagerConfig};
///
/// let request = BuildRequest::new("My Book")
///     .with_author("Me")
///     .with_chapter(Chapter::new("c1", 1, "Intro").with_body("# Hi\n\nHello"));
///
/// let packager = Packager::new().with_config(PackagerConfig::default().with_language("en"));
/// let book = packager.package(&request)?;
/// assert_eq!(book.media_type(), "application/epub+zip");
/// # Ok::<(), folio::Error>(())
/// ```
pub struct Packager {
    config: PackagerConfig,
    renderer: Box<dyn MarkupRenderer>,
    normalizer: Box<dyn HtmlToXhtml>,
}

impl Packager {
    /// Markdown renderer, platform normalizer, default configuration.
    pub fn new() -> Self {
        Self {
            config: PackagerConfig::default(),
            renderer: Box::new(MarkdownRenderer::new()),
            normalizer: platform_normalizer(),
        }
    }

    pub fn with_config(mut self, config: PackagerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_renderer(mut self, renderer: impl MarkupRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_normalizer(mut self, normalizer: impl HtmlToXhtml + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn config(&self) -> &PackagerConfig {
        &self.config
    }

    /// Build a complete EPUB from `request`.
    pub fn package(&self, request: &BuildRequest) -> Result<PackageBuffer> {
        if request.chapters.is_empty() {
            return Err(Error::EmptyBook);
        }

        let fragments = self.render_fragments(&request.chapters)?;

        let documents: Vec<ChapterDocument> = request
            .chapters
            .iter()
            .zip(&fragments)
            .enumerate()
            .map(|(index, (chapter, fragment))| {
                build_chapter_document(&chapter.title, fragment, index, &self.config.language)
            })
            .collect();

        let entries = PackageEntries::from_documents(&documents);

        let identifier = self
            .config
            .identifier
            .clone()
            .unwrap_or_else(|| format!("urn:uuid:{}", Uuid::new_v4()));
        let title = match request.book_title.trim() {
            "" => "Untitled",
            title => title,
        };
        let meta = BookMeta {
            title,
            author: request.author.as_deref().filter(|a| !a.trim().is_empty()),
            language: &self.config.language,
            identifier: &identifier,
        };
        let opf = build_opf(&meta, &entries);
        let ncx = build_ncx(&meta, &entries);

        let parts = ContainerParts {
            stylesheet: self.config.stylesheet.as_deref().unwrap_or(DEFAULT_STYLESHEET),
            chapters: &documents,
            opf: &opf,
            ncx: &ncx,
        };
        let bytes = assemble(&parts, self.config.compression_level)?;

        info!(
            "packaged \"{}\": {} chapters, {} bytes",
            title,
            documents.len(),
            bytes.len()
        );

        let chapters = request
            .chapters
            .iter()
            .zip(&documents)
            .map(|(chapter, doc)| ChapterRef {
                id: chapter.id.clone(),
                sequence: chapter.sequence,
                href: doc.filename.clone(),
            })
            .collect();

        Ok(PackageBuffer::new(bytes, identifier, chapters))
    }

    /// Render and normalize every chapter, results in input order.
    fn render_fragments(&self, chapters: &[Chapter]) -> Result<Vec<String>> {
        if self.config.parallel {
            chapters
                .par_iter()
                .map(|chapter| self.render_fragment(chapter))
                .collect()
        } else {
            chapters
                .iter()
                .map(|chapter| self.render_fragment(chapter))
                .collect()
        }
    }

    fn render_fragment(&self, chapter: &Chapter) -> Result<String> {
        if chapter.is_empty() {
            warn!(
                "chapter {} (sequence {}) has no content, using placeholder",
                chapter.id, chapter.sequence
            );
            return Ok(placeholder_fragment(&self.config.placeholder));
        }

        let html = self
            .renderer
            .render(chapter)
            .map_err(|source| Error::ChapterRenderFailed {
                id: chapter.id.clone(),
                sequence: chapter.sequence,
                source,
            })?;
        let xhtml = self.normalizer.to_xhtml(&html)?;

        debug!(
            "rendered chapter {} (sequence {}): {} bytes of XHTML",
            chapter.id,
            chapter.sequence,
            xhtml.len()
        );
        Ok(xhtml)
    }
}

impl Default for Packager {
    fn default() -> Self {
        Self::new()
    }
}
