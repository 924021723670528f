//! Markup rendering boundary.
//!
//! The packager does not care how chapter bodies become HTML; it only needs
//! something implementing [`MarkupRenderer`]. [`MarkdownRenderer`] is the
//! built-in choice and closures work too:
//!
//! ```
//! use folio::render::MarkupRenderer;
//! use folio::{BoxError, Chapter};
//!
//! let upper = |c: &Chapter| -> Result<String, BoxError> { Ok(c.body.to_uppercase()) };
//! let html = upper.render(&Chapter::new("a", 1, "A").with_body("<p>hi</p>")).unwrap();
//! assert_eq!(html, "<P>HI</P>");
//! ```

use pulldown_cmark::{Options, Parser, html};

use crate::book::Chapter;
use crate::error::BoxError;

/// Turns a chapter body into HTML.
///
/// Implementations are called concurrently for distinct chapters.
pub trait MarkupRenderer: Send + Sync {
    fn render(&self, chapter: &Chapter) -> Result<String, BoxError>;
}

impl<F> MarkupRenderer for F
where
    F: Fn(&Chapter) -> Result<String, BoxError> + Send + Sync,
{
    fn render(&self, chapter: &Chapter) -> Result<String, BoxError> {
        self(chapter)
    }
}

/// CommonMark renderer with tables, strikethrough and footnotes.
///
/// Inline HTML in the source is passed through untouched; the normalizer
/// takes care of making it well-formed.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_FOOTNOTES,
        }
    }

    /// Replace the parser extensions.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupRenderer for MarkdownRenderer {
    fn render(&self, chapter: &Chapter) -> Result<String, BoxError> {
        let parser = Parser::new_ext(&chapter.body, self.options);
        let mut out = String::with_capacity(chapter.body.len() + chapter.body.len() / 2);
        html::push_html(&mut out, parser);
        Ok(out)
    }
}
