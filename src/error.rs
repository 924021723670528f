//! Error types for packaging operations.

use thiserror::Error;

/// Boxed error returned by pluggable renderers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while packaging a book.
///
/// Every variant is fatal to the build: a reader must never receive an EPUB
/// whose manifest, spine, and navigation map disagree.
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTML parser unavailable: {0}")]
    EnvironmentUnavailable(String),

    #[error("chapter {id} (sequence {sequence}) failed to render: {source}")]
    ChapterRenderFailed {
        id: String,
        sequence: u32,
        #[source]
        source: BoxError,
    },

    #[error("packaging failed: {0}")]
    PackagingFailed(#[from] zip::result::ZipError),

    #[error("book has no chapters")]
    EmptyBook,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
