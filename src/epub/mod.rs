//! EPUB 2 package construction.
//!
//! - [`document`]: chapter XHTML documents
//! - [`package`]: manifest/spine/navigation entries and the OPF + NCX documents
//! - [`container`]: the ZIP archive in OCF member order
//! - [`styles`]: the shared stylesheet

pub mod container;
pub mod document;
pub mod package;
pub mod styles;

pub use container::{ContainerParts, DEFAULT_COMPRESSION_LEVEL, assemble};
pub use document::{build_chapter_document, placeholder_fragment};
pub use package::{BookMeta, PackageEntries, build_ncx, build_opf};
pub use styles::DEFAULT_STYLESHEET;

/// Archive path of the mimetype marker.
pub const MIMETYPE_PATH: &str = "mimetype";
/// Archive path of the OCF container pointer.
pub const CONTAINER_PATH: &str = "META-INF/container.xml";
/// Archive path of the shared stylesheet.
pub const STYLESHEET_PATH: &str = "styles.css";
/// Archive path of the package document.
pub const OPF_PATH: &str = "content.opf";
/// Archive path of the navigation document.
pub const NCX_PATH: &str = "toc.ncx";

/// OCF root-file pointer.
pub const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;
