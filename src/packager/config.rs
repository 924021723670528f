//! Packager configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for [`Packager`](super::Packager).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct PackagerConfig {
    /// BCP 47 language tag for `dc:language` and `xml:lang`.
    pub language: String,
    /// Deflate level (0-9) for every member except `mimetype`. Default 6.
    pub compression_level: Option<u32>,
    /// Replaces the built-in stylesheet when set.
    pub stylesheet: Option<String>,
    /// Heading shown in place of an empty chapter.
    pub placeholder: String,
    /// Fixed edition identifier. A fresh `urn:uuid:` is generated per build
    /// when unset.
    pub identifier: Option<String>,
    /// Render chapters on the rayon pool. Output is identical either way.
    pub parallel: bool,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            compression_level: None,
            stylesheet: None,
            placeholder: "No content".to_string(),
            identifier: None,
            parallel: true,
        }
    }
}

impl PackagerConfig {
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = Some(level);
        self
    }

    pub fn with_stylesheet(mut self, css: impl Into<String>) -> Self {
        self.stylesheet = Some(css.into());
        self
    }

    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
