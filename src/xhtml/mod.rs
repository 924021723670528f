//! HTML → XHTML normalization.
//!
//! Renderer output is HTML: void elements are left open and named entities
//! such as `&nbsp;` appear freely. Neither survives an XML parser, so every
//! chapter fragment goes through an [`HtmlToXhtml`] implementation before it
//! is wrapped in a document.
//!
//! The parser is a platform capability. [`platform_normalizer`] returns the
//! html5ever-backed implementation when the `html` feature is compiled in and
//! [`MissingParser`] otherwise; the latter fails every call with
//! [`Error::EnvironmentUnavailable`] rather than passing markup through
//! unescaped.

#[cfg(feature = "html")]
mod arena;
mod escape;
#[cfg(feature = "html")]
mod serialize;
#[cfg(feature = "html")]
mod tree_sink;

pub use escape::escape_xml;

use crate::error::{Error, Result};

/// Converts an HTML fragment into a well-formed XHTML fragment.
pub trait HtmlToXhtml: Send + Sync {
    fn to_xhtml(&self, html: &str) -> Result<String>;
}

/// Normalizer used when no HTML parser exists on this platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingParser;

impl HtmlToXhtml for MissingParser {
    fn to_xhtml(&self, _html: &str) -> Result<String> {
        Err(Error::EnvironmentUnavailable(
            "no HTML parser is available on this platform".to_string(),
        ))
    }
}

/// Normalizer backed by html5ever.
///
/// The fragment is parsed as the content of `<body>`, which gives the same
/// error recovery a browser applies, and the body's subtree is written back
/// out as XHTML.
#[cfg(feature = "html")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5everNormalizer;

#[cfg(feature = "html")]
impl HtmlToXhtml for Html5everNormalizer {
    fn to_xhtml(&self, html: &str) -> Result<String> {
        use html5ever::driver::ParseOpts;
        use html5ever::parse_document;
        use html5ever::tendril::TendrilSink;

        if html.trim().is_empty() {
            return Ok(String::new());
        }

        let wrapped = format!(
            "<!DOCTYPE html><html><head></head><body>{}</body></html>",
            html
        );
        let dom = parse_document(tree_sink::ArenaSink::new(), ParseOpts::default())
            .from_utf8()
            .one(wrapped.as_bytes())
            .into_dom();

        let xhtml = match dom.find_by_tag("body") {
            Some(body) => serialize::serialize_children(&dom, body),
            None => String::new(),
        };
        Ok(close_void_tags(&xhtml))
    }
}

/// The best normalizer compiled into this build.
pub fn platform_normalizer() -> Box<dyn HtmlToXhtml> {
    #[cfg(feature = "html")]
    {
        Box::new(Html5everNormalizer)
    }
    #[cfg(not(feature = "html"))]
    {
        Box::new(MissingParser)
    }
}

/// Rewrite leftover HTML-only constructs into their XML-safe forms:
/// `<br>`, `<hr>` and `<img …>` become self-closed and `&nbsp;` becomes
/// `&#160;`. Already well-formed input is returned unchanged.
pub fn close_void_tags(html: &str) -> String {
    let html = html.replace("&nbsp;", "&#160;");
    let bytes = html.as_bytes();
    let mut out = String::with_capacity(html.len() + 16);
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' || !starts_void_tag(&bytes[i + 1..]) {
            i += 1;
            continue;
        }
        let Some(end) = tag_end(bytes, i) else {
            break;
        };
        let inner = html[i..end].trim_end();
        if !inner.ends_with('/') {
            out.push_str(&html[copied..i]);
            out.push_str(inner);
            out.push_str(" />");
            copied = end + 1;
        }
        i = end + 1;
    }

    out.push_str(&html[copied..]);
    out
}

fn starts_void_tag(rest: &[u8]) -> bool {
    ["br", "hr", "img"].iter().any(|name| {
        rest.len() > name.len()
            && rest[..name.len()].eq_ignore_ascii_case(name.as_bytes())
            && matches!(rest[name.len()], b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r')
    })
}

/// Index of the `>` closing the tag that starts at `start`, skipping quoted values.
fn tag_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote = None;
    for (offset, &b) in bytes[start..].iter().enumerate() {
        match (quote, b) {
            (None, b'"' | b'\'') => quote = Some(b),
            (Some(q), _) if b == q => quote = None,
            (None, b'>') => return Some(start + offset),
            _ => {}
        }
    }
    None
}
