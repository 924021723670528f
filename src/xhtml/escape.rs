//! XML escaping helpers.

/// Escape XML special characters for text nodes and attribute values.
///
/// Characters outside the XML 1.0 `Char` range (most C0 controls, U+FFFE,
/// U+FFFF) cannot appear in a document at all and are silently removed.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}

/// Append escaped text content. Non-breaking spaces are written as a
/// numeric reference so the result never depends on HTML named entities.
pub(crate) fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&#160;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
}

/// Append an escaped attribute value (without the surrounding quotes).
pub(crate) fn push_attr(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&#160;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
}

/// Characters allowed by the XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Whether `name` can be written as an XML element or attribute name.
pub(crate) fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == ':')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
}

/// Whether `name` is a valid name without a namespace prefix (`NCName`).
///
/// HTML parsing never binds prefixes on HTML elements, so a colon in such a
/// name (`o:p`, `v:shape` from pasted Word markup) would reference an
/// undeclared namespace.
pub(crate) fn is_ncname(name: &str) -> bool {
    is_xml_name(name) && !name.contains(':')
}
