//! XHTML serialization of a parsed arena.

use html5ever::{Namespace, ns};

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};
use super::escape::{is_ncname, is_xml_name, push_attr, push_text};

/// HTML elements that never have content and must be self-closed in XHTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

pub(crate) fn is_void(local: &str) -> bool {
    VOID_ELEMENTS.contains(&local)
}

/// Serialize the children of `parent` (not `parent` itself).
pub fn serialize_children(dom: &ArenaDom, parent: ArenaNodeId) -> String {
    let mut out = String::new();
    let parent_ns = element_ns(dom, parent).unwrap_or(ns!(html));
    for child in dom.children(parent) {
        write_node(dom, child, &parent_ns, &mut out);
    }
    out
}

fn element_ns(dom: &ArenaDom, id: ArenaNodeId) -> Option<Namespace> {
    match &dom.get(id)?.data {
        ArenaNodeData::Element { name, .. } => Some(name.ns.clone()),
        _ => None,
    }
}

fn write_node(dom: &ArenaDom, id: ArenaNodeId, parent_ns: &Namespace, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        ArenaNodeData::Text(text) => push_text(out, text),
        ArenaNodeData::Element { name, attrs } => {
            let local = name.local.as_ref();
            if !is_ncname(local) {
                // Keep the content of tags XML cannot express.
                for child in dom.children(id) {
                    write_node(dom, child, parent_ns, out);
                }
                return;
            }

            out.push('<');
            out.push_str(local);

            // Declare the namespace wherever it changes: foreign roots (inline
            // SVG, MathML) and HTML inside `foreignObject` or `annotation-xml`.
            if name.ns != *parent_ns {
                out.push_str(" xmlns=\"");
                push_attr(out, &name.ns);
                out.push('"');
            }

            let mut declared: Vec<&str> = Vec::new();
            for attr in attrs {
                let attr_name = match &attr.name.prefix {
                    Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                    None => attr.name.local.to_string(),
                };
                // Namespace declarations are regenerated from the parsed names.
                if !is_xml_name(&attr_name)
                    || attr_name == "xmlns"
                    || attr_name.starts_with("xmlns:")
                    || (!is_ncname(&attr.name.local)
                        && !matches!(attr_name.as_str(), "xml:lang" | "xml:space"))
                {
                    continue;
                }
                // `xml:` is predeclared; other prefixes (xlink) are declared in place.
                if let Some(prefix) = &attr.name.prefix
                    && prefix.as_ref() != "xml"
                    && !declared.contains(&prefix.as_ref())
                {
                    out.push_str(" xmlns:");
                    out.push_str(prefix);
                    out.push_str("=\"");
                    push_attr(out, &attr.name.ns);
                    out.push('"');
                    declared.push(prefix.as_ref());
                }
                out.push(' ');
                out.push_str(&attr_name);
                out.push_str("=\"");
                push_attr(out, &attr.value);
                out.push('"');
            }

            if name.ns == ns!(html) && is_void(local) {
                out.push_str(" />");
                return;
            }

            out.push('>');
            for child in dom.children(id) {
                write_node(dom, child, &name.ns, out);
            }
            out.push_str("</");
            out.push_str(local);
            out.push('>');
        }
        // Comments can carry `--` sequences XML forbids; they add nothing to a book.
        ArenaNodeData::Comment(_) | ArenaNodeData::Doctype | ArenaNodeData::Document => {}
    }
}
