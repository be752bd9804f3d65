//! Serialization of parsed fragments back to markup.
//!
//! Values in the tree are decoded, so text and attribute values are escaped on
//! the way out, except text inside raw-text elements such as `<script>`.

use super::parse::{RAW_TEXT_ELEMENTS, VOID_ELEMENTS};
use super::tree::{Document, Element, NodeId, NodeKind};

/// Serializes the fragment: each top-level node followed by a newline, with
/// leading/trailing whitespace trimmed from the result. The synthetic root is
/// never emitted.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    for &child in doc.children(doc.root()) {
        write_node(doc, child, &mut out);
        out.push('\n');
    }
    out.trim().to_string()
}

/// Markup of a single node and its descendants.
pub fn outer_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

/// Opening markup of an element (its start tag); empty for other nodes.
pub fn start_tag(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    if let NodeKind::Element(el) = &doc.node(id).kind {
        write_start_tag(el, &mut out);
    }
    out
}

fn write_start_tag(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for attr in &el.attrs {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        escape(&attr.value, true, out);
        out.push('"');
    }
    out.push_str(if el.self_closing { " />" } else { ">" });
}

fn in_raw_text(doc: &Document, id: NodeId) -> bool {
    doc.node(id)
        .parent
        .and_then(|parent| doc.tag_name(parent))
        .is_some_and(|name| RAW_TEXT_ELEMENTS.contains(&name))
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    match &doc.node(id).kind {
        NodeKind::Root => {
            for &child in doc.children(id) {
                write_node(doc, child, out);
            }
        }
        NodeKind::Text(text) if in_raw_text(doc, id) => out.push_str(text),
        NodeKind::Text(text) => escape(text, false, out),
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeKind::Doctype(name) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeKind::Element(el) => {
            write_start_tag(el, out);
            if el.self_closing || VOID_ELEMENTS.contains(&el.name.as_str()) {
                return;
            }
            let children = doc.children(id);
            for &child in children {
                write_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(&el.name);
            out.push('>');
        }
    }
}

/// Escapes `&` and no-break spaces, plus `"` in attribute values or `<`/`>` in text.
fn escape(value: &str, attr_mode: bool, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attr_mode => out.push_str("&quot;"),
            '<' if !attr_mode => out.push_str("&lt;"),
            '>' if !attr_mode => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
