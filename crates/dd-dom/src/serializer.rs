//! HTML Serialization (innerHTML/outerHTML)

use crate::{DomTree, NodeData, NodeId};

/// Elements serialized without content or end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text children are written unescaped
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Serialize the children of a node
pub fn serialize_inner(tree: &DomTree, node_id: NodeId) -> String {
    let mut output = String::new();
    serialize_children(tree, node_id, &mut output);
    output
}

/// Serialize a node including itself
pub fn serialize_outer(tree: &DomTree, node_id: NodeId) -> String {
    let mut output = String::new();
    serialize_node(tree, node_id, &mut output);
    output
}

fn serialize_node(tree: &DomTree, node_id: NodeId, output: &mut String) {
    let Some(node) = tree.get(node_id) else {
        return;
    };

    match &node.data {
        NodeData::Document => serialize_children(tree, node_id, output),
        NodeData::Element(elem) => {
            let tag = elem.tag.as_str();

            output.push('<');
            output.push_str(tag);
            for attr in &elem.attrs {
                output.push(' ');
                output.push_str(&attr.name);
                output.push_str("=\"");
                escape_attribute(&attr.value, output);
                output.push('"');
            }
            output.push('>');

            if VOID_ELEMENTS.contains(&tag) {
                return;
            }

            if RAW_TEXT_ELEMENTS.contains(&tag) {
                for (_, child) in tree.children(node_id) {
                    if let Some(text) = child.as_text() {
                        output.push_str(text);
                    }
                }
            } else {
                serialize_children(tree, node_id, output);
            }

            output.push_str("</");
            output.push_str(tag);
            output.push('>');
        }
        NodeData::Text(text) => escape_text(text, output),
        NodeData::Comment(text) => {
            output.push_str("<!--");
            output.push_str(text);
            output.push_str("-->");
        }
    }
}

fn serialize_children(tree: &DomTree, parent_id: NodeId, output: &mut String) {
    for (child_id, _) in tree.children(parent_id) {
        serialize_node(tree, child_id, output);
    }
}

fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}
