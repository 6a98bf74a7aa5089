//! HTML5 parsing
//!
//! Uses html5ever's RcDom and converts the result into our arena. Fragments
//! are parsed the way `innerHTML` parses them, in a `<body>` context.

use crate::{DomTree, NodeId};
use html5ever::tendril::TendrilSink;
use html5ever::{local_name, ns, parse_document, parse_fragment as parse_html_fragment, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// Parse `markup` into detached nodes in `tree`, returning the top-level nodes
pub fn parse_fragment(tree: &mut DomTree, markup: &str) -> Vec<NodeId> {
    let context = QualName::new(None, ns!(html), local_name!("body"));
    let dom = parse_html_fragment(RcDom::default(), Default::default(), context, Vec::new(), false)
        .one(markup);

    // The fragment's nodes hang off a synthetic <html> element
    let mut top_level = Vec::new();
    for wrapper in dom.document.children.borrow().iter() {
        for child in wrapper.children.borrow().iter() {
            if let Some(id) = convert_node(child, tree) {
                top_level.push(id);
            }
        }
    }
    tracing::trace!(nodes = top_level.len(), "parsed fragment");
    top_level
}

/// Parse a whole document, returning the detached top-level nodes
/// (normally a single `<html>` element)
pub fn parse_document_nodes(tree: &mut DomTree, markup: &str) -> Vec<NodeId> {
    let dom = parse_document(RcDom::default(), Default::default()).one(markup);
    let top_level: Vec<NodeId> = dom
        .document
        .children
        .borrow()
        .iter()
        .filter_map(|child| convert_node(child, tree))
        .collect();
    tracing::trace!(nodes = top_level.len(), "parsed document");
    top_level
}

/// Convert an RcDom node (and its subtree) into a detached arena node
fn convert_node(handle: &Handle, tree: &mut DomTree) -> Option<NodeId> {
    match &handle.data {
        RcNodeData::Text { contents } => Some(tree.create_text(&contents.borrow())),
        RcNodeData::Comment { contents } => Some(tree.create_comment(contents)),
        RcNodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let id = tree.create_element(&name.local);
            if let Ok(elem) = tree.element_mut(id) {
                for attr in attrs.borrow().iter() {
                    elem.set_attr(&attr.name.local, &attr.value);
                }
            }

            // <template> keeps its content in a separate fragment
            let contents = template_contents.borrow();
            let children = match contents.as_ref() {
                Some(fragment) => fragment.children.borrow().clone(),
                None => handle.children.borrow().clone(),
            };
            for child in &children {
                if let Some(child_id) = convert_node(child, tree) {
                    if let Err(err) = tree.append_child(id, child_id) {
                        tracing::warn!(%err, "dropping unparentable node");
                    }
                }
            }
            Some(id)
        }
        RcNodeData::Document
        | RcNodeData::Doctype { .. }
        | RcNodeData::ProcessingInstruction { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(tree: &DomTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| match tree.get(id).and_then(|n| n.as_element()) {
                Some(elem) => elem.tag.clone(),
                None => format!("#{}", tree.get(id).and_then(|n| n.as_text()).unwrap_or("?")),
            })
            .collect()
    }

    #[test]
    fn test_text_only() {
        let mut tree = DomTree::new();
        let nodes = parse_fragment(&mut tree, "Hello {{ name }}");
        assert_eq!(tags(&tree, &nodes), vec!["#Hello {{ name }}"]);
    }

    #[test]
    fn test_nested_elements() {
        let mut tree = DomTree::new();
        let nodes = parse_fragment(&mut tree, "<div id=\"a\"><span>x</span>y</div>z");
        assert_eq!(tags(&tree, &nodes), vec!["div", "#z"]);

        let div = nodes[0];
        let children: Vec<_> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(tags(&tree, &children), vec!["span", "#y"]);
        assert_eq!(tree.element(div).unwrap().id(), Some("a"));
    }

    #[test]
    fn test_attribute_forms() {
        let mut tree = DomTree::new();
        let nodes = parse_fragment(&mut tree, "<input type=text disabled value='a &amp; b' data-x = \"1\">");
        let elem = tree.element(nodes[0]).unwrap();
        assert_eq!(elem.get_attr("type"), Some("text"));
        assert_eq!(elem.get_attr("disabled"), Some(""));
        assert_eq!(elem.get_attr("value"), Some("a & b"));
        assert_eq!(elem.get_attr("data-x"), Some("1"));
        assert!(tree.get(nodes[0]).unwrap().first_child == NodeId::NONE);
    }

    #[test]
    fn test_void_element() {
        let mut tree = DomTree::new();
        let nodes = parse_fragment(&mut tree, "a<br>b");
        assert_eq!(tags(&tree, &nodes), vec!["#a", "br", "#b"]);
    }

    #[test]
    fn test_slash_on_non_void_is_ignored() {
        let mut tree = DomTree::new();
        let nodes = parse_fragment(&mut tree, "<span/>{{x}}");
        assert_eq!(tags(&tree, &nodes), vec!["span"]);
        assert_eq!(tree.text_content(nodes[0]), "{{x}}");
    }

    #[test]
    fn test_raw_text_script() {
        let mut tree = DomTree::new();
        let nodes = parse_fragment(&mut tree, "<script>if (a < b) { x = '<div>'; }</script><p>after</p>");
        assert_eq!(tags(&tree, &nodes), vec!["script", "p"]);
        assert_eq!(tree.text_content(nodes[0]), "if (a < b) { x = '<div>'; }");
    }

    #[test]
    fn test_unmatched_end_tag_ignored() {
        let mut tree = DomTree::new();
        let nodes = parse_fragment(&mut tree, "</b>one<i>two</b>three</i>");
        assert_eq!(tags(&tree, &nodes), vec!["#one", "i"]);
        assert_eq!(tree.text_content(nodes[1]), "twothree");
    }

    #[test]
    fn test_implied_close_for_list_items() {
        let mut tree = DomTree::new();
        let nodes = parse_fragment(&mut tree, "<ul><li>a<li>b</ul>");
        let items: Vec<_> = tree.children(nodes[0]).map(|(id, _)| id).collect();
        assert_eq!(tags(&tree, &items), vec!["li", "li"]);
    }

    #[test]
    fn test_lone_angle_bracket_is_text() {
        let mut tree = DomTree::new();
        let nodes = parse_fragment(&mut tree, "1 < 2 and <3");
        assert_eq!(tree.get(nodes[0]).unwrap().as_text(), Some("1 < 2 and <3"));
    }

    #[test]
    fn test_comment_and_doctype() {
        let mut tree = DomTree::new();
        let nodes = parse_fragment(&mut tree, "<!DOCTYPE html><!-- note -->x");
        assert_eq!(nodes.len(), 2);
        assert!(matches!(tree.get(nodes[0]).unwrap().data, crate::NodeData::Comment(ref c) if c == " note "));
    }

    #[test]
    fn test_named_character_references() {
        let mut tree = DomTree::new();
        let nodes = parse_fragment(&mut tree, "A &hellip; &mdash; &lt;b&gt; &#65;&#x42; &unknown;");
        assert_eq!(
            tree.get(nodes[0]).unwrap().as_text(),
            Some("A \u{2026} \u{2014} <b> AB &unknown;")
        );
    }

    #[test]
    fn test_template_contents_become_children() {
        let mut tree = DomTree::new();
        let nodes = parse_fragment(&mut tree, "<template><b>x</b></template>");
        let children: Vec<_> = tree.children(nodes[0]).map(|(id, _)| id).collect();
        assert_eq!(tags(&tree, &children), vec!["b"]);
    }

    #[test]
    fn test_document_nodes() {
        let mut tree = DomTree::new();
        let nodes = parse_document_nodes(&mut tree, "<!DOCTYPE html><title>T</title><p>x</p>");
        assert_eq!(tags(&tree, &nodes), vec!["html"]);
        let sections: Vec<_> = tree.children(nodes[0]).map(|(id, _)| id).collect();
        assert_eq!(tags(&tree, &sections), vec!["head", "body"]);
    }
}
