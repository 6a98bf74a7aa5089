//! Document - High-level document API

use crate::{
    parse_document_nodes, parse_fragment, serialize_inner, serialize_outer, CustomElementRegistry, DomError, DomTree,
    EventRegistry, NodeId, SelectorList, StyleDeclaration,
};

/// Connected-callback nesting limit for self-referencing custom elements
const MAX_UPGRADE_DEPTH: usize = 16;

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    events: EventRegistry,
    custom_elements: CustomElementRegistry,
    /// Document URL
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
}

impl Document {
    /// Create a new document with `<html>`, `<head>` and `<body>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh nodes under a fresh root cannot violate the hierarchy
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            events: EventRegistry::new(),
            custom_elements: CustomElementRegistry::new(),
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Parse a full or partial HTML document
    ///
    /// html5ever builds the full `<html>`/`<head>`/`<body>` structure; its
    /// head and body content is moved into the document's own elements.
    pub fn parse(markup: &str, url: &str) -> Result<Self, DomError> {
        let mut doc = Self::new(url);
        let nodes = parse_document_nodes(&mut doc.tree, markup);
        doc.adopt_top_level(nodes)?;
        tracing::debug!(url, nodes = doc.tree.len(), "parsed document");
        Ok(doc)
    }

    fn adopt_top_level(&mut self, nodes: Vec<NodeId>) -> Result<(), DomError> {
        for id in nodes {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            if node.as_text().is_some_and(|t| t.trim().is_empty()) {
                continue;
            }
            let tag = node.as_element().map(|e| e.tag.clone());
            match tag.as_deref() {
                Some("html") => {
                    self.copy_attributes(id, self.html_element)?;
                    let children = self.tree.children(id).map(|(c, _)| c).collect();
                    self.adopt_top_level(children)?;
                }
                Some("head") => self.move_children(id, self.head_element)?,
                Some("body") => {
                    self.copy_attributes(id, self.body_element)?;
                    self.move_children(id, self.body_element)?;
                }
                _ => self.tree.append_child(self.body_element, id)?,
            }
        }
        Ok(())
    }

    fn move_children(&mut self, from: NodeId, to: NodeId) -> Result<(), DomError> {
        let children: Vec<NodeId> = self.tree.children(from).map(|(c, _)| c).collect();
        for child in children {
            self.tree.append_child(to, child)?;
        }
        Ok(())
    }

    fn copy_attributes(&mut self, from: NodeId, to: NodeId) -> Result<(), DomError> {
        let attrs = self.tree.element(from)?.attrs.clone();
        let target = self.tree.element_mut(to)?;
        for attr in attrs {
            target.set_attr(&attr.name, &attr.value);
        }
        Ok(())
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }

    /// Get document title
    pub fn title(&self) -> String {
        self.tree
            .element_children(self.head_element)
            .find(|&id| self.tree.element(id).is_ok_and(|e| e.tag == "title"))
            .map(|id| self.tree.text_content(id))
            .unwrap_or_default()
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get `<head>` element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get `<body>` element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    pub fn events(&self) -> &EventRegistry {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventRegistry {
        &mut self.events
    }

    pub fn custom_elements(&self) -> &CustomElementRegistry {
        &self.custom_elements
    }

    // === Queries ===

    /// First connected element matching `selector`, in document order
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        self.query_selector_within(self.tree.root(), selector)
    }

    /// All connected elements matching `selector`, in document order
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .tree
            .descendants(self.tree.root())
            .into_iter()
            .filter(|&id| list.matches(&self.tree, id))
            .collect())
    }

    /// First descendant of `scope` matching `selector`
    pub fn query_selector_within(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>, DomError> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .tree
            .descendants(scope)
            .into_iter()
            .find(|&id| list.matches(&self.tree, id)))
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&node| self.tree.element(node).is_ok_and(|e| e.id() == Some(id)))
    }

    // === Mutation ===

    /// Allocate a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Append `child` to `parent`, running connected callbacks if it became connected
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.tree.append_child(parent, child)?;
        self.connected(child, 0)
    }

    /// Remove a node from its parent
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        self.tree.detach(node)
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.tree.is_connected(node)
    }

    /// Serialized children of an element
    pub fn inner_html(&self, node: NodeId) -> Result<String, DomError> {
        self.tree.get(node).ok_or(DomError::InvalidNode(node))?;
        Ok(serialize_inner(&self.tree, node))
    }

    /// Serialized element including itself
    pub fn outer_html(&self, node: NodeId) -> Result<String, DomError> {
        self.tree.get(node).ok_or(DomError::InvalidNode(node))?;
        Ok(serialize_outer(&self.tree, node))
    }

    /// Replace the children of an element with parsed `markup`
    pub fn set_inner_html(&mut self, node: NodeId, markup: &str) -> Result<(), DomError> {
        self.set_inner_html_at_depth(node, markup, 0)
    }

    fn set_inner_html_at_depth(
        &mut self,
        node: NodeId,
        markup: &str,
        depth: usize,
    ) -> Result<(), DomError> {
        self.tree.element(node)?;
        self.tree.remove_children(node)?;
        let nodes = parse_fragment(&mut self.tree, markup);
        for &id in &nodes {
            self.tree.append_child(node, id)?;
        }
        for id in nodes {
            self.connected(id, depth)?;
        }
        Ok(())
    }

    /// Text of all descendant text nodes
    pub fn text_content(&self, node: NodeId) -> String {
        self.tree.text_content(node)
    }

    // === Attributes and style ===

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.tree.element(node)?.get_attr(name).map(str::to_string))
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.tree.element_mut(node)?.set_attr(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.tree.element_mut(node)?.remove_attr(name))
    }

    /// Parsed inline style of an element
    pub fn style(&self, node: NodeId) -> Result<StyleDeclaration, DomError> {
        let elem = self.tree.element(node)?;
        Ok(StyleDeclaration::parse(elem.get_attr("style").unwrap_or("")))
    }

    /// Read one inline style property
    pub fn style_property(&self, node: NodeId, property: &str) -> Result<Option<String>, DomError> {
        Ok(self.style(node)?.get_property(property).map(str::to_string))
    }

    /// Set one inline style property; an empty value removes it
    pub fn set_style_property(
        &mut self,
        node: NodeId,
        property: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let mut style = self.style(node)?;
        style.set_property(property, value);
        let elem = self.tree.element_mut(node)?;
        if style.is_empty() {
            elem.remove_attr("style");
        } else {
            elem.set_attr("style", &style.to_string());
        }
        Ok(())
    }

    // === Custom elements ===

    /// Define a custom element and upgrade connected instances
    ///
    /// Returns the number of elements upgraded immediately.
    pub fn define_custom_element(&mut self, name: &str, markup: &str) -> Result<usize, DomError> {
        self.custom_elements.define(name, markup)?;

        let instances: Vec<NodeId> = self
            .tree
            .descendants(self.tree.root())
            .into_iter()
            .filter(|&id| self.tree.element(id).is_ok_and(|e| e.tag == name))
            .collect();

        let mut upgraded = 0;
        for id in instances {
            if self.tree.is_connected(id) {
                self.run_connected_callback(id, 0)?;
                upgraded += 1;
            }
        }
        Ok(upgraded)
    }

    /// Run connected callbacks for defined custom elements in a newly inserted subtree
    fn connected(&mut self, root: NodeId, depth: usize) -> Result<(), DomError> {
        if self.custom_elements.is_empty() || !self.tree.is_connected(root) {
            return Ok(());
        }

        let mut candidates = vec![root];
        candidates.extend(self.tree.descendants(root));
        for id in candidates {
            let defined = self
                .tree
                .element(id)
                .is_ok_and(|e| self.custom_elements.is_defined(&e.tag));
            // An earlier callback may have replaced this node's ancestors
            if defined && self.tree.is_inclusive_ancestor(root, id) {
                self.run_connected_callback(id, depth)?;
            }
        }
        Ok(())
    }

    fn run_connected_callback(&mut self, node: NodeId, depth: usize) -> Result<(), DomError> {
        if depth >= MAX_UPGRADE_DEPTH {
            tracing::warn!(%node, "custom element nesting too deep; not upgrading");
            return Ok(());
        }
        let tag = self.tree.element(node)?.tag.clone();
        let Some(markup) = self.custom_elements.get(&tag).map(|d| d.markup.clone()) else {
            return Ok(());
        };
        self.tree.element_mut(node)?.upgraded = true;
        self.set_inner_html_at_depth(node, &markup, depth + 1)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
