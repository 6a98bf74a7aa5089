//! Reactive elements
//!
//! `React::new(&page, ReactOptions { el, data })` binds an element of the
//! page to a data map: the element's markup becomes the template and
//! every changing write re-renders it.

use crate::{Page, Result};
use dd_dom::{Document, NodeId};
use dd_reactive::{BindError, Binding, MarkupRoot, Template, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// Element to bind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// First element matching a selector
    Selector(String),
    /// A specific element
    Node(NodeId),
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Target::Selector(selector.to_string())
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Target::Selector(selector)
    }
}

impl From<NodeId> for Target {
    fn from(node: NodeId) -> Self {
        Target::Node(node)
    }
}

/// Construction options
#[derive(Debug, Clone, PartialEq)]
pub struct ReactOptions {
    pub el: Target,
    /// Initial values, in order
    pub data: Vec<(String, Value)>,
}

impl ReactOptions {
    pub fn new(el: impl Into<Target>) -> Self {
        Self {
            el: el.into(),
            data: Vec::new(),
        }
    }

    /// Add an initial value
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.push((key.to_string(), value.into()));
        self
    }

    /// Initial values from a JSON object
    pub fn with_json(mut self, object: serde_json::Map<String, serde_json::Value>) -> Self {
        self.data
            .extend(object.into_iter().map(|(k, v)| (k, Value::from(v))));
        self
    }
}

/// A document element seen as a binding root
#[derive(Debug, Clone)]
pub struct ElementRoot {
    document: Rc<RefCell<Document>>,
    node: NodeId,
}

impl ElementRoot {
    /// Fails unless `node` is an element of `document`
    pub fn new(document: Rc<RefCell<Document>>, node: NodeId) -> std::result::Result<Self, BindError> {
        if document.borrow().tree().element(node).is_err() {
            return Err(BindError::RootNotFound(node.to_string()));
        }
        Ok(Self { document, node })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl MarkupRoot for ElementRoot {
    fn markup(&self) -> std::result::Result<String, BindError> {
        self.document
            .borrow()
            .inner_html(self.node)
            .map_err(|e| BindError::Root(e.to_string()))
    }

    fn replace_markup(&mut self, markup: &str) -> std::result::Result<(), BindError> {
        self.document
            .borrow_mut()
            .set_inner_html(self.node, markup)
            .map_err(|e| BindError::Root(e.to_string()))
    }
}

/// An element kept in sync with its data
#[derive(Debug)]
pub struct React {
    binding: Binding<ElementRoot>,
}

impl React {
    /// Resolve the element, capture its markup and render once
    pub fn new(page: &Page, options: ReactOptions) -> Result<Self> {
        let node = match &options.el {
            Target::Selector(selector) => page
                .query(selector)?
                .ok_or_else(|| BindError::RootNotFound(selector.clone()))?,
            Target::Node(node) => *node,
        };
        let root = ElementRoot::new(page.document_handle(), node)?;
        let binding = Binding::new(root, options.data)?;
        Ok(Self { binding })
    }

    /// The bound element
    pub fn el(&self) -> NodeId {
        self.binding.root().node()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.binding.get(key)
    }

    /// Write a bound key; `true` if it changed and re-rendered
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<bool> {
        Ok(self.binding.set(key, value)?)
    }

    pub fn data(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.binding.data()
    }

    pub fn template(&self) -> &Template {
        self.binding.template()
    }

    pub fn render_count(&self) -> u64 {
        self.binding.render_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, PageConfig};

    fn page(markup: &str) -> Page {
        Page::from_html(markup, PageConfig::default()).unwrap()
    }

    #[test]
    fn test_bind_by_selector() {
        let page = page(r#"<div id="app">Hello {{ name }}</div>"#);
        let mut app = React::new(&page, ReactOptions::new("#app").with("name", "A")).unwrap();
        assert_eq!(page.select("#app").unwrap().text().unwrap(), "Hello A");

        assert!(app.set("name", "B").unwrap());
        assert_eq!(page.select("#app").unwrap().text().unwrap(), "Hello B");
        assert_eq!(app.render_count(), 2);
    }

    #[test]
    fn test_bind_by_node() {
        let page = page(r#"<p>{{n}}</p>"#);
        let p = page.query("p").unwrap().unwrap();
        let app = React::new(&page, ReactOptions::new(p).with("n", 5)).unwrap();
        assert_eq!(app.el(), p);
        assert_eq!(page.document().inner_html(p).unwrap(), "5");
    }

    #[test]
    fn test_missing_root() {
        let page = page("<p></p>");
        let result = React::new(&page, ReactOptions::new("#app"));
        assert!(matches!(result, Err(Error::Bind(BindError::RootNotFound(s))) if s == "#app"));
    }

    #[test]
    fn test_node_that_is_not_an_element() {
        let page = page("<p>text</p>");
        let result = React::new(&page, ReactOptions::new(NodeId::ROOT));
        assert!(matches!(result, Err(Error::Bind(BindError::RootNotFound(_)))));
    }

    #[test]
    fn test_values_become_markup() {
        let page = page(r#"<div id="app">{{ body }}</div>"#);
        React::new(&page, ReactOptions::new("#app").with("body", "<b>bold</b>")).unwrap();
        let app = page.query("#app").unwrap().unwrap();
        assert!(page.query("#app b").unwrap().is_some());
        assert_eq!(page.document().text_content(app), "bold");
    }

    #[test]
    fn test_json_data() {
        let page = page(r#"<div id="app">{{a}} {{b}}</div>"#);
        let json = serde_json::json!({"a": 1, "b": [1, 2]});
        let serde_json::Value::Object(map) = json else {
            unreachable!()
        };
        let app = React::new(&page, ReactOptions::new("#app").with_json(map)).unwrap();
        assert_eq!(app.get("a"), Some(&Value::Number(1.0)));
        assert_eq!(page.select("#app").unwrap().text().unwrap(), "1 1,2");
    }
}
