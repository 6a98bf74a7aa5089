//! doubledollar DOM - Document Object Model
//!
//! Arena-backed DOM tree with markup parsing and serialization, a small
//! selector engine, inline styles, event listeners and custom elements.

mod node;
mod tree;
mod document;
mod parser;
mod serializer;
pub mod selector;
pub mod style;
pub mod events;
pub mod custom_elements;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::{DomTree, Children};
pub use document::Document;
pub use parser::{parse_document_nodes, parse_fragment};
pub use serializer::{serialize_inner, serialize_outer};
pub use selector::{Selector, SelectorList};
pub use style::StyleDeclaration;
pub use events::{Event, EventRegistry, Listener};
pub use custom_elements::{CustomElementRegistry, CustomElementDefinition, CustomElementError};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// DOM errors
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("no such node: {0}")]
    InvalidNode(NodeId),

    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("hierarchy request error: cannot insert {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error(transparent)]
    CustomElement(#[from] CustomElementError),
}
