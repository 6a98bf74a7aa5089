//! DOM Events
//!
//! Per-node listener registry. Dispatch is synchronous and does not
//! bubble: only listeners registered on the target node run.

use crate::NodeId;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Event listener callback
pub type Listener = Rc<dyn Fn(&Event)>;

/// A dispatched event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Case-sensitive event type ("click", "input", ...)
    pub kind: String,
    pub target: NodeId,
}

impl Event {
    pub fn new(kind: &str, target: NodeId) -> Self {
        Self {
            kind: kind.to_string(),
            target,
        }
    }
}

/// Event listeners keyed by node
#[derive(Default)]
pub struct EventRegistry {
    listeners: HashMap<NodeId, Vec<(String, Listener)>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `kind` on `node`
    pub fn add_listener(&mut self, node: NodeId, kind: &str, listener: Listener) {
        self.listeners
            .entry(node)
            .or_default()
            .push((kind.to_string(), listener));
    }

    /// Listeners for `kind` on `node`, in registration order
    ///
    /// Returned as owned handles so callers can run them without holding
    /// a borrow of the registry.
    pub fn listeners_for(&self, node: NodeId, kind: &str) -> Vec<Listener> {
        self.listeners
            .get(&node)
            .map(|list| {
                list.iter()
                    .filter(|(k, _)| k == kind)
                    .map(|(_, l)| Rc::clone(l))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Drop every listener registered on `node`
    pub fn remove_all(&mut self, node: NodeId) {
        self.listeners.remove(&node);
    }

    /// Total number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("nodes", &self.listeners.len())
            .field("listeners", &self.len())
            .finish()
    }
}
