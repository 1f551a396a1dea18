//! Arena-based DOM for HTML fragments.
//!
//! html5ever parses into this arena via the [`tree_sink`] module. All nodes
//! live in a contiguous vector; parent/child/sibling links are indices into
//! that vector. A fragment is the ordered forest of children under a root
//! node, not a full document.

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::{LocalName, QualName};

mod serialize;
mod tree_sink;

pub use serialize::serialize_children;
use tree_sink::DomSink;

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node type in the arena DOM.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Root of the fragment forest.
    Document,
    /// Element with name and attributes.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
    },
    /// Text content.
    Text(String),
    /// Comment (required by the TreeSink contract, never serialized).
    Comment(String),
}

/// HTML attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// A node in the arena DOM.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Arena-based DOM tree.
pub struct Dom {
    nodes: Vec<Node>,
    document: NodeId,
}

impl Dom {
    /// Create a new empty DOM with a document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
        };
        dom.document = dom.alloc(Node::new(NodeData::Document));
        dom
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document root ID.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a new element node.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        self.alloc(Node::new(NodeData::Element { name, attrs }))
    }

    /// Create a new text node.
    pub fn create_text(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text)))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text)))
    }

    /// Append a child to a parent node.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
        }

        if last_child.is_some() {
            if let Some(last_node) = self.get_mut(last_child) {
                last_node.next_sibling = child;
            }
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a node before a sibling.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let parent = self.get(sibling).map(|n| n.parent).unwrap_or(NodeId::NONE);
        let prev = self
            .get(sibling)
            .map(|n| n.prev_sibling)
            .unwrap_or(NodeId::NONE);

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Unlink a node from its parent and siblings. The node stays allocated
    /// in the arena and can be re-appended elsewhere.
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);

        match self.get_mut(prev) {
            Some(prev_node) => prev_node.next_sibling = next,
            None => {
                if let Some(parent_node) = self.get_mut(parent) {
                    parent_node.first_child = next;
                }
            }
        }

        match self.get_mut(next) {
            Some(next_node) => next_node.prev_sibling = prev,
            None => {
                if let Some(parent_node) = self.get_mut(parent) {
                    parent_node.last_child = prev;
                }
            }
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Append text to a parent, merging into a trailing text node if present.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child) {
            if let NodeData::Text(ref mut existing) = last.data {
                existing.push_str(text);
                return;
            }
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Find the first element matching a predicate (DFS).
    pub fn find<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        let mut stack = vec![self.document];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                if predicate(node) {
                    return Some(id);
                }
                // Push children in reverse order for left-to-right traversal
                let mut children: Vec<_> = self.children(id).collect();
                children.reverse();
                stack.extend(children);
            }
        }
        None
    }

    /// Find element by tag name (first match).
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.find(|node| {
            if let NodeData::Element { name, .. } = &node.data {
                name.local.as_ref() == tag
            } else {
                false
            }
        })
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a Dom,
    current: NodeId,
}

impl<'a> Iterator for ChildrenIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

/// Convenience methods for element and text nodes.
impl Dom {
    /// Get element's local name (tag).
    pub fn element_name(&self, id: NodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    /// Get an attribute value.
    pub fn get_attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == attr_name)
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }

    /// Get text content of a text node.
    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

/// Parse an HTML fragment into an arena DOM.
///
/// The fragment is wrapped in a minimal document so html5ever's document
/// parser can handle it; the caller extracts the `body` children as the
/// fragment forest. Malformed input is recovered best-effort, like a browser.
pub fn parse_fragment(html: &str) -> Dom {
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
    let sink = DomSink::new();
    parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(wrapped.as_bytes())
        .into_dom()
}

/// Locate the `body` element of a parsed fragment wrapper.
pub fn fragment_root(dom: &Dom) -> Option<NodeId> {
    dom.find_by_tag("body")
}
