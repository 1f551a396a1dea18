//! Glue between html5ever's tree builder and the arena.
//!
//! The tree builder drives this sink through `&self` methods, so the arena
//! sits behind a `RefCell` and every operation takes a short-lived borrow.
//! Handles given to the builder are plain arena ids. Anything the builder
//! creates that a sanitized fragment can never contain (doctypes, processing
//! instructions, quirks-mode bookkeeping) is accepted and dropped here rather
//! than stored.

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as Html5Attribute, QualName};

use super::{Attribute, Dom, NodeData, NodeId};

/// Arena id wrapper handed out to the tree builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHandle(pub NodeId);

impl Default for NodeHandle {
    fn default() -> Self {
        NodeHandle(NodeId::NONE)
    }
}

/// Builds a [`Dom`] while html5ever parses.
pub struct DomSink {
    dom: RefCell<Dom>,
}

impl Default for DomSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DomSink {
    pub fn new() -> Self {
        Self {
            dom: RefCell::new(Dom::new()),
        }
    }

    /// Consume the sink and return the DOM.
    pub fn into_dom(self) -> Dom {
        self.dom.into_inner()
    }

    fn append_node_or_text(&self, parent: NodeId, child: NodeOrText<NodeHandle>) {
        let mut dom = self.dom.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => dom.append(parent, node.0),
            NodeOrText::AppendText(text) => dom.append_text(parent, &text),
        }
    }
}

impl TreeSink for DomSink {
    type Handle = NodeHandle;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, _msg: std::borrow::Cow<'static, str>) {
        // Pasted markup is routinely broken; recovery is the whole point
    }

    fn get_document(&self) -> Self::Handle {
        NodeHandle(self.dom.borrow().document())
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        static NOT_AN_ELEMENT: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };

        let dom = self.dom.borrow();
        match dom.get(target.0).map(|n| &n.data) {
            Some(NodeData::Element { name, .. }) => {
                // SAFETY: the trait wants a reference living as long as
                // `self`, but ours comes out of a RefCell guard. The name is
                // owned by the arena inside `self`, the arena never frees or
                // rewrites element names, and the tree builder reads the
                // reference right away instead of holding it across sink
                // calls that could grow the node vector. Extending the
                // lifetime past the guard is therefore sound in this usage.
                unsafe { std::mem::transmute::<&QualName, &'a QualName>(name) }
            }
            _ => &NOT_AN_ELEMENT,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Html5Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        // Tendril values become plain strings; the sanitizer rewrites
        // attribute values anyway when it copies an element to output
        let attrs = attrs
            .into_iter()
            .map(|a| Attribute {
                name: a.name,
                value: a.value.to_string(),
            })
            .collect();

        NodeHandle(self.dom.borrow_mut().create_element(name, attrs))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        // Kept as a node so the builder can address it; the cleaning pass
        // discards it
        NodeHandle(self.dom.borrow_mut().create_comment(text.to_string()))
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        // A processing instruction is as dead to the sanitizer as a comment
        NodeHandle(self.dom.borrow_mut().create_comment(String::new()))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        self.append_node_or_text(parent.0, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        // Foster parenting: prefer the element's parent, fall back to the
        // previous element when it has none
        let parent = self
            .dom
            .borrow()
            .get(element.0)
            .map(|n| n.parent)
            .filter(|p| p.is_some());

        match parent {
            Some(parent) => self.append_node_or_text(parent, child),
            None => self.append_node_or_text(prev_element.0, child),
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Doctypes never appear in a sanitized fragment
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // No separate template tree: a template ends up stripped or
        // unwrapped like any other disallowed tag, so parsing its content
        // in place is good enough
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x.0 == y.0
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {
        // Quirks mode only matters for layout, not for filtering
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut dom = self.dom.borrow_mut();
        let node = match new_node {
            NodeOrText::AppendNode(node) => node.0,
            NodeOrText::AppendText(text) => dom.create_text(text.to_string()),
        };
        dom.insert_before(sibling.0, node);
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Html5Attribute>) {
        let mut dom = self.dom.borrow_mut();
        let Some(node) = dom.get_mut(target.0) else {
            return;
        };
        let NodeData::Element {
            attrs: existing, ..
        } = &mut node.data
        else {
            return;
        };

        for attr in attrs {
            let duplicate = existing.iter().any(|a| a.name == attr.name);
            if !duplicate {
                existing.push(Attribute {
                    name: attr.name,
                    value: attr.value.to_string(),
                });
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.dom.borrow_mut().detach(target.0);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        // Two passes over a snapshot of the child list: the sibling links
        // change under us as each child moves
        let children: Vec<_> = self.dom.borrow().children(node.0).collect();

        let mut dom = self.dom.borrow_mut();
        for child in children {
            dom.detach(child);
            dom.append(new_parent.0, child);
        }
    }
}
