//! Serialization of arena DOM fragments back to HTML.
//!
//! Goes through html5ever's serializer so text and attribute escaping (and
//! void elements like `<br>`) follow the HTML serialization algorithm.

use std::io;

use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};

use super::{Dom, NodeData, NodeId};

/// A borrowed view of one node in a [`Dom`], serializable with html5ever.
struct FragmentRef<'a> {
    dom: &'a Dom,
    node: NodeId,
}

impl Serialize for FragmentRef<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        match traversal_scope {
            TraversalScope::IncludeNode => serialize_node(self.dom, self.node, serializer),
            TraversalScope::ChildrenOnly(_) => {
                for child in self.dom.children(self.node) {
                    serialize_node(self.dom, child, serializer)?;
                }
                Ok(())
            }
        }
    }
}

fn serialize_node<S>(dom: &Dom, id: NodeId, serializer: &mut S) -> io::Result<()>
where
    S: Serializer,
{
    let Some(node) = dom.get(id) else {
        return Ok(());
    };

    match &node.data {
        NodeData::Element { name, attrs } => {
            serializer.start_elem(name.clone(), attrs.iter().map(|a| (&a.name, &*a.value)))?;
            for child in dom.children(id) {
                serialize_node(dom, child, serializer)?;
            }
            serializer.end_elem(name.clone())?;
        }
        NodeData::Text(text) => {
            serializer.write_text(text)?;
        }
        // Comments and the document root never appear in output
        _ => {}
    }

    Ok(())
}

/// Serialize the children of `root` to an HTML string, in document order.
pub fn serialize_children(dom: &Dom, root: NodeId) -> String {
    let mut bytes = Vec::new();
    let fragment = FragmentRef { dom, node: root };

    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };

    serialize(&mut bytes, &fragment, opts).expect("serialization failed");

    String::from_utf8(bytes).unwrap_or_default()
}
