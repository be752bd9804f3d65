//! Arena-backed document tree for HTML fragments.

use serde::Serialize;

/// Index of a node in its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Decoded value; a bare attribute such as `hidden` reads as `""`.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name.
    pub name: String,
    pub attrs: Vec<Attribute>,
    /// Written as `<name ... />` in the source.
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Synthetic shell holding the fragment's top-level nodes; never serialized.
    Root,
    Element(Element),
    /// Decoded character data.
    Text(String),
    /// Comment body without the `<!--`/`-->` delimiters. Processing
    /// instructions and CDATA sections land here as bogus comments.
    Comment(String),
    /// Doctype name, possibly empty.
    Doctype(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// A parsed fragment: an arena of nodes under a synthetic root.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    dirty: bool,
}

impl Document {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
            dirty: false,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub(crate) fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.name.as_str())
    }

    /// Appends character data to `parent`, merging with a trailing text node.
    pub(crate) fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.nodes[parent.0].children.last() {
            if let NodeKind::Text(existing) = &mut self.nodes[last.0].kind {
                existing.push_str(text);
                return;
            }
        }
        self.append(parent, NodeKind::Text(text.to_string()));
    }

    /// All elements named `tag` (case-insensitive), in document order.
    pub fn find_all(&self, tag: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            if let Some(el) = self.element(id) {
                if el.name.eq_ignore_ascii_case(tag) {
                    out.push(id);
                }
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Attribute value; bare attributes read as `""`.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Sets (or appends) an attribute on an element. Marks the document dirty
    /// only when the stored value actually changes.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let NodeKind::Element(el) = &mut self.nodes[id.0].kind else {
            return;
        };
        match el.attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
            Some(attr) => {
                if attr.value != value {
                    attr.value = value.to_string();
                    self.dirty = true;
                }
            }
            None => {
                el.attrs.push(Attribute {
                    name: name.to_ascii_lowercase(),
                    value: value.to_string(),
                });
                self.dirty = true;
            }
        }
    }

    /// True once any attribute was changed since parsing.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
