//! Arena-allocated DOM that html5ever parses chapter fragments into.
//!
//! Nodes are never freed during a parse; detaching only rewires links. That
//! keeps every `ArenaNodeId` valid for the lifetime of the arena.

use html5ever::{LocalName, QualName};

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaNodeId(pub u32);

impl ArenaNodeId {
    /// Sentinel for "no node".
    pub const NONE: ArenaNodeId = ArenaNodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

#[derive(Debug, Clone)]
pub enum ArenaNodeData {
    Document,
    /// The name is boxed so its address survives arena growth; the tree
    /// sink hands out references to it.
    Element {
        name: Box<QualName>,
        attrs: Vec<Attribute>,
    },
    Text(String),
    Comment(String),
    Doctype,
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

#[derive(Debug)]
pub struct ArenaNode {
    pub data: ArenaNodeData,
    pub parent: ArenaNodeId,
    pub first_child: ArenaNodeId,
    pub last_child: ArenaNodeId,
    pub prev_sibling: ArenaNodeId,
    pub next_sibling: ArenaNodeId,
}

impl ArenaNode {
    fn new(data: ArenaNodeData) -> Self {
        Self {
            data,
            parent: ArenaNodeId::NONE,
            first_child: ArenaNodeId::NONE,
            last_child: ArenaNodeId::NONE,
            prev_sibling: ArenaNodeId::NONE,
            next_sibling: ArenaNodeId::NONE,
        }
    }
}

pub struct ArenaDom {
    nodes: Vec<ArenaNode>,
    document: ArenaNodeId,
}

impl ArenaDom {
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: ArenaNodeId::NONE,
        };
        dom.document = dom.alloc(ArenaNodeData::Document);
        dom
    }

    fn alloc(&mut self, data: ArenaNodeData) -> ArenaNodeId {
        let id = ArenaNodeId(self.nodes.len() as u32);
        self.nodes.push(ArenaNode::new(data));
        id
    }

    pub fn document(&self) -> ArenaNodeId {
        self.document
    }

    pub fn get(&self, id: ArenaNodeId) -> Option<&ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ArenaNodeId) -> Option<&mut ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> ArenaNodeId {
        self.alloc(ArenaNodeData::Element {
            name: Box::new(name),
            attrs,
        })
    }

    pub fn create_text(&mut self, text: String) -> ArenaNodeId {
        self.alloc(ArenaNodeData::Text(text))
    }

    pub fn create_comment(&mut self, text: String) -> ArenaNodeId {
        self.alloc(ArenaNodeData::Comment(text))
    }

    pub fn create_doctype(&mut self) -> ArenaNodeId {
        self.alloc(ArenaNodeData::Doctype)
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: ArenaNodeId, child: ArenaNodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = last_child;
            node.next_sibling = ArenaNodeId::NONE;
        }
        if let Some(last) = self.get_mut(last_child) {
            last.next_sibling = child;
        }
        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert `new_node` immediately before `sibling`.
    pub fn insert_before(&mut self, sibling: ArenaNodeId, new_node: ArenaNodeId) {
        let Some((parent, prev)) = self.get(sibling).map(|n| (n.parent, n.prev_sibling)) else {
            return;
        };

        if let Some(node) = self.get_mut(new_node) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = sibling;
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

    /// Append text to `parent`, merging with a trailing text node.
    pub fn append_text(&mut self, parent: ArenaNodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let ArenaNodeData::Text(existing) = &mut last.data
        {
            existing.push_str(text);
            return;
        }

        let node = self.create_text(text.to_string());
        self.append(parent, node);
    }

    /// Unlink a node from its parent and siblings. The node keeps its children.
    pub fn detach(&mut self, id: ArenaNodeId) {
        let Some((parent, prev, next)) = self
            .get(id)
            .map(|n| (n.parent, n.prev_sibling, n.next_sibling))
        else {
            return;
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = ArenaNodeId::NONE;
            node.prev_sibling = ArenaNodeId::NONE;
            node.next_sibling = ArenaNodeId::NONE;
        }
    }

    pub fn children(&self, parent: ArenaNodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(ArenaNodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// First element with the given local name, in document order.
    pub fn find_by_tag(&self, tag: &str) -> Option<ArenaNodeId> {
        let mut stack = vec![self.document];
        while let Some(id) = stack.pop() {
            if self.element_name(id).is_some_and(|n| n.as_ref() == tag) {
                return Some(id);
            }
            let mut children: Vec<_> = self.children(id).collect();
            children.reverse();
            stack.extend(children);
        }
        None
    }

    pub fn element_name(&self, id: ArenaNodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    pub fn text_content(&self, id: ArenaNodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ChildrenIter<'a> {
    dom: &'a ArenaDom,
    current: ArenaNodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = ArenaNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(ArenaNodeId::NONE);
        Some(id)
    }
}
