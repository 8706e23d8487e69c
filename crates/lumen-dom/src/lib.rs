//! Element tree for the Lumen XHTML viewer.
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships. A parent owns its children through the arena; the
//! `parent` field is a plain index back-reference, never an owner, so there
//! are no reference cycles and teardown is a single `Vec` drop.
//!
//! The document node at [`NodeId::ROOT`] is a synthetic root. Parsed top-level
//! elements (usually a single `<html>`) are its children.

pub mod element;
pub mod style;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub use element::{Attribute, Attributes, ElementData, ElementType};
pub use style::{
    Color, DEFAULT_FONT_SIZE_PX, Edges, Length, StyleEntry, StyleError, StyleFlags,
    TextDecoration, Unit,
};

/// A type-safe index into the [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The synthetic document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Misuse of the tree's structural API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The id does not name a node of this tree.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    /// Only container elements (and the document) own children.
    #[error("node {0} cannot have children")]
    NotAContainer(NodeId),
    /// A node may have one parent only.
    #[error("node {0} already has a parent")]
    AlreadyAttached(NodeId),
    /// Appending would make a node its own ancestor.
    #[error("appending {child} to {parent} would create a cycle")]
    Cycle {
        /// The would-be parent.
        parent: NodeId,
        /// The would-be child.
        child: NodeId,
    },
    /// Only styleable elements carry a style entry.
    #[error("node {0} cannot carry a style entry")]
    NotStyleable(NodeId),
}

/// What a node is.
#[derive(Debug, Clone, Serialize)]
pub enum NodeKind {
    /// The synthetic root.
    Document,
    /// An element with its data.
    Element(ElementData),
    /// A run of text. Never contains a line break.
    Text(String),
    /// Comment text without the `<!--`/`-->` delimiters.
    Comment(String),
}

/// One node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// What the node is.
    pub kind: NodeKind,
    /// Back-reference to the owning parent.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
    /// The sibling after this one.
    pub next_sibling: Option<NodeId>,
    /// The sibling before this one.
    pub prev_sibling: Option<NodeId>,
}

impl Node {
    const fn detached(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        }
    }

    /// The element type of this node. Text and comment nodes report their
    /// pseudo-element type; the document reports `None`.
    #[must_use]
    pub const fn element_type(&self) -> Option<ElementType> {
        match &self.kind {
            NodeKind::Document => None,
            NodeKind::Element(data) => Some(data.element_type),
            NodeKind::Text(_) => Some(ElementType::Text),
            NodeKind::Comment(_) => Some(ElementType::Comment),
        }
    }

    /// Whether this node may own children.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        match self.element_type() {
            None => true,
            Some(t) => t.is_container(),
        }
    }
}

/// Arena-based element tree.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// A tree holding only the synthetic document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(NodeKind::Document)],
        }
    }

    /// The document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Look up a node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes, the document node included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(kind));
        id
    }

    /// Allocate a detached element with no attributes.
    pub fn create_element(&mut self, element_type: ElementType) -> NodeId {
        self.alloc(NodeKind::Element(ElementData::new(element_type)))
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.to_string()))
    }

    /// Allocate a detached comment node.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Comment(text.to_string()))
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Fails if either id is unknown, `parent` is a leaf, `child` already has
    /// a parent, or `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_node = self.get(parent).ok_or(DomError::UnknownNode(parent))?;
        if !parent_node.is_container() {
            return Err(DomError::NotAContainer(parent));
        }
        let child_node = self.get(child).ok_or(DomError::UnknownNode(child))?;
        if child_node.parent.is_some() || child == NodeId::ROOT {
            return Err(DomError::AlreadyAttached(child));
        }
        if child == parent || self.is_descendant_of(parent, child) {
            return Err(DomError::Cycle { parent, child });
        }

        let prev_last = self.nodes[parent.0].children.last().copied();
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        if let Some(prev) = prev_last {
            self.nodes[prev.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev);
        }
        Ok(())
    }

    /// Create an element and append it to `parent`.
    ///
    /// # Errors
    ///
    /// See [`DomTree::append_child`].
    pub fn append_element(
        &mut self,
        parent: NodeId,
        element_type: ElementType,
    ) -> Result<NodeId, DomError> {
        let id = self.create_element(element_type);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Create a text node and append it to `parent`.
    ///
    /// # Errors
    ///
    /// See [`DomTree::append_child`].
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, DomError> {
        let id = self.create_text(text);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Attach an inline style entry to a styleable element.
    ///
    /// # Errors
    ///
    /// Fails if `id` is unknown or not a styleable element.
    pub fn set_style(&mut self, id: NodeId, style: StyleEntry) -> Result<(), DomError> {
        let data = self.as_element_mut(id).ok_or(DomError::NotStyleable(id))?;
        if !data.element_type.is_styleable() {
            return Err(DomError::NotStyleable(id));
        }
        data.style = Some(style);
        Ok(())
    }

    /// The parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of a node in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// The first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// The last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// The next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// The previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Element type of a node, see [`Node::element_type`].
    #[must_use]
    pub fn element_type(&self, id: NodeId) -> Option<ElementType> {
        self.get(id).and_then(Node::element_type)
    }

    /// Element data if the node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Mutable element data if the node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Text if the node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Whether `descendant` lies strictly below `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Ancestors from the parent up to the document node.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Preceding siblings, nearest first.
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> PrecedingSiblingIterator<'_> {
        PrecedingSiblingIterator {
            tree: self,
            current: self.prev_sibling(id),
        }
    }

    /// `id` and everything below it, in pre-order (document order).
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: if self.get(id).is_some() { vec![id] } else { Vec::new() },
        }
    }

    /// Number of ancestors. The document node has depth 0.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Height of the subtree below `id`, counting elements only.
    ///
    /// A lone element has height 1; text and comment children do not add a
    /// level.
    #[must_use]
    pub fn element_height(&self, id: NodeId) -> usize {
        let own = usize::from(self.as_element(id).is_some());
        let below = self
            .children(id)
            .iter()
            .map(|&c| self.element_height(c))
            .max()
            .unwrap_or(0);
        own + below
    }

    /// The top-level elements (children of the document node).
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        self.children(NodeId::ROOT)
    }

    /// The first top-level node of the given type.
    #[must_use]
    pub fn first_root(&self, element_type: ElementType) -> Option<NodeId> {
        self.roots()
            .iter()
            .copied()
            .find(|&id| self.element_type(id) == Some(element_type))
    }

    /// The first node of `element_type` at or below `from`, in document order.
    #[must_use]
    pub fn find_first(&self, from: NodeId, element_type: ElementType) -> Option<NodeId> {
        self.descendants(from)
            .find(|&id| self.element_type(id) == Some(element_type))
    }

    /// The first element whose `id` attribute equals `id`.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(NodeId::ROOT).find(|&n| {
            self.as_element(n)
                .is_some_and(|e| e.id.as_deref() == Some(id))
        })
    }

    /// Concatenated text of every text node below `id`. Breaks contribute a
    /// newline.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for n in self.descendants(id) {
            match self.get(n).map(|node| &node.kind) {
                Some(NodeKind::Text(t)) => out.push_str(t),
                Some(NodeKind::Element(e)) if e.element_type == ElementType::Break => {
                    out.push('\n');
                }
                _ => {}
            }
        }
        out
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over preceding siblings of a node.
pub struct PrecedingSiblingIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for PrecedingSiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.prev_sibling(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
