//! Lightweight structural shadow of the element tree.
//!
//! The tree uses arena allocation with [`MetaId`] indices for all
//! relationships, so a metadata node can name its parent without owning it and
//! elements can point at their metadata node without borrowing the arena.

use serde::Serialize;

use crate::node::ElementType;

/// A type-safe index into a [`MetaTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MetaId(pub usize);

impl MetaId {
    /// The virtual root is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// Structural facts about one element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaNode {
    /// Resolved type of the element. `None` only for the virtual root.
    pub kind: Option<ElementType>,
    /// Position of the element in its parent's children list.
    pub index: usize,
    /// Parent metadata node. `None` only for the virtual root.
    pub parent: Option<MetaId>,
    /// One slot per entry of the element's real children list. Plain-text
    /// entries have no metadata node and hold `None`.
    pub children: Vec<Option<MetaId>>,
}

impl MetaNode {
    const fn root() -> Self {
        Self {
            kind: None,
            index: 0,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Arena of metadata nodes rooted at [`MetaId::ROOT`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaTree {
    nodes: Vec<MetaNode>,
}

impl MetaTree {
    /// Create a tree holding only the virtual root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![MetaNode::root()],
        }
    }

    /// The virtual root.
    #[must_use]
    pub const fn root(&self) -> MetaId {
        MetaId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: MetaId) -> Option<&MetaNode> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, including the virtual root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds nothing but the virtual root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Allocate a node for an element appended to `parent` and record it in
    /// the next child slot. Returns `None` if `parent` does not exist.
    pub fn append_element(&mut self, parent: MetaId, kind: ElementType) -> Option<MetaId> {
        let id = MetaId(self.nodes.len());
        let slots = &mut self.nodes.get_mut(parent.0)?.children;
        let index = slots.len();
        slots.push(Some(id));
        self.nodes.push(MetaNode {
            kind: Some(kind),
            index,
            parent: Some(parent),
            children: Vec::new(),
        });
        Some(id)
    }

    /// Reserve a child slot for a plain-text entry so slots stay aligned with
    /// the real children list.
    pub fn append_text_slot(&mut self, parent: MetaId) {
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(None);
        }
    }

    /// Remove `id` and everything allocated after it, and cut the parent's
    /// slots back to the position `id` occupied.
    ///
    /// Nodes are allocated in document order, so when `id` is the most
    /// recently opened element every later node is one of its descendants.
    pub fn discard_subtree(&mut self, id: MetaId) {
        if id == MetaId::ROOT || id.0 >= self.nodes.len() {
            return;
        }
        let (parent, index) = (self.nodes[id.0].parent, self.nodes[id.0].index);
        self.nodes.truncate(id.0);
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p.0)) {
            parent.children.truncate(index);
        }
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: MetaId) -> Option<MetaId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Child slots of a node, aligned with the element's children list.
    #[must_use]
    pub fn children(&self, id: MetaId) -> &[Option<MetaId>] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Number of child slots (element and text entries alike).
    #[must_use]
    pub fn slot_count(&self, id: MetaId) -> usize {
        self.children(id).len()
    }

    /// Iterate over the metadata children that are elements.
    pub fn element_children(&self, id: MetaId) -> impl Iterator<Item = MetaId> + '_ {
        self.children(id).iter().filter_map(|slot| *slot)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: MetaId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }
}

impl Default for MetaTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a metadata node.
pub struct AncestorIterator<'a> {
    tree: &'a MetaTree,
    current: Option<MetaId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = MetaId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
