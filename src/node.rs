//! Generic arena-indexed tree used as the storage layer under the schema graph.
//!
//! An owned recursive enum with `Vec<Child>` children and no parent
//! back-pointers is fine for a one-shot top-down walk, but this graph needs
//! repeated parent/LCA queries at read time. We flatten to an arena of
//! indices instead, each node storing its own parent, so traversal stays
//! O(depth) without re-walking from the root and the whole graph remains one
//! owned, `Clone`-able value with no lifetime parameter.

/// An index into an [`Arena`]. Only meaningful relative to the arena that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
struct Entry<T> {
    data: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A rooted tree of `T` payloads addressed by [`NodeId`].
///
/// Supports the traversal primitives every schema-graph operation is built
/// from: parent/children lookup, pre-order visiting, leaf enumeration, and
/// path-to-ancestor walks.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    nodes: Vec<Entry<T>>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new node with the given parent (`None` for the root) and
    /// returns its id. If `parent` is set, the new node is appended to its
    /// children in insertion order.
    pub fn alloc(&mut self, data: T, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Entry {
            data,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        id
    }

    pub fn get(&self, id: NodeId) -> &T {
        &self.nodes[id.0].data
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.nodes[id.0].data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.children(id).is_empty()
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.parent(id).is_none()
    }

    /// Detaches `child` from its parent's child list. The node itself stays
    /// in the arena (unreachable from the root afterwards) so existing
    /// `NodeId`s elsewhere remain valid.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.retain(|&c| c != child);
        self.nodes[child.0].parent = None;
    }

    /// Visits `id` and all of its descendants in pre-order (self, then each
    /// child's subtree left to right).
    pub fn visit_preorder(&self, id: NodeId, visitor: &mut impl FnMut(NodeId)) {
        visitor(id);
        for &child in self.children(id) {
            self.visit_preorder(child, visitor);
        }
    }

    /// Returns the leaves (no-children nodes) reachable from `id`, in
    /// left-to-right pre-order.
    pub fn leaf_nodes(&self, id: NodeId) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        self.visit_preorder(id, &mut |n| {
            if self.is_leaf(n) {
                leaves.push(n);
            }
        });
        leaves
    }

    /// Returns `id` followed by each ancestor up to and including the root.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            nodes.push(c);
            current = self.parent(c);
        }
        nodes
    }

    /// Returns the path from `id` up to but not including `target`
    /// (`id` first, ancestors following). `target == None` means "walk to
    /// the root", in which case the root itself is included.
    ///
    /// Returns `None` if `target` is not an ancestor of `id`.
    pub fn path_to(&self, id: NodeId, target: Option<NodeId>) -> Option<Vec<NodeId>> {
        let mut nodes = Vec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            if Some(c) == target {
                return Some(nodes);
            }
            nodes.push(c);
            current = self.parent(c);
        }
        if target.is_none() {
            Some(nodes)
        } else {
            None
        }
    }
}
