use std::collections::{HashMap, HashSet};

use crate::error::{DremelError, Result};
use crate::node::{Arena, NodeId};

use super::descriptor::{FieldDescriptor, ROOT};

#[derive(Debug, Clone)]
struct FieldNodeData {
    descriptor: FieldDescriptor,
    field_index: Option<usize>,
}

/// A rooted tree of [`FieldDescriptor`]s built from a flat descriptor list
/// and an edge list (non-leaf path -> ordered child paths). Immutable once
/// built; leaves carry a stable `field_index` equal to their position in a
/// left-to-right pre-order traversal of leaves.
#[derive(Debug, Clone)]
pub struct FieldGraph {
    arena: Arena<FieldNodeData>,
    root: NodeId,
    by_path: HashMap<String, NodeId>,
    leaves: Vec<NodeId>,
}

impl FieldGraph {
    /// Builds a field graph from a flat list of descriptors (including the
    /// `__root__` descriptor) and an edge list mapping every non-leaf path to
    /// its ordered children.
    ///
    /// Fails with a schema-build error on: a duplicate or cyclically
    /// revisited path, a missing descriptor for a referenced path, a leaf
    /// with outgoing edges, or a non-leaf (other than the root) with none.
    /// The root's declared kind is ignored — it is always required to have
    /// children, regardless of what `FieldDescriptor::kind` says about it.
    pub fn build(
        descriptors: Vec<FieldDescriptor>,
        edges: Vec<(String, Vec<String>)>,
    ) -> Result<Self> {
        let field_map: HashMap<String, FieldDescriptor> = descriptors
            .into_iter()
            .map(|d| (d.path().to_string(), d))
            .collect();
        let edge_map: HashMap<String, Vec<String>> = edges.into_iter().collect();

        let mut arena = Arena::new();
        let mut by_path = HashMap::new();
        let mut seen = HashSet::new();

        let root = create_node(ROOT, &field_map, &edge_map, &mut seen, &mut arena, &mut by_path, None)?;

        let leaves = arena.leaf_nodes(root);
        if leaves.is_empty() {
            return Err(schema_err!(
                "field graph has no leaf fields; the root must have at least one descendant scalar"
            ));
        }
        for (i, &leaf_id) in leaves.iter().enumerate() {
            arena.get_mut(leaf_id).field_index = Some(i);
        }

        Ok(FieldGraph {
            arena,
            root,
            by_path,
            leaves,
        })
    }

    pub fn root(&self) -> FieldNode<'_> {
        self.node(self.root)
    }

    fn node(&self, id: NodeId) -> FieldNode<'_> {
        FieldNode { graph: self, id }
    }

    /// Reconstructs a [`FieldNode`] handle from a [`NodeId`] captured earlier
    /// (e.g. by a column reader that cannot hold a borrowed `FieldNode`
    /// across an owned `Arc<FieldGraph>` boundary).
    pub(crate) fn node_by_id(&self, id: NodeId) -> FieldNode<'_> {
        self.node(id)
    }

    pub fn get_field(&self, path: &str) -> Option<FieldNode<'_>> {
        self.by_path.get(path).map(|&id| self.node(id))
    }

    /// All nodes (groups and leaves) in pre-order.
    pub fn list_fields(&self) -> Vec<FieldNode<'_>> {
        let mut ids = Vec::new();
        self.arena.visit_preorder(self.root, &mut |id| ids.push(id));
        ids.into_iter().map(|id| self.node(id)).collect()
    }

    /// Leaves in pre-order, i.e. indexed by `field_index`.
    pub fn leaf_nodes(&self) -> Vec<FieldNode<'_>> {
        self.leaves.iter().map(|&id| self.node(id)).collect()
    }

    fn lowest_common_ancestor_id(&self, a: NodeId, b: NodeId) -> NodeId {
        let mut path_a = self.arena.path_to_root(a);
        path_a.reverse();
        let mut path_b = self.arena.path_to_root(b);
        path_b.reverse();
        // Both paths start at `self.root` by construction.
        let mut common = path_a[0];
        for i in 1..path_a.len().min(path_b.len()) {
            if path_a[i] != path_b[i] {
                break;
            }
            common = path_a[i];
        }
        common
    }

    /// See [`FieldNode::lowest_common_ancestor_with`] for the public,
    /// cross-graph-checked entry point.
    pub fn lowest_common_ancestor(&self, a: FieldNode<'_>, b: FieldNode<'_>) -> Result<FieldNode<'_>> {
        if !std::ptr::eq(a.graph, self) || !std::ptr::eq(b.graph, self) {
            return Err(DremelError::SchemaMismatch(
                "nodes come from different field graphs".to_string(),
            ));
        }
        Ok(self.node(self.lowest_common_ancestor_id(a.id, b.id)))
    }

    /// Rejects a projection where two leaves are independently repeated:
    /// they share a repetition level but climb to different ancestors at
    /// that level, which would make a flat tuple projection ambiguous (the
    /// cartesian-product problem from the Dremel paper).
    pub fn check_independently_repeated(&self, leaves: &[FieldNode<'_>]) -> Result<()> {
        let mut level_to_anchor: HashMap<usize, (NodeId, String, String)> = HashMap::new();

        for leaf in leaves {
            let level = leaf.max_repetition_level();
            let mut anchor = *leaf;
            while let Some(parent) = anchor.parent() {
                if parent.max_repetition_level() == level {
                    anchor = parent;
                } else {
                    break;
                }
            }

            if let Some((existing_id, existing_path, existing_anchor_path)) = level_to_anchor.get(&level) {
                if *existing_id != anchor.id {
                    return Err(DremelError::IndependentlyRepeated(format!(
                        "{} (from {}) and {} (from {})",
                        leaf.path(),
                        anchor.path(),
                        existing_path,
                        existing_anchor_path,
                    )));
                }
            } else {
                level_to_anchor.insert(level, (anchor.id, leaf.path().to_string(), anchor.path().to_string()));
            }
        }
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn create_node(
    path: &str,
    field_map: &HashMap<String, FieldDescriptor>,
    edge_map: &HashMap<String, Vec<String>>,
    seen: &mut HashSet<String>,
    arena: &mut Arena<FieldNodeData>,
    by_path: &mut HashMap<String, NodeId>,
    parent: Option<NodeId>,
) -> Result<NodeId> {
    if !seen.insert(path.to_string()) {
        return Err(schema_err!(
            "duplicate or recursively-revisited node in field graph: {}",
            path
        ));
    }

    let descriptor = field_map
        .get(path)
        .cloned()
        .ok_or_else(|| schema_err!("missing field descriptor: {}", path))?;

    let link = edge_map.get(path);

    if path == ROOT {
        if link.is_none() {
            return Err(schema_err!("root field graph node must have at least one child"));
        }
    } else if descriptor.is_leaf() {
        if link.is_some() {
            return Err(schema_err!("leaf field has outgoing edges: {}", path));
        }
    } else if link.is_none() {
        return Err(schema_err!("non-leaf field has no outgoing edges: {}", path));
    }

    let id = arena.alloc(
        FieldNodeData {
            descriptor,
            field_index: None,
        },
        parent,
    );
    by_path.insert(path.to_string(), id);

    if let Some(children) = link {
        for child_path in children {
            create_node(child_path, field_map, edge_map, seen, arena, by_path, Some(id))?;
        }
    }

    Ok(id)
}

/// A handle to one node of a [`FieldGraph`]: cheap to copy, borrows the graph
/// it came from.
#[derive(Clone, Copy)]
pub struct FieldNode<'a> {
    graph: &'a FieldGraph,
    id: NodeId,
}

impl<'a> std::fmt::Debug for FieldNode<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FieldNode({}, leaf={}, R={}, D={})",
            self.path(),
            self.is_leaf(),
            self.max_repetition_level(),
            self.definition_level()
        )
    }
}

impl<'a> PartialEq for FieldNode<'a> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.id == other.id
    }
}
impl<'a> Eq for FieldNode<'a> {}

impl<'a> std::hash::Hash for FieldNode<'a> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (self.graph as *const FieldGraph as usize).hash(state);
        self.id.hash(state);
    }
}

impl<'a> FieldNode<'a> {
    pub(crate) fn id(&self) -> NodeId {
        self.id
    }

    pub fn descriptor(&self) -> &'a FieldDescriptor {
        &self.graph.arena.get(self.id).descriptor
    }

    pub fn path(&self) -> &'a str {
        self.descriptor().path()
    }

    pub fn name(&self) -> &'a str {
        self.descriptor().name()
    }

    pub fn label(&self) -> super::descriptor::Label {
        self.descriptor().label()
    }

    pub fn max_repetition_level(&self) -> usize {
        self.descriptor().max_repetition_level()
    }

    pub fn definition_level(&self) -> usize {
        self.descriptor().definition_level()
    }

    /// Whether this is a scalar leaf, based on the graph's actual structure
    /// (no children) rather than the declared kind — so the root is always
    /// non-leaf, whatever kind its descriptor claims.
    pub fn is_leaf(&self) -> bool {
        self.graph.arena.is_leaf(self.id)
    }

    pub fn is_root(&self) -> bool {
        self.graph.arena.is_root(self.id)
    }

    /// Stable index into the leaf/column space; `None` for non-leaf nodes.
    pub fn field_index(&self) -> Option<usize> {
        self.graph.arena.get(self.id).field_index
    }

    pub fn parent(&self) -> Option<FieldNode<'a>> {
        self.graph.arena.parent(self.id).map(|id| FieldNode { graph: self.graph, id })
    }

    pub fn children(&self) -> Vec<FieldNode<'a>> {
        self.graph
            .arena
            .children(self.id)
            .iter()
            .map(|&id| FieldNode { graph: self.graph, id })
            .collect()
    }

    /// The deepest node that is an ancestor of both `self` and `other`.
    /// Fails with `SCHEMA_MISMATCH` if the nodes come from different graphs.
    pub fn lowest_common_ancestor_with(&self, other: &FieldNode<'a>) -> Result<FieldNode<'a>> {
        self.graph.lowest_common_ancestor(*self, *other)
    }

    /// `R_max(lowest_common_ancestor(self, other))`.
    pub fn common_repetition_level_with(&self, other: &FieldNode<'a>) -> Result<usize> {
        Ok(self.lowest_common_ancestor_with(other)?.max_repetition_level())
    }

    /// `self` followed by each ancestor up to but not including `target`,
    /// i.e. bottom-up order. Returns `None` if `target` is not an ancestor
    /// of `self`.
    pub fn path_to(&self, target: &FieldNode<'a>) -> Option<Vec<FieldNode<'a>>> {
        self.graph
            .arena
            .path_to(self.id, Some(target.id))
            .map(|ids| ids.into_iter().map(|id| FieldNode { graph: self.graph, id }).collect())
    }

    /// `self` followed by every ancestor up to and including the root.
    pub fn path_to_root(&self) -> Vec<FieldNode<'a>> {
        self.graph
            .arena
            .path_to_root(self.id)
            .into_iter()
            .map(|id| FieldNode { graph: self.graph, id })
            .collect()
    }
}
