use std::collections::HashSet;

use crate::error::{DremelError, Result};
use crate::node::NodeId;
use crate::record::{RecordView, Value};
use crate::schema::{FieldGraph, FieldNode, Label};

/// A pruned mirror of the schema graph used to drive one shredding pass.
/// A tagged enum dispatching on variant rather than a `FieldWriter`/
/// `MessageWriter` inheritance pair.
#[derive(Debug, Clone)]
pub enum WriterNode<'a> {
    Leaf(FieldNode<'a>),
    Inner(FieldNode<'a>, Vec<WriterNode<'a>>),
}

impl<'a> WriterNode<'a> {
    pub fn field_node(&self) -> FieldNode<'a> {
        match self {
            WriterNode::Leaf(n) => *n,
            WriterNode::Inner(n, _) => *n,
        }
    }

    /// The leaves surviving in this (possibly pruned) writer tree, in
    /// pre-order — these are exactly the columns this writer will produce
    /// triples for.
    pub fn leaf_nodes(&self) -> Vec<FieldNode<'a>> {
        let mut out = Vec::new();
        fn walk<'a>(w: &WriterNode<'a>, out: &mut Vec<FieldNode<'a>>) {
            match w {
                WriterNode::Leaf(n) => out.push(*n),
                WriterNode::Inner(_, children) => {
                    for c in children {
                        walk(c, out);
                    }
                }
            }
        }
        walk(self, &mut out);
        out
    }
}

/// Builds a writer tree pruned to `leaves` (or the full schema if `None`):
/// the subtree containing only ancestors of the requested leaves, with any
/// interior node left with no children removed. `R_max`/`D_max` of
/// surviving leaves are unchanged — they are intrinsic to the schema, not
/// the projection.
pub fn build_writer<'a>(graph: &'a FieldGraph, leaves: Option<&[FieldNode<'a>]>) -> Result<WriterNode<'a>> {
    let allowed: Option<HashSet<NodeId>> = leaves.map(|ls| {
        let mut set = HashSet::new();
        for l in ls {
            for ancestor in l.path_to_root() {
                set.insert(ancestor.id());
            }
        }
        set
    });

    fn recurse<'a>(node: FieldNode<'a>, allowed: &Option<HashSet<NodeId>>) -> Option<WriterNode<'a>> {
        if let Some(set) = allowed {
            if !set.contains(&node.id()) {
                return None;
            }
        }
        if node.is_leaf() {
            Some(WriterNode::Leaf(node))
        } else {
            let children: Vec<_> = node
                .children()
                .into_iter()
                .filter_map(|c| recurse(c, allowed))
                .collect();
            if children.is_empty() {
                None
            } else {
                Some(WriterNode::Inner(node, children))
            }
        }
    }

    recurse(graph.root(), &allowed)
        .ok_or_else(|| schema_err!("no valid leaf fields in projection"))
}

/// Receives one `(node, r, d, value)` event per leaf occurrence (or
/// non-occurrence) emitted while shredding a record. Kept as a single-method
/// interface per this crate's design notes, so callers can route triples
/// anywhere without the shredder depending on a concrete column type.
pub trait Sink<'a> {
    fn emit(&mut self, node: FieldNode<'a>, r: usize, d: usize, value: Option<Value>);
}

impl<'a, F> Sink<'a> for F
where
    F: FnMut(FieldNode<'a>, usize, usize, Option<Value>),
{
    fn emit(&mut self, node: FieldNode<'a>, r: usize, d: usize, value: Option<Value>) {
        self(node, r, d, value)
    }
}

/// Shreds one record through `writer`, emitting `(node, r, d, value)` events
/// to `sink`. `writer` must be the root writer node (see [`build_writer`]).
pub fn shred<'a, R, S>(writer: &WriterNode<'a>, record: &R, sink: &mut S) -> Result<()>
where
    R: RecordView,
    S: Sink<'a>,
{
    match writer {
        WriterNode::Inner(node, children) if node.is_root() => {
            for child in children {
                accept(child, 0, 0, Some(record), sink)?;
            }
            Ok(())
        }
        _ => Err(DremelError::Internal(
            "shred must be called with the root writer node".to_string(),
        )),
    }
}

fn accept<'a, R, S>(
    writer: &WriterNode<'a>,
    r: usize,
    d: usize,
    parent: Option<&R>,
    sink: &mut S,
) -> Result<()>
where
    R: RecordView,
    S: Sink<'a>,
{
    let node = writer.field_node();
    match node.label() {
        Label::Required => match writer {
            WriterNode::Leaf(_) => {
                let value = parent
                    .and_then(|p| p.scalar(node.name()))
                    .cloned()
                    .ok_or_else(|| missing_required(node))?;
                sink.emit(node, r, d, Some(value));
                Ok(())
            }
            WriterNode::Inner(_, children) => {
                let child_view = parent
                    .and_then(|p| p.message(node.name()))
                    .ok_or_else(|| missing_required(node))?;
                for c in children {
                    accept(c, r, d, Some(child_view), sink)?;
                }
                Ok(())
            }
        },
        Label::Optional => match writer {
            WriterNode::Leaf(_) => {
                match parent.and_then(|p| p.scalar(node.name())) {
                    Some(value) => sink.emit(node, r, d + 1, Some(value.clone())),
                    None => emit_null_subtree(writer, r, d, sink),
                }
                Ok(())
            }
            WriterNode::Inner(_, children) => {
                match parent.and_then(|p| p.message(node.name())) {
                    Some(child_view) => {
                        for c in children {
                            accept(c, r, d + 1, Some(child_view), sink)?;
                        }
                    }
                    None => emit_null_subtree(writer, r, d, sink),
                }
                Ok(())
            }
        },
        Label::Repeated => match writer {
            WriterNode::Leaf(_) => {
                let values = parent.map(|p| p.scalar_repeated(node.name())).unwrap_or(&[]);
                if values.is_empty() {
                    sink.emit(node, r, d, None);
                } else {
                    let mut local_r = r;
                    for v in values {
                        sink.emit(node, local_r, d + 1, Some(v.clone()));
                        local_r = node.max_repetition_level();
                    }
                }
                Ok(())
            }
            WriterNode::Inner(_, children) => {
                let elems = parent
                    .map(|p| p.message_repeated(node.name()))
                    .unwrap_or(&[]);
                if elems.is_empty() {
                    emit_null_subtree(writer, r, d, sink);
                } else {
                    let mut local_r = r;
                    for elem in elems {
                        for c in children {
                            accept(c, local_r, d + 1, Some(elem), sink)?;
                        }
                        local_r = node.max_repetition_level();
                    }
                }
                Ok(())
            }
        },
    }
}

fn missing_required(node: FieldNode<'_>) -> DremelError {
    DremelError::InvalidRecord(format!("missing required field: {}", node.path()))
}

fn emit_null_subtree<'a, S: Sink<'a>>(writer: &WriterNode<'a>, r: usize, d: usize, sink: &mut S) {
    match writer {
        WriterNode::Leaf(node) => sink.emit(*node, r, d, None),
        WriterNode::Inner(_, children) => {
            for c in children {
                emit_null_subtree(c, r, d, sink);
            }
        }
    }
}
