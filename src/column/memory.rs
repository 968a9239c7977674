use std::collections::HashMap;

use crate::error::{DremelError, Result};
use crate::record::{RecordView, Value};
use crate::schema::{FieldDescriptor, FieldGraph, FieldNode};
use crate::shred::{build_writer, shred};

use super::reader::{FieldReader, FieldStorage};

/// One materialized `(r, d, value)` triple of a leaf column.
pub type Triple = (usize, usize, Option<Value>);

/// An in-memory, per-leaf list of triples: the reference storage the spec
/// says "is sufficient for correctness tests" (§6). Built by shredding a
/// whole stream of records against a (possibly projection-pruned) writer and
/// appending each leaf's emitted triples to its column in record order.
#[derive(Debug, Clone)]
pub struct MemoryFieldStorage {
    graph: FieldGraph,
    columns: HashMap<String, Vec<Triple>>,
}

impl MemoryFieldStorage {
    /// Shreds every record in `records` against the full schema (or, if
    /// `projection` is given, against the writer pruned to those leaf
    /// paths) and collects the resulting triples into per-leaf columns.
    pub fn build<R: RecordView>(
        graph: FieldGraph,
        records: &[R],
        projection: Option<&[&str]>,
    ) -> Result<Self> {
        let leaves: Option<Vec<FieldNode>> = match projection {
            Some(paths) => {
                let mut nodes = Vec::with_capacity(paths.len());
                for p in paths {
                    let canon = crate::schema::canonical_path(p);
                    let node = graph
                        .get_field(&canon)
                        .filter(|n| n.is_leaf())
                        .ok_or_else(|| DremelError::UnknownField(canon.clone()))?;
                    nodes.push(node);
                }
                Some(nodes)
            }
            None => None,
        };
        let writer = build_writer(&graph, leaves.as_deref())?;

        let mut columns: HashMap<String, Vec<Triple>> = writer
            .leaf_nodes()
            .iter()
            .map(|n| (n.path().to_string(), Vec::new()))
            .collect();

        for record in records {
            shred(&writer, record, &mut |node: FieldNode, r, d, v| {
                columns.get_mut(node.path()).unwrap().push((r, d, v));
            })?;
        }

        Ok(Self { graph, columns })
    }
}

impl<'a> FieldStorage<'a> for MemoryFieldStorage {
    type Reader = MemoryFieldReader<'a>;

    fn create_field_reader(&'a self, path: &str) -> Result<Self::Reader> {
        let canon = crate::schema::canonical_path(path);
        let node = self
            .graph
            .get_field(&canon)
            .filter(|n| n.is_leaf())
            .ok_or_else(|| DremelError::UnknownField(canon.clone()))?;
        let triples = self
            .columns
            .get(&canon)
            .ok_or_else(|| DremelError::UnknownField(canon.clone()))?;
        Ok(MemoryFieldReader {
            node,
            triples,
            cursor: None,
        })
    }

    fn list_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.columns.keys().map(|s| s.as_str()).collect();
        fields.sort_unstable();
        fields
    }

    fn field_graph(&self) -> &FieldGraph {
        &self.graph
    }
}

/// A cursor over one [`MemoryFieldStorage`] column. `cursor == None` is the
/// `Init` state; `cursor == Some(triples.len())` is `Done`.
#[derive(Debug)]
pub struct MemoryFieldReader<'a> {
    node: FieldNode<'a>,
    triples: &'a [Triple],
    cursor: Option<usize>,
}

impl<'a> MemoryFieldReader<'a> {
    fn current(&self) -> Result<&Triple> {
        let i = self.cursor.ok_or_else(|| {
            DremelError::ReadBeforeFetch(format!(
                "{}: next() must be called before reading a triple",
                self.node.path()
            ))
        })?;
        Ok(self
            .triples
            .get(i)
            .expect("current() is only reached when the cursor is not done"))
    }
}

impl<'a> FieldReader<'a> for MemoryFieldReader<'a> {
    fn descriptor(&self) -> &FieldDescriptor {
        self.node.descriptor()
    }

    fn field_node(&self) -> FieldNode<'a> {
        self.node
    }

    fn done(&self) -> bool {
        matches!(self.cursor, Some(i) if i >= self.triples.len())
    }

    fn next(&mut self) -> Result<()> {
        let next = match self.cursor {
            None => 0,
            Some(i) => (i + 1).min(self.triples.len()),
        };
        self.cursor = Some(next);
        Ok(())
    }

    fn repetition_level(&self) -> Result<usize> {
        if self.done() {
            return Ok(0);
        }
        Ok(self.current()?.0)
    }

    fn definition_level(&self) -> Result<usize> {
        if self.done() {
            return Ok(0);
        }
        Ok(self.current()?.1)
    }

    fn value(&self) -> Result<Option<Value>> {
        if self.done() {
            return Ok(None);
        }
        Ok(self.current()?.2.clone())
    }

    fn next_repetition_level(&self) -> usize {
        let next_index = match self.cursor {
            None => 0,
            Some(i) => i + 1,
        };
        self.triples
            .get(next_index)
            .map(|(r, _, _)| *r)
            .unwrap_or(0)
    }
}
