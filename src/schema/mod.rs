//! Schema/field graph: the rooted tree of [`FieldDescriptor`]s with per-node
//! repetition/definition levels that every other component is built around.

mod descriptor;
mod graph;

pub use descriptor::{canonical_path, FieldDescriptor, FieldKind, Label, PhysicalType, ROOT};
pub use graph::{FieldGraph, FieldNode};
