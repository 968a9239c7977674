use crate::error::Result;
use crate::record::Value;
use crate::schema::{FieldDescriptor, FieldGraph, FieldNode};

/// A cursor over one leaf column. State machine (§4.4):
/// `Init -> (next()) -> AtTriple_0 -> ... -> AtLast -> (next()) -> Done`.
///
/// Reading any of [`repetition_level`](Self::repetition_level),
/// [`definition_level`](Self::definition_level) or [`value`](Self::value)
/// before the first call to [`next`](Self::next) is a
/// [`ReadBeforeFetch`](crate::error::DremelError::ReadBeforeFetch) error.
/// Once [`done`](Self::done) is true, those three accessors instead settle
/// on `(0, 0, NULL)` rather than erroring, and further calls to `next` are a
/// no-op — this is what lets the assembler and scanner drive a reader past
/// its last triple without a special case.
pub trait FieldReader<'a> {
    fn descriptor(&self) -> &FieldDescriptor;
    fn field_node(&self) -> FieldNode<'a>;

    /// Whether the cursor has advanced past the last triple.
    fn done(&self) -> bool;

    /// Advances the cursor by one triple. Idempotent once [`done`](Self::done).
    fn next(&mut self) -> Result<()>;

    fn repetition_level(&self) -> Result<usize>;
    fn definition_level(&self) -> Result<usize>;
    fn value(&self) -> Result<Option<Value>>;

    /// The repetition level of the triple that *would* be read by the next
    /// call to [`next`](Self::next), or `0` if none remains. Unlike the
    /// other three accessors this is legal to call even from `Init`, since
    /// the FSM and scanner both need to peek ahead before the first read.
    fn next_repetition_level(&self) -> usize;
}

/// Vends one [`FieldReader`] per leaf path and exposes the schema graph the
/// columns were shredded against (§4.4, §6).
pub trait FieldStorage<'a> {
    type Reader: FieldReader<'a>;

    /// Fails with [`UnknownField`](crate::error::DremelError::UnknownField)
    /// if `path` does not name a leaf of [`field_graph`](Self::field_graph).
    fn create_field_reader(&'a self, path: &str) -> Result<Self::Reader>;
    fn list_fields(&self) -> Vec<&str>;
    fn field_graph(&self) -> &FieldGraph;
}
