//! The record shredder (dissector): walks a record against a (possibly
//! projection-pruned) writer tree and emits `(node, r, d, value)` triples.

mod writer;

pub use writer::{build_writer, shred, Sink, WriterNode};
