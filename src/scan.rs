//! Projection scanner (§4.5): streams aligned rows of values for a set of
//! leaf fields without assembling full records, implementing Dremel's
//! "fetch level" protocol.

use crate::column::{FieldReader, FieldStorage};
use crate::error::{DremelError, Result};
use crate::record::Value;

/// One row yielded by [`scan`]: the current value of every projected column
/// (columns not advanced this round retain their previous slot) and the
/// fetch level at which the row was produced.
pub type Row = (Vec<Option<Value>>, usize);

/// Streams aligned rows for `fields` out of `storage`.
///
/// Fails with [`UnknownField`](DremelError::UnknownField) if any path is not
/// a leaf of `storage`'s schema, or with
/// [`IndependentlyRepeated`](DremelError::IndependentlyRepeated) if two of
/// the projected leaves are independently repeated (§4.2) — a flat tuple
/// projection cannot represent their cartesian product unambiguously.
pub fn scan<'a, S>(storage: &'a S, fields: &[&str]) -> Result<ProjectionScan<'a, S::Reader>>
where
    S: FieldStorage<'a>,
{
    let mut readers = Vec::with_capacity(fields.len());
    let mut nodes = Vec::with_capacity(fields.len());
    for path in fields {
        let reader = storage.create_field_reader(path)?;
        nodes.push(reader.field_node());
        readers.push(reader);
    }
    storage.field_graph().check_independently_repeated(&nodes)?;

    Ok(ProjectionScan {
        readers,
        values: vec![None; fields.len()],
        fetch_level: 0,
        started: false,
    })
}

/// Iterator returned by [`scan`]. See §4.5 for the fetch-level algorithm.
pub struct ProjectionScan<'a, R> {
    readers: Vec<R>,
    values: Vec<Option<Value>>,
    fetch_level: usize,
    started: bool,
}

impl<'a, R: FieldReader<'a>> ProjectionScan<'a, R> {
    /// Advances every reader whose `next_repetition_level() >= fetch_level`,
    /// returning `(next_level, all_done)`.
    fn advance(&mut self) -> Result<(usize, bool)> {
        let mut next_level = 0;
        for reader in &mut self.readers {
            if reader.next_repetition_level() >= self.fetch_level {
                reader.next()?;
                next_level = next_level.max(reader.next_repetition_level());
            }
        }
        let all_done = self.readers.iter().all(|r| r.done());
        Ok((next_level, all_done))
    }

    /// Pulls the next row, or `None` once every reader is exhausted — the
    /// steady-state idempotence property of §8.7: once all readers are
    /// done, repeated calls keep returning `None` without re-advancing
    /// anything.
    pub fn fetch(&mut self) -> Result<Option<Row>> {
        if self.started && self.readers.iter().all(|r| r.done()) {
            return Ok(None);
        }
        self.started = true;

        let (next_level, all_done) = self.advance()?;
        if all_done {
            return Ok(None);
        }

        for (reader, slot) in self.readers.iter().zip(self.values.iter_mut()) {
            if reader.repetition_level()? >= self.fetch_level {
                *slot = reader.value()?;
            }
        }

        let row = (self.values.clone(), self.fetch_level);
        self.fetch_level = next_level;
        Ok(Some(row))
    }
}

impl<'a, R: FieldReader<'a>> Iterator for ProjectionScan<'a, R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.fetch() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
