//! Record assembler (§4.6, §4.7): the FSM constructor and the driver loop
//! that walks it over a storage's readers, calling a [`Builder`] to
//! reconstruct records. Grounded on
//! `original_source/dremel/assembly.py::construct_fsm`/`_assemble`.

mod builder;
mod fsm;

pub use builder::{AssemblyBuilder, FieldValue, MessageAssemblyBuilder};
pub use fsm::Fsm;

use crate::column::{FieldReader, FieldStorage};
use crate::error::Result;
use crate::record::{RecordFactory, RecordNav};
use crate::schema::FieldNode;

/// Resolves `projection` (or the full schema if `None`) to leaves in
/// pre-order, builds the FSM, and acquires one reader per leaf — everything
/// [`assemble`] needs before it can start driving records.
///
/// Unlike [`scan`](crate::scan::scan), this does NOT reject independently
/// repeated leaves (§4.2): that check guards the flat tuple-per-row
/// representation a projection scan produces, where two independently
/// varying repetition counts can't be expressed unambiguously in one row.
/// Full (or partial) record assembly rebuilds a tree instead, where every
/// repeated field keeps its own list regardless of what else is projected
/// alongside it — so the Document schema's `links.backward` and
/// `links.forward`, themselves independently repeated siblings, reassemble
/// without any ambiguity.
fn prepare<'a, S>(
    storage: &'a S,
    projection: Option<&[&str]>,
) -> Result<(Fsm<'a>, Vec<S::Reader>)>
where
    S: FieldStorage<'a>,
{
    let leaves: Vec<FieldNode<'a>> = match projection {
        Some(paths) => {
            let mut nodes = Vec::with_capacity(paths.len());
            for p in paths {
                let canon = crate::schema::canonical_path(p);
                let node = storage
                    .field_graph()
                    .get_field(&canon)
                    .filter(|n| n.is_leaf())
                    .ok_or_else(|| crate::error::DremelError::UnknownField(canon.clone()))?;
                nodes.push(node);
            }
            nodes.sort_by_key(|n| n.field_index());
            nodes
        }
        None => storage.field_graph().leaf_nodes(),
    };

    let readers = leaves
        .iter()
        .map(|l| storage.create_field_reader(l.path()))
        .collect::<Result<Vec<_>>>()?;

    let fsm = Fsm::build(&leaves)?;
    Ok((fsm, readers))
}

/// Drives `builder` over `storage`'s readers (restricted to `projection` if
/// given) until the stream is exhausted, per §4.7's per-record loop.
pub fn assemble<'a, S, B>(storage: &'a S, projection: Option<&[&str]>, builder: &mut B) -> Result<()>
where
    S: FieldStorage<'a>,
    B: AssemblyBuilder<'a>,
{
    let (fsm, mut readers) = prepare(storage, projection)?;
    if readers.is_empty() {
        return Ok(());
    }

    loop {
        builder.start();
        let mut cursor = Some(0usize);
        let mut rolled_back = false;

        while let Some(idx) = cursor {
            readers[idx].next()?;
            if readers[idx].done() {
                builder.rollback();
                rolled_back = true;
                break;
            }

            let field = FieldValue {
                field_node: readers[idx].field_node(),
                r: readers[idx].repetition_level()?,
                d: readers[idx].definition_level()?,
                value: readers[idx].value()?,
                next_r: readers[idx].next_repetition_level(),
            };
            let next_r = field.next_r;
            builder.assign_value(&field)?;
            cursor = fsm.transition(readers[idx].field_node(), next_r);
        }

        if rolled_back {
            break;
        }
        builder.done();
    }

    Ok(())
}

/// Convenience wrapper over [`assemble`] that drives a fresh
/// [`MessageAssemblyBuilder`] and returns every reconstructed record.
pub fn assemble_records<'a, S, F>(
    storage: &'a S,
    projection: Option<&[&str]>,
    factory: &'a F,
) -> Result<Vec<F::Record>>
where
    S: FieldStorage<'a>,
    F: RecordFactory,
    F::Record: RecordNav,
{
    let mut builder = MessageAssemblyBuilder::new(factory);
    assemble(storage, projection, &mut builder)?;
    Ok(builder.into_records())
}
