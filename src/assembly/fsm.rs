//! Assembly FSM constructor (§4.6): a pure function of (schema graph,
//! projected leaves) that builds the transition table `δ : (leaf, r) → leaf
//! ∪ {END}` the assembler drives over. Grounded on
//! `original_source/dremel/assembly.py::construct_fsm`.

use std::collections::HashMap;

use crate::error::Result;
use crate::schema::FieldNode;

/// Dense transition table over `(local leaf index, r)`, per this crate's
/// design notes (§9: "use a dense 2D table ... for O(1) transitions; END
/// encoded as a sentinel"). `None` is that sentinel.
#[derive(Debug, Clone)]
pub struct Fsm<'a> {
    leaves: Vec<FieldNode<'a>>,
    table: Vec<Vec<Option<usize>>>,
    index_of: HashMap<usize, usize>,
}

impl<'a> Fsm<'a> {
    /// Builds the transition table for `leaves`, which must be in pre-order
    /// (i.e. sorted by `field_index`) — callers normally obtain this list
    /// from [`FieldGraph::leaf_nodes`](crate::schema::FieldGraph::leaf_nodes)
    /// or a projection subset of it in the same relative order.
    ///
    /// Implements §4.6 steps 1-5. The earliest-leaf-wins tie-break (step 3)
    /// and the unconditional final overwrite of `[0, barrier_level]` (step
    /// 5, which can clobber entries step 3 already set) both mirror the
    /// reference algorithm exactly — see this crate's design-decision log
    /// for why that order is load-bearing.
    pub fn build(leaves: &[FieldNode<'a>]) -> Result<Self> {
        let n = leaves.len();
        // local index (position in `leaves`) per leaf, used instead of the
        // global `field_index` so the table can be driven directly against
        // a same-ordered reader vector without an extra lookup.
        let index_of: HashMap<usize, usize> = leaves
            .iter()
            .enumerate()
            .map(|(i, l)| (l.field_index().expect("projected node must be a leaf"), i))
            .collect();

        let mut table: Vec<Vec<Option<usize>>> = leaves
            .iter()
            .map(|l| vec![None; l.max_repetition_level() + 1])
            .collect();

        for i in 0..n {
            let current = leaves[i];
            let max_level = current.max_repetition_level();
            let next = leaves.get(i + 1).copied();
            let barrier_level = match next {
                Some(next) => current.common_repetition_level_with(&next)?,
                None => 0,
            };

            // Step 3: earlier leaves (including `current` itself) with a
            // repeated ancestor above the barrier claim the back-level they
            // share with `current`, first writer wins.
            for (j, p) in leaves.iter().enumerate().take(i + 1) {
                if p.max_repetition_level() <= barrier_level {
                    continue;
                }
                let back_level = current.common_repetition_level_with(p)?;
                let slot = &mut table[i][back_level];
                if slot.is_none() {
                    *slot = Some(j);
                }
            }

            // Step 4: fill down so an over-fine repetition level rolls back
            // to the nearest coarser handler that was actually set.
            for level in (barrier_level + 1)..=max_level {
                if table[i][level].is_none() {
                    table[i][level] = table[i][level - 1];
                }
            }

            // Step 5: any repetition at or below the barrier advances to
            // the next projected leaf (or END), unconditionally.
            let next_local = next.map(|n| index_of[&n.field_index().expect("projected node must be a leaf")]);
            for level in 0..=barrier_level {
                table[i][level] = next_local;
            }
        }

        Ok(Self {
            leaves: leaves.to_vec(),
            table,
            index_of,
        })
    }

    pub fn leaves(&self) -> &[FieldNode<'a>] {
        &self.leaves
    }

    /// `δ(leaf, r)`: the next leaf to read, as a local index into
    /// [`leaves`](Self::leaves) (or `None` for END), given that the
    /// just-read triple's `next_repetition_level()` was `r`.
    pub fn transition(&self, leaf: FieldNode<'a>, r: usize) -> Option<usize> {
        let local = self.index_of[&leaf.field_index().expect("fsm only transitions leaves")];
        self.table[local][r]
    }
}
