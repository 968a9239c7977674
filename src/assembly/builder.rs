use crate::error::{DremelError, Result};
use crate::record::{Record, RecordFactory, RecordNav, Value};
use crate::schema::FieldNode;

/// One field occurrence handed to an [`AssemblyBuilder`] by the driver in
/// [`super::assemble`]: everything §4.7 needs to locate the slot this value
/// belongs in. `value` is `None` for a null placeholder (an absent
/// optional/repeated subtree at depth `d`, per the column-set encoding
/// invariant).
#[derive(Debug, Clone)]
pub struct FieldValue<'a> {
    pub field_node: FieldNode<'a>,
    pub r: usize,
    pub d: usize,
    pub value: Option<Value>,
    pub next_r: usize,
}

/// The builder interface §4.7 drives the assembler against. A concrete
/// record type plugs in by implementing this (or, more commonly, by being
/// wrapped in [`MessageAssemblyBuilder`], which implements it over anything
/// satisfying [`Record`] + [`RecordNav`]).
pub trait AssemblyBuilder<'a> {
    fn start(&mut self);
    fn rollback(&mut self);
    fn done(&mut self);
    fn assign_value(&mut self, field: &FieldValue<'a>) -> Result<()>;
}

/// Reconstructs nested records by maintaining a stack of
/// `(open_submessage, schema_node)` frames, the root record at the bottom
/// (§4.7). Generic over any [`RecordFactory`] whose `Record` also
/// implements [`RecordNav`], so it never needs to know the record's
/// concrete representation.
///
/// Every assignment re-derives its mutable handle to the currently open
/// submessage by walking down from the record root (see
/// [`RecordNav`](crate::record::RecordNav)'s doc comment) rather than
/// holding a long-lived `&mut` across calls, which keeps the stack a plain
/// `Vec` of schema nodes and navigation steps instead of raw pointers.
pub struct MessageAssemblyBuilder<'a, F: RecordFactory> {
    factory: &'a F,
    root: Option<F::Record>,
    /// `(schema_node, navigation step taken to reach it from its parent)`;
    /// the bottom frame (index 0) is always the record root and carries no
    /// navigation step.
    stack: Vec<(FieldNode<'a>, Option<NavStep>)>,
    last_node: Option<FieldNode<'a>>,
    finished: Vec<F::Record>,
}

#[derive(Debug, Clone)]
enum NavStep {
    Message(String),
    MessageRepeatedLast(String),
}

impl<'a, F: RecordFactory> MessageAssemblyBuilder<'a, F>
where
    F::Record: RecordNav,
{
    pub fn new(factory: &'a F) -> Self {
        Self {
            factory,
            root: None,
            stack: Vec::new(),
            last_node: None,
            finished: Vec::new(),
        }
    }

    /// Every record successfully finished (via [`done`](AssemblyBuilder::done))
    /// since construction, in assembly order.
    pub fn into_records(self) -> Vec<F::Record> {
        self.finished
    }

    fn navigate_to_current<'s>(&'s mut self) -> Result<&'s mut F::Record> {
        let mut current = self
            .root
            .as_mut()
            .ok_or_else(|| DremelError::BuilderProtocol("start() must be called before assign_value()".to_string()))?;
        for (_, step) in self.stack.iter().skip(1) {
            let step = step
                .as_ref()
                .ok_or_else(|| DremelError::Internal("non-root frame missing its navigation step".to_string()))?;
            current = match step {
                NavStep::Message(name) => current.message_mut(name).ok_or_else(|| {
                    DremelError::Internal(format!("message slot '{}' entered earlier is no longer present", name))
                })?,
                NavStep::MessageRepeatedLast(name) => current.message_repeated_last_mut(name).ok_or_else(|| {
                    DremelError::Internal(format!(
                        "repeated message slot '{}' appended earlier is no longer present",
                        name
                    ))
                })?,
            };
        }
        Ok(current)
    }
}

impl<'a, F: RecordFactory> AssemblyBuilder<'a> for MessageAssemblyBuilder<'a, F>
where
    F::Record: RecordNav,
{
    fn start(&mut self) {
        // The root schema node isn't known until the first `assign_value`
        // call (we have no standalone `FieldGraph` reference here), so the
        // bottom stack frame is pushed lazily there instead.
        self.root = Some(self.factory.create());
        self.last_node = None;
    }

    fn rollback(&mut self) {
        self.root = None;
        self.stack.clear();
        self.last_node = None;
    }

    fn done(&mut self) {
        if let Some(rec) = self.root.take() {
            self.finished.push(rec);
        }
        self.stack.clear();
        self.last_node = None;
    }

    fn assign_value(&mut self, field: &FieldValue<'a>) -> Result<()> {
        if self.root.is_none() {
            return Err(DremelError::BuilderProtocol(
                "assign_value() called before start()".to_string(),
            ));
        }

        let current = field.field_node;

        if self.stack.is_empty() {
            self.stack.push((current.path_to_root().last().copied().unwrap(), None));
        }

        let mut barrier = current
            .lowest_common_ancestor_with(&self.stack.last().unwrap().0)
            .map_err(|_| DremelError::InvalidColumnStream("leaf from a different schema graph".to_string()))?;

        if let Some(last) = self.last_node {
            if current.field_index().unwrap() < last.field_index().unwrap() {
                while !barrier.is_root() && barrier.max_repetition_level() >= field.r {
                    barrier = barrier
                        .parent()
                        .ok_or_else(|| DremelError::Internal("barrier walked past root".to_string()))?;
                }
            }
        }

        while self.stack.last().unwrap().0 != barrier {
            self.stack.pop();
            if self.stack.is_empty() {
                return Err(DremelError::Internal(
                    "assembly stack emptied before reaching the barrier node".to_string(),
                ));
            }
        }

        let mut path = current
            .path_to(&barrier)
            .ok_or_else(|| DremelError::Internal("barrier is not an ancestor of the current leaf".to_string()))?;
        path.reverse();

        while !path.is_empty() && path[0].definition_level() <= field.d {
            let node = path.remove(0);
            if node.is_leaf() {
                if node != current || !path.is_empty() {
                    return Err(DremelError::InvalidColumnStream(format!(
                        "unexpected leaf {} before {}",
                        node.path(),
                        current.path()
                    )));
                }
                if let Some(value) = field.value.clone() {
                    let top = self.navigate_to_current()?;
                    match node.label() {
                        crate::schema::Label::Repeated => top.append_scalar(node.name(), value),
                        _ => top.set_scalar(node.name(), value),
                    }
                }
            } else {
                match node.label() {
                    crate::schema::Label::Repeated => {
                        {
                            let top = self.navigate_to_current()?;
                            top.append_message(node.name());
                        }
                        self.stack.push((node, Some(NavStep::MessageRepeatedLast(node.name().to_string()))));
                    }
                    _ => {
                        {
                            let top = self.navigate_to_current()?;
                            top.enter_message(node.name());
                        }
                        self.stack.push((node, Some(NavStep::Message(node.name().to_string()))));
                    }
                }
            }
        }

        self.last_node = Some(current);
        Ok(())
    }
}
