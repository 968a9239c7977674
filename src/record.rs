//! Reference record representation and the record-factory interface the
//! assembler is built against (§6 of the accompanying design doc).
//!
//! The assembler and shredder only ever talk to the [`Record`] trait; any
//! other in-memory record type that implements it plugs in without either
//! algorithm knowing. [`DynamicRecord`] is the reflective, name-indexed
//! implementation every test in this crate uses, a small closed value
//! representation with no external dependency.

/// The dynamic value carried by one leaf occurrence. `None` in a triple
/// means the occurrence is a null placeholder (see the column-set encoding
/// invariant); `Some` carries the actual scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int64(i64),
    Double(f64),
    Str(String),
    Bytes(Vec<u8>),
}

/// One named slot of a [`DynamicRecord`]: a scalar, a repeated scalar, an
/// optional nested message, or a repeated nested message.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Scalar(Option<Value>),
    ScalarRepeated(Vec<Value>),
    Message(Option<Box<DynamicRecord>>),
    MessageRepeated(Vec<DynamicRecord>),
}

/// A reflective, name-indexed record tree satisfying the [`Record`] trait.
/// Fields are created lazily on first access in insertion order, so no
/// schema skeleton needs to be pre-built before shredding or assembling into
/// one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynamicRecord {
    fields: Vec<(String, Slot)>,
}

impl DynamicRecord {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| n == name)
    }

    fn slot_or_insert(&mut self, name: &str, default: Slot) -> &mut Slot {
        if self.slot_index(name).is_none() {
            self.fields.push((name.to_string(), default));
        }
        let idx = self.slot_index(name).unwrap();
        &mut self.fields[idx].1
    }

    pub fn scalar(&self, name: &str) -> Option<&Value> {
        match self.fields.iter().find(|(n, _)| n == name)?.1 {
            Slot::Scalar(ref v) => v.as_ref(),
            _ => None,
        }
    }

    pub fn scalar_repeated(&self, name: &str) -> &[Value] {
        match self.fields.iter().find(|(n, _)| n == name) {
            Some((_, Slot::ScalarRepeated(v))) => v,
            _ => &[],
        }
    }

    pub fn message(&self, name: &str) -> Option<&DynamicRecord> {
        match self.fields.iter().find(|(n, _)| n == name)?.1 {
            Slot::Message(ref m) => m.as_deref(),
            _ => None,
        }
    }

    pub fn message_repeated(&self, name: &str) -> &[DynamicRecord] {
        match self.fields.iter().find(|(n, _)| n == name) {
            Some((_, Slot::MessageRepeated(v))) => v,
            _ => &[],
        }
    }

    /// Whether any slot has been populated at all (used by tests that
    /// compare a trimmed-away optional/repeated subtree against "absent").
    pub fn has_field(&self, name: &str) -> bool {
        self.slot_index(name).is_some()
    }
}

/// The record-factory interface of §6: everything the shredder and
/// assembler need from a concrete record type, keyed by field name so
/// neither algorithm needs to know the record's static shape.
pub trait Record {
    fn set_scalar(&mut self, name: &str, value: Value);
    fn append_scalar(&mut self, name: &str, value: Value);
    /// Marks the optional message field present and returns it (creating an
    /// empty one on first entry).
    fn enter_message(&mut self, name: &str) -> &mut Self;
    /// Appends a new element to a repeated message field and returns it.
    fn append_message(&mut self, name: &str) -> &mut Self;
}

impl Record for DynamicRecord {
    fn set_scalar(&mut self, name: &str, value: Value) {
        *self.slot_or_insert(name, Slot::Scalar(None)) = Slot::Scalar(Some(value));
    }

    fn append_scalar(&mut self, name: &str, value: Value) {
        match self.slot_or_insert(name, Slot::ScalarRepeated(Vec::new())) {
            Slot::ScalarRepeated(v) => v.push(value),
            other => *other = Slot::ScalarRepeated(vec![value]),
        }
    }

    fn enter_message(&mut self, name: &str) -> &mut Self {
        let slot = self.slot_or_insert(name, Slot::Message(None));
        match slot {
            Slot::Message(m) => m.get_or_insert_with(|| Box::new(DynamicRecord::new())),
            other => {
                *other = Slot::Message(Some(Box::new(DynamicRecord::new())));
                match other {
                    Slot::Message(m) => m.as_mut().unwrap(),
                    _ => unreachable!(),
                }
            }
        }
    }

    fn append_message(&mut self, name: &str) -> &mut Self {
        let slot = self.slot_or_insert(name, Slot::MessageRepeated(Vec::new()));
        match slot {
            Slot::MessageRepeated(v) => {
                v.push(DynamicRecord::new());
                v.last_mut().unwrap()
            }
            other => {
                *other = Slot::MessageRepeated(vec![DynamicRecord::new()]);
                match other {
                    Slot::MessageRepeated(v) => v.last_mut().unwrap(),
                    _ => unreachable!(),
                }
            }
        }
    }
}

/// Navigation the [`MessageAssemblyBuilder`](crate::assembly::MessageAssemblyBuilder)
/// needs to re-derive a mutable handle to the submessage currently open at
/// the top of its assembly stack, starting fresh from the record root on
/// every field assignment (so it never holds a long-lived `&mut` into the
/// record tree across calls).
pub trait RecordNav: Record {
    /// The optional/required nested message named `name`, if one has been
    /// entered already.
    fn message_mut(&mut self, name: &str) -> Option<&mut Self>;
    /// The most recently appended element of the repeated nested message
    /// named `name`, if at least one has been appended already.
    fn message_repeated_last_mut(&mut self, name: &str) -> Option<&mut Self>;
}

impl RecordNav for DynamicRecord {
    fn message_mut(&mut self, name: &str) -> Option<&mut Self> {
        match self.fields.iter_mut().find(|(n, _)| n == name)?.1 {
            Slot::Message(ref mut m) => m.as_deref_mut(),
            _ => None,
        }
    }

    fn message_repeated_last_mut(&mut self, name: &str) -> Option<&mut Self> {
        match self.fields.iter_mut().find(|(n, _)| n == name)?.1 {
            Slot::MessageRepeated(ref mut v) => v.last_mut(),
            _ => None,
        }
    }
}

/// The reflective read side of a record, used by the shredder to walk an
/// input record without knowing its static shape. [`Record`] is the write
/// side the assembler builds into; a type may implement both.
pub trait RecordView {
    fn scalar(&self, name: &str) -> Option<&Value>;
    fn scalar_repeated(&self, name: &str) -> &[Value];
    fn message(&self, name: &str) -> Option<&Self>
    where
        Self: Sized;
    fn message_repeated(&self, name: &str) -> &[Self]
    where
        Self: Sized;
}

impl RecordView for DynamicRecord {
    fn scalar(&self, name: &str) -> Option<&Value> {
        self.scalar(name)
    }

    fn scalar_repeated(&self, name: &str) -> &[Value] {
        self.scalar_repeated(name)
    }

    fn message(&self, name: &str) -> Option<&Self> {
        self.message(name)
    }

    fn message_repeated(&self, name: &str) -> &[Self] {
        self.message_repeated(name)
    }
}

/// A zero-argument factory producing a fresh, empty record matching the root
/// schema (§6). The assembler calls this once per record it reconstructs.
pub trait RecordFactory {
    type Record: Record;
    fn create(&self) -> Self::Record;
}

/// The reference factory for [`DynamicRecord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicRecordFactory;

impl RecordFactory for DynamicRecordFactory {
    type Record = DynamicRecord;
    fn create(&self) -> DynamicRecord {
        DynamicRecord::new()
    }
}
