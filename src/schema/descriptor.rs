/// Sentinel name of the synthetic root node in every field path, matching
/// every real-world message root (`__root__.doc_id`, `__root__.links.forward`, ...).
pub const ROOT: &str = "__root__";

/// Canonicalizes a user-supplied field selector (which omits the `__root__.`
/// prefix, e.g. `"links.backward"`) to the full dotted path the schema graph
/// indexes by (`"__root__.links.backward"`). Paths already carrying the
/// prefix are returned unchanged.
pub fn canonical_path(path: &str) -> String {
    if path == ROOT || path.starts_with(&format!("{}.", ROOT)) {
        path.to_string()
    } else {
        format!("{}.{}", ROOT, path)
    }
}

/// How many times a field may occur under its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Required,
    Optional,
    Repeated,
}

/// The physical type of a scalar leaf. Used only to label leaves for
/// debugging/interop; the core algorithms never interpret the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalType {
    Boolean,
    Int32,
    Int64,
    Float,
    Double,
    ByteArray,
}

/// Whether a field is an inner node (a message/group) or a scalar leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Group,
    Scalar(PhysicalType),
}

/// Everything the schema graph needs to know about one field: its path,
/// whether it is a group or scalar, its repetition label, and its
/// schema-intrinsic repetition/definition levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    path: String,
    kind: FieldKind,
    label: Label,
    max_repetition_level: usize,
    definition_level: usize,
}

impl FieldDescriptor {
    pub fn new(
        path: impl Into<String>,
        kind: FieldKind,
        label: Label,
        max_repetition_level: usize,
        definition_level: usize,
    ) -> Self {
        Self {
            path: path.into(),
            kind,
            label,
            max_repetition_level,
            definition_level,
        }
    }

    /// Convenience constructor for the synthetic root: `__root__`, a group,
    /// required, R=0, D=0 (see [`ROOT`] and the schema graph invariants).
    pub fn root() -> Self {
        Self::new(ROOT, FieldKind::Group, Label::Required, 0, 0)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The last dotted segment of `path`, i.e. the field's own name.
    pub fn name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether this descriptor names a scalar leaf (as opposed to a group).
    /// Callers should prefer [`FieldNode::is_leaf`](super::graph::FieldNode::is_leaf),
    /// which reflects the graph's actual structure rather than the declared
    /// kind: the root is always treated as non-leaf regardless of its kind.
    pub fn is_leaf(&self) -> bool {
        !matches!(self.kind, FieldKind::Group)
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn max_repetition_level(&self) -> usize {
        self.max_repetition_level
    }

    pub fn definition_level(&self) -> usize {
        self.definition_level
    }
}
