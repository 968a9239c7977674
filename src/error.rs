/// Errors produced by schema construction, shredding, scanning and assembly.
///
/// Every public, fallible entry point in this crate returns [`Result`] rather
/// than panicking; the one exception is [`DremelError::Internal`], which is
/// still a typed error rather than a panic but signals a bug in the FSM or
/// builder rather than bad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DremelError {
    /// Schema graph construction failed: duplicate node, missing descriptor,
    /// a leaf with outgoing edges, a non-leaf with none, or a recursive
    /// message definition.
    SchemaBuild(String),
    /// `lowest_common_ancestor` was asked about two nodes from different graphs.
    SchemaMismatch(String),
    /// Two projected leaves are independently repeated (ambiguous flat projection).
    IndependentlyRepeated(String),
    /// A projection referenced a field path that is not a leaf in the schema.
    UnknownField(String),
    /// A record violated its schema: a required field was missing, or a
    /// label was inconsistent with the payload.
    InvalidRecord(String),
    /// A column reader produced triples inconsistent with the schema, e.g. a
    /// leaf mismatch observed during assembly.
    InvalidColumnStream(String),
    /// A reader method was called before the first call to `next()`.
    ReadBeforeFetch(String),
    /// An [`AssemblyBuilder`](crate::assembly::AssemblyBuilder) method was called out of sequence.
    BuilderProtocol(String),
    /// An invariant the implementation relies on was violated.
    Internal(String),
}

impl std::error::Error for DremelError {}

impl std::fmt::Display for DremelError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DremelError::SchemaBuild(message) => write!(fmt, "schema build error: {}", message),
            DremelError::SchemaMismatch(message) => write!(fmt, "schema mismatch: {}", message),
            DremelError::IndependentlyRepeated(message) => {
                write!(fmt, "independently repeated fields: {}", message)
            }
            DremelError::UnknownField(message) => write!(fmt, "unknown field: {}", message),
            DremelError::InvalidRecord(message) => write!(fmt, "invalid record: {}", message),
            DremelError::InvalidColumnStream(message) => {
                write!(fmt, "invalid column stream: {}", message)
            }
            DremelError::ReadBeforeFetch(message) => {
                write!(fmt, "read before fetch: {}", message)
            }
            DremelError::BuilderProtocol(message) => {
                write!(fmt, "builder protocol violation: {}", message)
            }
            DremelError::Internal(message) => write!(fmt, "internal error: {}", message),
        }
    }
}

/// A specialized `Result` for this crate's errors.
pub type Result<T> = std::result::Result<T, DremelError>;

macro_rules! schema_err {
    ($fmt:expr) => (crate::error::DremelError::SchemaBuild($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (crate::error::DremelError::SchemaBuild(format!($fmt, $($args),*)));
}
