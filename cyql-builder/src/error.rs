use cyql_ir::FragmentKind;
use miette::Diagnostic;
use thiserror::Error;

/// Result type for builder, renderer, and assembler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while constructing, rendering, or assembling queries.
///
/// Usage errors surface at the builder call that violates a precondition.
/// Collision errors surface only at assembly time, once fragments from
/// possibly independent sources are merged. Integrity errors indicate a
/// construction bug rather than a caller mistake.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("cannot add \"{kind}\", no query exists")]
    #[diagnostic(
        code(cyql::no_open_clause),
        help("open a clause first, e.g. MATCH or MERGE, before adding graph elements")
    )]
    NoOpenClause { kind: FragmentKind },

    #[error("cannot generate RETURN with no provided arguments")]
    #[diagnostic(code(cyql::empty_return))]
    EmptyReturn,

    #[error("reference is unresolved")]
    #[diagnostic(
        code(cyql::unresolved_reference),
        help("a reference resolves when the element capturing it is added to the builder")
    )]
    UnresolvedReference,

    #[error("referenced element has no variable name")]
    #[diagnostic(
        code(cyql::unnamed_element),
        help("capture the element with a reference so the builder assigns it a variable name")
    )]
    UnnamedElement,

    #[error("reference does not belong to this builder")]
    #[diagnostic(code(cyql::foreign_reference))]
    ForeignReference,

    #[error("duplicate variable name \"{name}\", cannot proceed safely")]
    #[diagnostic(
        code(cyql::duplicate_variable),
        help("fragments merged into one statement must declare distinct variable names")
    )]
    DuplicateVariable { name: String },

    #[error("duplicate parameter key \"{key}\", cannot proceed safely")]
    #[diagnostic(code(cyql::duplicate_parameter))]
    DuplicateParameter { key: String },

    #[error("query construction is corrupt: {reason}")]
    #[diagnostic(code(cyql::integrity))]
    Integrity { reason: String },
}

impl Error {
    /// Create an integrity error. These indicate bugs in query
    /// construction, never caller input problems.
    pub(crate) fn integrity(reason: impl Into<String>) -> Self {
        Error::Integrity {
            reason: reason.into(),
        }
    }
}
