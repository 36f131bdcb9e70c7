//! Builder output records.

use serde::{Deserialize, Serialize};

use crate::value::Params;

/// One top-level fragment after rendering.
///
/// `parameters` keys are already namespaced (`key__<var>`) and
/// `variable_names` lists every variable the fragment introduces, in
/// order. Callers may also construct these by hand and feed them to the
/// assembler alongside builder output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rendered {
    /// Query text for this fragment, without a trailing separator.
    pub text: String,
    /// Namespaced parameter map contributed by this fragment.
    #[serde(default)]
    pub parameters: Params,
    /// Variable names this fragment declares.
    #[serde(default)]
    pub variable_names: Vec<String>,
}

impl Rendered {
    /// Create a rendered fragment holding only text.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// A fully assembled query ready for one database round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedQuery {
    /// Newline-joined, trimmed query text.
    pub text: String,
    /// Flat parameter map for the whole statement.
    pub parameters: Params,
}
