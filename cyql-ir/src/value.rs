//! Literal property values and parameter maps.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping of property or parameter keys to literal values.
///
/// Insertion order is the left-to-right order in rendered text, so the map
/// must preserve it.
pub type Params = IndexMap<String, Value>;

/// A literal value that can be bound as a query parameter.
///
/// This is a closed set: the query engine receives parameters as a flat
/// map of these literals, never as nested structures keyed by anything
/// other than a namespaced property key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    String(String),
    /// Homogeneous or mixed list of literals.
    List(Vec<Value>),
}

impl Value {
    /// Create a string value.
    pub fn string(v: impl Into<String>) -> Self {
        Self::String(v.into())
    }

    /// Create an integer value.
    pub fn int(v: i64) -> Self {
        Self::Int(v)
    }

    /// Create a boolean value.
    pub fn bool(v: bool) -> Self {
        Self::Bool(v)
    }

    /// Create a float value.
    pub fn float(v: f64) -> Self {
        Self::Float(v)
    }

    /// Create a list value.
    pub fn list(v: impl IntoIterator<Item = Value>) -> Self {
        Self::List(v.into_iter().collect())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// Construct a [`Params`] map from `key => value` pairs.
///
/// Values go through [`Value::from`], so string, integer, float, and
/// boolean literals work directly.
///
/// # Example
///
/// ```
/// use cyql_ir::props;
///
/// let props = props! { "id" => "abc", "active" => true };
/// assert_eq!(props.len(), 2);
/// ```
#[macro_export]
macro_rules! props {
    () => { $crate::Params::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Params::new();
        $(
            map.insert(::std::string::String::from($key), $crate::Value::from($value));
        )+
        map
    }};
}
