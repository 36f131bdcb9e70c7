//! Merging rendered fragments into one prepared query.

use cyql_ir::{Params, PreparedQuery, Rendered};
use indexmap::IndexSet;

use crate::error::{Error, Result};

/// Merge an ordered sequence of rendered fragments into one executable
/// query with a single flat parameter map.
///
/// Fragments may come from one builder run, several independent runs, or
/// be hand-built. Every declared variable name and every parameter key is
/// checked against the running set; any repeat aborts the whole assembly
/// with no partial result. This check is the guard that makes the
/// `key__<var>` namespacing scheme safe: the merged statement is only
/// unambiguous if variable names are unique across all fragments.
///
/// Texts are joined with a newline in input order and the result trimmed.
pub fn prepare_queries<'a, I>(fragments: I) -> Result<PreparedQuery>
where
    I: IntoIterator<Item = &'a Rendered>,
{
    let mut used_names: IndexSet<String> = IndexSet::new();
    let mut parameters = Params::new();
    let mut text = String::new();

    for fragment in fragments {
        for name in &fragment.variable_names {
            if !used_names.insert(name.clone()) {
                return Err(Error::DuplicateVariable { name: name.clone() });
            }
        }
        for (key, value) in &fragment.parameters {
            if parameters.insert(key.clone(), value.clone()).is_some() {
                return Err(Error::DuplicateParameter { key: key.clone() });
            }
        }
        text.push('\n');
        text.push_str(&fragment.text);
    }

    Ok(PreparedQuery {
        text: text.trim().to_owned(),
        parameters,
    })
}
