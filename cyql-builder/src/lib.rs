//! Fluent Cypher fragment builder, renderer, and query assembler.
//!
//! The builder assembles a typed fragment tree, resolves deferred
//! variable-name references as elements are allocated, and renders each
//! top-level fragment into text plus a namespaced parameter map. The
//! assembler merges rendered fragments, possibly from several independent
//! builder runs, into one executable query and rejects variable-name and
//! parameter-key collisions outright.
//!
//! # Example
//!
//! ```
//! use cyql_builder::{Capture, QueryBuilder, prepare_queries};
//! use cyql_ir::props;
//!
//! let mut qb = QueryBuilder::new();
//! let account = qb.node_ref();
//! qb.merge()
//!     .node("Account", props! { "id" => "abc" }, Capture::node(account))?;
//! qb.on_create().set(account, props! { "name" => "Max" })?;
//! qb.return_([account.into()])?;
//!
//! let prepared = prepare_queries(&qb.build()?)?;
//! assert_eq!(
//!     prepared.text,
//!     "MERGE (a:Account { id: $id__a })\nON CREATE SET a.name = $name__a\nRETURN a"
//! );
//! # Ok::<(), cyql_builder::Error>(())
//! ```

mod assemble;
mod builder;
mod error;
mod reference;
mod render;

pub use assemble::prepare_queries;
pub use builder::QueryBuilder;
pub use error::{Error, Result};
pub use reference::{Capture, NameRef, NodeRef, VarArg};
