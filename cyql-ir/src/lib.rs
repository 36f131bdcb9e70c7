//! Intermediate representation types for the cyql query builder.
//!
//! This crate provides the unified type definitions shared across the cyql
//! pipeline. These types are the single source of truth for the fragment
//! tree and for builder output.
//!
//! # Architecture
//!
//! ```text
//! fluent builder → fragment tree (this crate) → renderer → assembler → session
//! ```
//!
//! The IR types are designed to be:
//! - Driver-agnostic (no transport or session concerns)
//! - Closed (fragment kinds and literal values are fixed tag sets)
//! - Self-contained (ordered maps and serde derives, nothing else)

mod fragment;
mod naming;
mod rendered;
mod value;

pub use fragment::{Fragment, FragmentArena, FragmentId, FragmentKind, Metadata};
pub use naming::VarNameGenerator;
pub use rendered::{PreparedQuery, Rendered};
pub use value::{Params, Value};
