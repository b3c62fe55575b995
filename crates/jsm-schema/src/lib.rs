//! # jsm-schema — Schema Engine Adapter
//!
//! The node tree in `jsm-model` never interprets JSON Schema keywords
//! itself. It asks this crate four questions, always through a
//! [`Correlation`] (a schema bound to one instance):
//!
//! - [`Correlation::coerce`] — apply the schema default and check the
//!   declared `type`; `None` means "no usable instance".
//! - [`Correlation::default`] — the schema-declared default.
//! - [`Correlation::subschema`] — the schema governing one property or
//!   index of the bound instance.
//! - [`Correlation::validate`] — run the `jsonschema` validator and return
//!   an [`ErrorTree`] on failure, or `None` when the schema was loaded
//!   without a validate capability.
//!
//! ## Schema Handles
//!
//! A [`Schema`] is a cheap-to-clone handle: a shared document plus a JSON
//! Pointer into it. Sub-schema handles share the document, so local `$ref`s
//! (`#/definitions/...`) keep resolving and compiled validators are cached
//! once per location.
//!
//! ## Crate Policy
//!
//! - Depends only on `jsm-core` internally.
//! - Validation semantics are delegated to the `jsonschema` crate; this
//!   crate only shapes its output into an error tree.
//! - External `$ref`s are never fetched over the network.

pub mod correlation;
pub mod error;
pub mod load;
pub mod schema;
pub mod validate;

pub use correlation::Correlation;
pub use error::SchemaError;
pub use load::load_document;
pub use schema::Schema;
pub use validate::{Assertion, Branch, ErrorTree};
