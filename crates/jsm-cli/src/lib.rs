//! # jsm-cli — Command-Line Interface for Schema Models
//!
//! ## Subcommands
//!
//! - `build` — coerce an instance under a schema and print the built tree
//! - `validate` — build, validate, and print every error with its location
//! - `links` — show which link each hypermedia action would follow
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers; handlers write to the
//!   writer they are given and return the process exit code.
//! - Handler functions delegate to the domain crates, no model logic here.

pub mod links;
pub mod tree;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use jsm_schema::{load_document, Schema};

/// Load the schema at `path`, with `$ref`s resolved against the document.
pub(crate) fn load_schema(path: &Path) -> Result<Schema> {
    Schema::from_file(path).with_context(|| format!("loading schema {}", path.display()))
}

/// Load an instance document, or `null` when no path is given.
pub(crate) fn load_instance(path: Option<&Path>) -> Result<Value> {
    match path {
        Some(path) => {
            load_document(path).with_context(|| format!("loading instance {}", path.display()))
        }
        None => Ok(Value::Null),
    }
}
