//! # Schema Errors
//!
//! Only loading and eager compilation can fail. Coercion and validation
//! never return `Err`: they report through `Option` and [`ErrorTree`]
//! values instead.
//!
//! [`ErrorTree`]: crate::ErrorTree

use thiserror::Error;

/// Error loading or compiling a schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A schema or instance document could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad {
        /// Path to the document that failed to load.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// The compiled validator could not be built (e.g., invalid schema).
    #[error("validator build error for schema at '{pointer}': {reason}")]
    ValidatorBuild {
        /// JSON Pointer of the schema location inside its document.
        pointer: String,
        /// Reason the validator could not be built.
        reason: String,
    },
}
