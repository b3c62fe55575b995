//! # Error Types
//!
//! Errors raised while parsing structured instance paths. Higher crates
//! define their own `thiserror` enums and wrap these where needed.

use thiserror::Error;

/// Error parsing a JSON Pointer into an [`InstancePath`](crate::InstancePath).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A non-empty pointer must start with `/`.
    #[error("JSON pointer must be empty or start with '/': {0:?}")]
    NotAPointer(String),

    /// `~` may only be followed by `0` or `1`.
    #[error("invalid escape sequence in JSON pointer token {0:?}")]
    BadEscape(String),
}
