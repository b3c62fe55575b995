//! # jsm-core — Foundational Types for Schema Models
//!
//! The leaf of the workspace DAG. Everything that the schema adapter, the
//! node tree and the hypermedia layer need to agree on lives here:
//!
//! 1. **`Kind`** — the runtime kind of a JSON value (`object`, `array`,
//!    `string`, ...). The node builder dispatches on it and the type
//!    registry is keyed by it.
//!
//! 2. **`PathSegment` / `InstancePath`** — structured instance paths. Errors
//!    reported by the validator carry an `InstancePath`, and the error walk
//!    matches on segments instead of splitting strings.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jsm-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod kind;
pub mod path;

pub use error::PathError;
pub use kind::Kind;
pub use path::{escape_token, InstancePath, PathSegment};
