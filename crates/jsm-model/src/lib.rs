//! # jsm-model — Schema-Driven Node Trees
//!
//! Turns a schema-described instance into a live, mutable tree of nodes
//! mirroring the instance's shape. Every node knows the sub-schema that
//! governs it, can re-validate itself, collects validation errors at the
//! location they describe, and announces changes.
//!
//! ## Nodes
//!
//! - **[`Accessor`]** — a leaf wrapping one scalar value.
//! - **[`Model`]** — an object: named child nodes, in insertion order.
//! - **[`Collection`]** — an array: index-addressed child nodes.
//!
//! [`Node`] is the closed union of the three. The [`Builder`] picks the
//! variant from the runtime kind of the coerced instance, looking it up in a
//! [`TypeRegistry`] that the caller constructs and passes in.
//!
//! ## Building
//!
//! ```text
//! Builder::build(schema, instance)
//!   └─ coerce (schema defaults, type check; raw instance on failure)
//!   └─ registry lookup by Kind → Accessor | Model | Collection
//!   └─ node.build(coerced)
//!        └─ per key / index: subschema(segment) → Builder::build_node(..)
//! ```
//!
//! ## Validation
//!
//! `validate()` resets the subtree's errors, validates the node's current
//! `to_value()` snapshot and walks the returned error tree: node-level
//! assertions stay on the node, every other assertion travels down its
//! instance path to the deepest node that exists. Errors addressed to a key
//! with no child (a missing required property) are kept on the parent both
//! locally and under that key.
//!
//! ## Notifications
//!
//! Every event is delivered to the node's own [`Channel`] first, then to the
//! type-level channel for the node's class held by the [`Builder`].
//!
//! ## Crate Policy
//!
//! - Depends on `jsm-core` and `jsm-schema` only.
//! - Building and validating never fail: coercion problems fall back to the
//!   raw instance and validation problems become node errors.
//! - Trees are single-owner and synchronous. The builder handle is
//!   `Send + Sync` and may be shared between trees.

pub mod accessor;
pub mod builder;
pub mod collection;
pub mod error_store;
pub mod event;
pub mod model;
pub mod node;
pub mod registry;
mod validation;

pub use accessor::Accessor;
pub use builder::Builder;
pub use collection::Collection;
pub use error_store::ErrorStore;
pub use event::{names, Channel, Event};
pub use model::Model;
pub use node::{Node, NodeState};
pub use registry::{NodeClass, RegistryError, TypeRegistry};

// Re-exported so callers can build trees without naming jsm-schema.
pub use jsm_schema::{Assertion, Schema};
