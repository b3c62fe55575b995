//! # jsm-io — Hypermedia Sync for Node Trees
//!
//! Maps logical actions on a node (read, refresh, create, update, save,
//! delete) onto the hypermedia links declared in JSON Hyper-Schema `links`
//! arrays, and performs them through an [`Agent`].
//!
//! ## Usage Forms
//!
//! - **Configured links**: `Io::new(agent, builder).with_links(links)`; the
//!   links come from some entry-point resource. This is how `read` and
//!   `read_default` are usually reached.
//! - **Schema links**: the node's own schema carries `links`. They are
//!   consulted first for every node-bound action, the configured links
//!   second.
//!
//! ## Link Relations
//!
//! Each action tries a priority list of rels ([`RelPolicy`]), IANA
//! relations first:
//!
//! | Action        | Rels tried                         |
//! |---------------|------------------------------------|
//! | `read`        | `instances`                        |
//! | `readDefault` | `create-form`, `new`, `default`    |
//! | `refresh`     | `edit-form`, `self`, `full`        |
//! | `create`      | `create`                           |
//! | `update`      | `edit`, `update`                   |
//! | `save`        | update rels, then create rels      |
//! | `delete`      | `self`, `full`, `delete`           |
//!
//! No matching link is a hard error ([`IoError::NoLink`]) raised before any
//! request is made or any notification emitted.
//!
//! ## Lifecycle Notifications
//!
//! Node-bound actions emit a "before" event on the node (and its class
//! channel) before the request and an "after" event only when it succeeds:
//! `refreshing`/`refreshed`, `creating`/`created`, `updating`/`updated`,
//! `saving`/`saved`, `deleting`/`deleted`.
//!
//! ## Crate Policy
//!
//! - Requests are independent: no coalescing, cancellation or ordering
//!   beyond each call's own completion. Timeouts come from the HTTP client.
//! - Transport failures of idempotent requests are retried with
//!   exponential backoff; everything else surfaces to the caller as is.

pub mod agent;
pub mod config;
pub mod error;
pub mod http;
pub mod io;
pub mod link;
pub(crate) mod retry;
pub mod rels;

pub use agent::Agent;
pub use config::{AgentConfig, ConfigError};
pub use error::IoError;
pub use http::HttpAgent;
pub use io::Io;
pub use link::{Link, Links};
pub use rels::{Action, RelPolicy};
