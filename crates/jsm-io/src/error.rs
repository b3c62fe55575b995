//! Hypermedia I/O error types.

use crate::config::ConfigError;

/// Errors from hypermedia actions.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// None of the rels tried for an action matched a link.
    #[error("no {} link found, unable to {action}", .rels.join(" or "))]
    NoLink {
        /// Action that was attempted (`read`, `save`, ...).
        action: String,
        /// Rels tried, in priority order.
        rels: Vec<String>,
    },
    /// A `links` value could not be parsed.
    #[error("invalid links: {0}")]
    InvalidLinks(String),
    /// A link declares an HTTP method that does not exist.
    #[error("link '{rel}' has invalid method '{method}'")]
    InvalidMethod { rel: String, method: String },
    /// A link href could not be resolved against the base URL.
    #[error("cannot resolve href '{href}': {reason}")]
    Url { href: String, reason: String },
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The server returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The response body is not JSON.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: serde_json::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
