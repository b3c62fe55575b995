//! The transport seam between [`Io`](crate::Io) and the network.

use std::future::Future;

use serde_json::Value;

use crate::error::IoError;
use crate::link::Link;

/// Performs the request a link describes.
///
/// `href` is the link's href with its template variables already expanded.
pub trait Agent: Send + Sync {
    /// Send `body` (if any) with the link's method and return the response
    /// document; an empty response is `Value::Null`.
    fn follow(
        &self,
        link: &Link,
        href: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = Result<Value, IoError>> + Send;

    /// Delete the resource at `href`. The link's method is ignored.
    fn delete(&self, link: &Link, href: &str) -> impl Future<Output = Result<(), IoError>> + Send;
}
