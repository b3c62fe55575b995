//! Backoff for hypermedia requests.
//!
//! Only idempotent methods are resent, and only after a transport error
//! (connection refused, timeout). A response of any status ends the loop;
//! rejected requests are the caller's to report.

use std::future::Future;
use std::time::Duration;

use reqwest::Method;

/// How often, and how patiently, a link is followed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(200))
    }
}

impl RetryPolicy {
    pub(crate) fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Retries allowed for `method`. A POST or PATCH that failed in
    /// transit may still have been applied, so it gets none.
    pub(crate) fn retries_for(&self, method: &Method) -> u32 {
        if method.is_idempotent() {
            self.max_retries
        } else {
            0
        }
    }

    /// Wait before retry number `attempt` (zero-based); doubles each time.
    pub(crate) fn delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Run `f` until it yields a response or the retries for `method` run out.
    pub(crate) async fn send<F, Fut>(
        &self,
        method: &Method,
        endpoint: &str,
        f: F,
    ) -> Result<reqwest::Response, reqwest::Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let retries = self.retries_for(method);
        let mut attempt = 0;
        loop {
            match f().await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < retries => {
                    let delay = self.delay(attempt);
                    attempt += 1;
                    tracing::warn!(
                        %endpoint,
                        attempt,
                        max_retries = retries,
                        "link request failed, retrying in {delay:?}: {e}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
