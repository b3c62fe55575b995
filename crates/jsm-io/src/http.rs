//! reqwest-backed [`Agent`].
//!
//! Link hrefs are resolved against the configured base URL, so a server
//! can publish relative links. Requests carry `Accept: application/json`
//! and, when configured, a bearer token.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::agent::Agent;
use crate::config::{AgentConfig, ConfigError};
use crate::error::IoError;
use crate::link::Link;
use crate::retry::RetryPolicy;

const RETRY_BASE_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct HttpAgent {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl HttpAgent {
    pub fn new(config: AgentConfig) -> Result<Self, IoError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.api_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                    .map_err(|_| ConfigError::InvalidToken)?,
            );
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| IoError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url,
            retry: RetryPolicy::new(config.max_retries, RETRY_BASE_DELAY),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, href: &str) -> Result<Url, IoError> {
        self.base_url.join(href).map_err(|e| IoError::Url {
            href: href.to_string(),
            reason: e.to_string(),
        })
    }

    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Value, IoError> {
        let endpoint = format!("{method} {url}");
        tracing::debug!(%endpoint, "following link");

        let request = || {
            let builder = self.http.request(method.clone(), url.clone());
            match body {
                Some(body) => builder.json(body).send(),
                None => builder.send(),
            }
        };
        let resp = self
            .retry
            .send(&method, &endpoint, request)
            .await
            .map_err(|e| IoError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%endpoint, status = status.as_u16(), "request rejected");
            return Err(IoError::Api {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await.map_err(|e| IoError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| IoError::Deserialization { endpoint, source: e })
    }
}

fn parse_method(link: &Link) -> Result<Method, IoError> {
    Method::from_bytes(link.method.to_ascii_uppercase().as_bytes()).map_err(|_| {
        IoError::InvalidMethod {
            rel: link.rel.clone(),
            method: link.method.clone(),
        }
    })
}

impl Agent for HttpAgent {
    async fn follow(&self, link: &Link, href: &str, body: Option<&Value>) -> Result<Value, IoError> {
        let method = parse_method(link)?;
        let url = self.resolve(href)?;
        // A body on GET/HEAD is dropped rather than sent.
        let body = body.filter(|_| !matches!(method, Method::GET | Method::HEAD));
        self.send(method, url, body).await
    }

    async fn delete(&self, _link: &Link, href: &str) -> Result<(), IoError> {
        let url = self.resolve(href)?;
        self.send(Method::DELETE, url, None).await.map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_parse_case_insensitively() {
        let link = Link::new("create", "/c").with_method("post");
        assert_eq!(parse_method(&link).unwrap(), Method::POST);
        let bad = Link::new("create", "/c").with_method("NOT A METHOD");
        assert!(matches!(parse_method(&bad), Err(IoError::InvalidMethod { .. })));
    }

    #[test]
    fn hrefs_resolve_against_base() {
        let agent = HttpAgent::new(AgentConfig::for_base("http://api.test/v1/").unwrap()).unwrap();
        assert_eq!(
            agent.resolve("contacts/7").unwrap().as_str(),
            "http://api.test/v1/contacts/7"
        );
        assert_eq!(agent.resolve("/root").unwrap().as_str(), "http://api.test/root");
        assert_eq!(
            agent.resolve("https://other.test/x").unwrap().as_str(),
            "https://other.test/x"
        );
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let cfg = AgentConfig::local(1).unwrap().with_token("bad\ntoken");
        assert!(matches!(
            HttpAgent::new(cfg),
            Err(IoError::Config(ConfigError::InvalidToken))
        ));
    }
}
