//! Transport seam: send one `HttpRequest`, get one `HttpResponse`.
//!
//! # Design
//! `Transport` is the only place the client touches the network. The default
//! `UreqTransport` wraps a blocking `ureq::Agent`; tests inject their own
//! implementation through `RestClient::builder`. The agent is configured
//! with `http_status_as_error(false)` so 4xx/5xx responses come back as data
//! rather than `Err`, leaving status interpretation to the caller.

use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{media_type, HeaderSet, HttpMethod, HttpRequest, HttpResponse};

/// Executes a single HTTP exchange. Network failures must surface as errors,
/// never as empty responses.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by `ureq`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    body_limit: u64,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    /// `None` leaves ureq's own defaults in place. Response bodies are read
    /// in full whatever their size.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self {
            agent,
            body_limit: u64::MAX,
        }
    }

    /// Timeout and body cap taken from `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_timeout(config.timeout()).with_body_limit(config.max_body_bytes)
    }

    /// Refuse response bodies larger than `limit` bytes. `None` removes the cap.
    pub fn with_body_limit(mut self, limit: Option<u64>) -> Self {
        self.body_limit = limit.unwrap_or(u64::MAX);
        self
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut response = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in request.headers.iter() {
                    builder = builder.header(name, value);
                }
                builder.call()?
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in request.headers.iter() {
                    if request.content_type.is_some() && name.eq_ignore_ascii_case("content-type") {
                        continue;
                    }
                    builder = builder.header(name, value);
                }
                if let Some(content_type) = request.content_type.as_deref() {
                    builder = builder.content_type(content_type);
                }
                let body = request.body.unwrap_or_default();
                builder.send(body.as_bytes())?
            }
        };

        let status = response.status();
        let mut headers = HeaderSet::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.add(name.as_str(), value);
            }
        }
        let content_type = headers.get("content-type").and_then(media_type);

        let body = response
            .body_mut()
            .with_config()
            .limit(self.body_limit)
            .read_to_string()?;
        let body = if body.is_empty() { None } else { Some(body) };

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            body,
            headers,
        })
    }
}
