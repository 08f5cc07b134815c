//! HTTP transport types.
//!
//! # Design
//! Requests and responses are described as plain data. `Core` builds an
//! `HttpRequest`, hands it to a `Transport`, and interprets the returned
//! `HttpResponse`. The default transport is a blocking `ureq` agent; tests
//! swap in an in-memory one, which keeps status handling and the authorize
//! flow testable without a network.
//!
//! All fields use owned types (`String`, `Vec`) so values can be recorded and
//! compared freely.

use serde_json::Value;

use crate::error::{HyperError, Result};

/// HTTP method for a request. The API only uses these four.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `url` is the absolute URL without a query string; `query` pairs are
/// appended by the transport in order.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).map_err(|e| HyperError::Deserialization(e.to_string()))
    }

    /// Take the body as raw text.
    pub fn text(self) -> String {
        self.body
    }
}

/// Executes a request and returns whatever the server answered.
///
/// Implementations must hand back non-2xx responses as data; status
/// interpretation belongs to `Core`. Only failures that produced no response
/// at all are errors here.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Blocking transport backed by a shared `ureq::Agent`.
///
/// The agent pools connections and is cheap to clone. Status codes are never
/// turned into `ureq` errors so the body of a rejected request stays readable.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = request.url.as_str();
        let result = match request.method {
            HttpMethod::Get => with_parts(self.agent.get(url), request).call(),
            HttpMethod::Delete => with_parts(self.agent.delete(url), request).call(),
            HttpMethod::Post => {
                let builder = with_parts(self.agent.post(url), request);
                match request.body.as_deref() {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Patch => {
                let builder = with_parts(self.agent.patch(url), request);
                match request.body.as_deref() {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| HyperError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| HyperError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_parts<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    builder
}
