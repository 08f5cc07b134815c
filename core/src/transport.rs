//! The single chokepoint every API call goes through.
//!
//! # Design
//! `Core` owns the immutable connection settings (base URL and the fixed
//! header set) plus a `Transport`. `request` turns a verb, path, query and
//! body into an `HttpRequest` without touching the network; `call` executes
//! it once and runs `validate_response`. There are no retries: a failed call
//! surfaces to the caller as-is.

use serde_json::Value;

use crate::config::HyperConfig;
use crate::error::{HyperError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

#[derive(Clone)]
pub struct Core<T> {
    base_url: String,
    headers: Vec<(String, String)>,
    transport: T,
}

impl<T> std::fmt::Debug for Core<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Core")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Core<T> {
    pub fn new(config: &HyperConfig, transport: T) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers: vec![
                ("Authorization".to_string(), format!("Bearer {}", config.api_key)),
                ("accept".to_string(), "application/json".to_string()),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Describe a call without executing it.
    pub fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<HttpRequest> {
        let body = body
            .map(|value| serde_json::to_string(value).map_err(|e| HyperError::Serialization(e.to_string())))
            .transpose()?;
        Ok(HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            query: query.to_vec(),
            headers: self.headers.clone(),
            body,
        })
    }

    /// Issue one request and validate the status.
    pub fn call(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<HttpResponse> {
        let request = self.request(method, path, query, body)?;
        let response = self.transport.execute(&request)?;
        tracing::debug!(%method, path, status = response.status, "hyper api call");
        validate_response(response).inspect_err(|err| {
            tracing::warn!(%method, path, error = %err, "hyper api call rejected");
        })
    }
}

/// Map a response to an error unless its status is 200 or 202.
///
/// 404 always becomes `NotFound`, whatever the body says. Any other rejected
/// status takes its message from the body's `error.message`.
pub fn validate_response(response: HttpResponse) -> Result<HttpResponse> {
    match response.status {
        200 | 202 => Ok(response),
        404 => Err(HyperError::NotFound),
        status => Err(error_from_body(status, response.body)),
    }
}

fn error_from_body(status: u16, body: String) -> HyperError {
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| value.pointer("/error/message")?.as_str().map(str::to_string));
    match message {
        Some(message) => HyperError::Api { status, message },
        None => HyperError::UnexpectedErrorBody { status, body },
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory transport that records requests and replays canned responses.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct RecordingTransport {
        responses: Mutex<VecDeque<HttpResponse>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status: u16, body: &str) -> Self {
            self.responses.lock().unwrap().push_back(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            });
            self
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for RecordingTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| HyperError::Transport("no canned response left".to_string()))
        }
    }
}
