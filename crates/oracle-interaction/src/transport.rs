//! HTTP transport seam for the request executor.
//!
//! The executor only needs "POST these bytes, tell me what came back". Keeping
//! that behind [`HttpTransport`] lets the retry logic run against a scripted
//! transport in tests.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Body recorded for a non-2xx response whose body could not be read.
pub const UNREADABLE_ERROR_BODY: &str = "Failed to read error body";

/// A response the server actually sent, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub timeout: Duration,
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a POST request.
    ///
    /// # Returns
    ///
    /// - `Ok(HttpResponse)`: the server answered (any status)
    /// - `Err(String)`: no response was received (connect failure, timeout, DNS, ...)
    async fn post(&self, request: &HttpRequest) -> Result<HttpResponse, String>;
}

/// Transport backed by `reqwest`.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
        let mut builder = self
            .client
            .post(&request.url)
            .timeout(request.timeout)
            .body(request.body.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(describe_error)?;
        let status = response.status();

        if !status.is_success() {
            // The server already answered; an unreadable error body must not turn
            // this into a retryable failure.
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| UNREADABLE_ERROR_BODY.to_string());
            return Ok(HttpResponse::new(status.as_u16(), body));
        }

        let body = response.text().await.map_err(describe_error)?;
        Ok(HttpResponse::new(status.as_u16(), body))
    }
}

fn describe_error(err: reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport").finish()
    }
}
