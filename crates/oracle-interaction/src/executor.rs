//! Request Executor: authenticated JSON POST with bounded retry.
//!
//! Every attempt is classified into an [`AttemptOutcome`]:
//! - `Success`: 2xx with a JSON body, returned to the caller
//! - `Permanent`: the server answered with a non-2xx status, never retried
//! - `Transient`: nothing usable came back, retried after a linear backoff

use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;
use oracle_core::error::{OracleError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const API_KEY_HEADER: &str = "x-goog-api-key";
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_secs(2);

/// Result of a single attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success(Value),
    Permanent {
        status: u16,
        reason: String,
        body: String,
    },
    Transient(TransientCause),
}

/// Why an attempt produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransientCause {
    /// No response at all: connect failure, timeout, DNS, ...
    NoResponse(String),
    /// A 2xx response whose body is not JSON.
    MalformedBody(String),
}

impl TransientCause {
    pub fn reason(&self) -> &str {
        match self {
            Self::NoResponse(reason) | Self::MalformedBody(reason) => reason,
        }
    }

    fn into_error(self) -> OracleError {
        match self {
            Self::NoResponse(reason) => OracleError::network(reason),
            Self::MalformedBody(message) => OracleError::parse(message),
        }
    }
}

/// Wait primitive used between attempts.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn wait(&self, _duration: Duration) {}
}

/// Receives retry and failure notices while the executor runs.
///
/// Observers only report; they cannot change what the executor does next.
pub trait AttemptObserver: Send + Sync {
    /// Attempt `attempt` (1-based) failed transiently; the executor will wait `wait` and retry.
    fn on_retry(&self, attempt: u32, reason: &str, wait: Duration);

    /// The final attempt `attempt` failed transiently; no retry follows.
    fn on_give_up(&self, attempt: u32, reason: &str);

    /// The server rejected the request; `body` is the raw error body.
    fn on_permanent_failure(&self, status: u16, body: &str);
}

/// Reports through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl AttemptObserver for TracingObserver {
    fn on_retry(&self, attempt: u32, reason: &str, wait: Duration) {
        tracing::warn!(attempt, wait_secs = wait.as_secs(), "Network error: {reason}. Retrying");
    }

    fn on_give_up(&self, attempt: u32, reason: &str) {
        tracing::warn!(attempt, "Network error: {reason}. Giving up");
    }

    fn on_permanent_failure(&self, status: u16, body: &str) {
        tracing::error!(status, "API HTTPError: {body}");
    }
}

/// Executes JSON POST requests with bounded retry.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
    delay: Arc<dyn Delay>,
    observer: Arc<dyn AttemptObserver>,
    backoff_step: Duration,
}

impl RequestExecutor {
    /// Creates an executor that sleeps between attempts and reports through `tracing`.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            delay: Arc::new(TokioDelay),
            observer: Arc::new(TracingObserver),
            backoff_step: DEFAULT_BACKOFF_STEP,
        }
    }

    pub fn with_delay(mut self, delay: Arc<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn AttemptObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Sets the backoff unit: the wait after failed attempt `n` is `n * step`.
    pub fn with_backoff_step(mut self, step: Duration) -> Self {
        self.backoff_step = step;
        self
    }

    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt)
    }

    /// Serializes `payload`, POSTs it to `url` and returns the parsed JSON body.
    ///
    /// At least one attempt is made even when `max_retries` is 0.
    ///
    /// # Errors
    ///
    /// - `OracleError::Api`: the server answered with a non-2xx status (no retry)
    /// - `OracleError::Network`: every attempt failed without a usable response
    /// - `OracleError::Parse`: the final attempt got a 2xx body that is not JSON
    /// - `OracleError::Serialization`: `payload` could not be encoded
    pub async fn execute<T: Serialize + ?Sized>(
        &self,
        url: &str,
        api_key: &str,
        payload: &T,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Value> {
        let request = HttpRequest {
            url: url.to_string(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                (API_KEY_HEADER.to_string(), api_key.to_string()),
            ],
            body: serde_json::to_vec(payload)?,
            timeout,
        };

        let attempts = max_retries.max(1);
        let mut last_failure = TransientCause::NoResponse("no attempt was made".to_string());

        for attempt in 1..=attempts {
            tracing::debug!(attempt, attempts, url, "Sending request");

            let outcome = classify(self.transport.post(&request).await);
            match outcome {
                AttemptOutcome::Success(body) => return Ok(body),
                AttemptOutcome::Permanent {
                    status,
                    reason,
                    body,
                } => {
                    self.observer.on_permanent_failure(status, &body);
                    return Err(OracleError::api(status, reason));
                }
                AttemptOutcome::Transient(cause) if attempt == attempts => {
                    self.observer.on_give_up(attempt, cause.reason());
                    last_failure = cause;
                }
                AttemptOutcome::Transient(cause) => {
                    let wait = self.backoff_for(attempt);
                    self.observer.on_retry(attempt, cause.reason(), wait);
                    last_failure = cause;
                    self.delay.wait(wait).await;
                }
            }
        }

        Err(last_failure.into_error())
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("backoff_step", &self.backoff_step)
            .finish()
    }
}

/// Maps what the transport returned onto the three attempt outcomes.
pub fn classify(result: std::result::Result<HttpResponse, String>) -> AttemptOutcome {
    match result {
        Err(reason) => AttemptOutcome::Transient(TransientCause::NoResponse(reason)),
        Ok(response) if response.is_success() => {
            match serde_json::from_str::<Value>(&response.body) {
                Ok(value) => AttemptOutcome::Success(value),
                Err(err) => AttemptOutcome::Transient(TransientCause::MalformedBody(format!(
                    "response body is not valid JSON: {err}"
                ))),
            }
        }
        Ok(response) => AttemptOutcome::Permanent {
            status: response.status,
            reason: error_reason(response.status, &response.body),
            body: response.body,
        },
    }
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// `"<STATUS>: <message>"` from the API error envelope, else the status reason phrase.
fn error_reason(status: u16, body: &str) -> String {
    if let Ok(wrapper) = serde_json::from_str::<ErrorWrapper>(body) {
        let status_text = wrapper.error.status.unwrap_or_default();
        match wrapper.error.message {
            Some(msg) if status_text.is_empty() => return msg,
            Some(msg) => return format!("{status_text}: {msg}"),
            None if !status_text.is_empty() => return status_text,
            None => {}
        }
    }

    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_success() {
        let outcome = classify(Ok(HttpResponse::new(200, r#"{"ok": true}"#)));
        assert_eq!(outcome, AttemptOutcome::Success(json!({"ok": true})));
    }

    #[test]
    fn test_classify_connection_failure_is_transient() {
        let outcome = classify(Err("connection refused".to_string()));
        assert_eq!(
            outcome,
            AttemptOutcome::Transient(TransientCause::NoResponse(
                "connection refused".to_string()
            ))
        );
    }

    #[test]
    fn test_classify_non_json_success_is_transient() {
        let outcome = classify(Ok(HttpResponse::new(200, "<html>")));
        assert!(matches!(
            outcome,
            AttemptOutcome::Transient(TransientCause::MalformedBody(_))
        ));
    }

    #[test]
    fn test_classify_api_error_envelope() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        let outcome = classify(Ok(HttpResponse::new(400, body)));
        assert_eq!(
            outcome,
            AttemptOutcome::Permanent {
                status: 400,
                reason: "INVALID_ARGUMENT: API key not valid.".to_string(),
                body: body.to_string(),
            }
        );
    }

    #[test]
    fn test_classify_plain_error_body_uses_reason_phrase() {
        match classify(Ok(HttpResponse::new(503, "upstream down"))) {
            AttemptOutcome::Permanent { status, reason, .. } => {
                assert_eq!(status, 503);
                assert_eq!(reason, "Service Unavailable");
            }
            other => panic!("Expected Permanent, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_status_without_phrase() {
        assert_eq!(error_reason(599, ""), "HTTP 599");
    }

    #[test]
    fn test_backoff_is_linear() {
        struct Never;
        #[async_trait]
        impl HttpTransport for Never {
            async fn post(&self, _request: &HttpRequest) -> std::result::Result<HttpResponse, String> {
                Err("unused".to_string())
            }
        }

        let executor = RequestExecutor::new(Arc::new(Never));
        assert_eq!(executor.backoff_for(1), Duration::from_secs(2));
        assert_eq!(executor.backoff_for(2), Duration::from_secs(4));
        assert_eq!(executor.backoff_for(3), Duration::from_secs(6));

        let huge = executor.with_backoff_step(Duration::from_secs(u64::MAX));
        assert_eq!(huge.backoff_for(1), Duration::from_secs(u64::MAX));
        assert_eq!(huge.backoff_for(2), Duration::MAX);
    }
}
