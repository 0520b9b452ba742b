//! GeminiClient - asks the Gemini REST API to interpret a dream.
//!
//! Builds the `generateContent` payload around the Oracle prompt, sends it
//! through the [`RequestExecutor`] and hands the body to the interpreter.

use crate::executor::RequestExecutor;
use crate::interpreter;
use oracle_core::config::OracleConfig;
use oracle_core::error::Result;
use oracle_core::prompt::build_prompt;
use serde::Serialize;
use std::time::Duration;

/// Client for a single `models/{model}:generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    executor: RequestExecutor,
    api_key: String,
    url: String,
    temperature: f32,
    max_output_tokens: u32,
    timeout: Duration,
    max_retries: u32,
}

impl GeminiClient {
    /// Creates a client from configuration. The executor's backoff is taken from `config`.
    pub fn new(executor: RequestExecutor, api_key: impl Into<String>, config: &OracleConfig) -> Self {
        Self {
            executor: executor.with_backoff_step(config.retry_backoff()),
            api_key: api_key.into(),
            url: config.generate_content_url(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            timeout: config.timeout(),
            max_retries: config.max_retries,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Builds the request body for a dream.
    pub fn build_request(&self, dream: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: build_prompt(dream),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        }
    }

    /// Returns the Oracle's interpretation, or the executor's failure.
    ///
    /// Malformed response bodies never fail here; they become fallback text.
    pub async fn interpret_dream(&self, dream: &str) -> Result<String> {
        let request = self.build_request(dream);
        let body = self
            .executor
            .execute(
                &self.url,
                &self.api_key,
                &request,
                self.timeout,
                self.max_retries,
            )
            .await?;

        Ok(interpreter::interpret(&body))
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ReqwestTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn client() -> GeminiClient {
        let executor = RequestExecutor::new(Arc::new(ReqwestTransport::new()));
        GeminiClient::new(executor, "key", &OracleConfig::default())
    }

    #[test]
    fn test_request_body_shape() {
        let request = client().build_request("I was flying");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["role"], json!("user"));
        assert_eq!(
            value["contents"][0]["parts"][0]["text"],
            json!(build_prompt("I was flying"))
        );
        assert_eq!(value["generationConfig"]["maxOutputTokens"], json!(2048));
        assert!((value["generationConfig"]["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_url_uses_configured_model() {
        assert_eq!(
            client().url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-flash-latest:generateContent"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", client());
        assert!(!rendered.contains("\"key\""));
        assert!(rendered.contains("[REDACTED]"));
    }
}
