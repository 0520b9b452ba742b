//! API key resolution: environment, then secret.json, then an interactive prompt.

use crate::prompter::Prompter;
use oracle_core::output::{OutputSink, Style, Tone};

pub const QUIT_SENTINEL: &str = "q";

/// Where the key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    SecretFile,
    Prompt,
}

/// Non-interactive key candidates gathered at startup.
#[derive(Debug, Clone, Default)]
pub struct ApiKeySources {
    /// Name of the environment variable, for messages.
    pub env_var: String,
    pub env_value: Option<String>,
    pub secret_value: Option<String>,
}

impl ApiKeySources {
    /// Reads `env_var` from the process environment.
    pub fn from_env(env_var: &str, secret_value: Option<String>) -> Self {
        Self {
            env_var: env_var.to_string(),
            env_value: std::env::var(env_var).ok(),
            secret_value,
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolves the key, prompting until a non-empty key or the quit sentinel is entered.
pub fn resolve_api_key(
    sources: &ApiKeySources,
    prompter: &mut dyn Prompter,
    sink: &mut dyn OutputSink,
) -> Option<(String, KeySource)> {
    if let Some(key) = non_empty(sources.env_value.as_ref()) {
        sink.write(
            "✅ Gemini API key detected from environment.",
            Style::new(Tone::Success),
        );
        return Some((key, KeySource::Environment));
    }

    if let Some(key) = non_empty(sources.secret_value.as_ref()) {
        sink.write(
            "✅ Gemini API key loaded from secret.json.",
            Style::new(Tone::Success),
        );
        return Some((key, KeySource::SecretFile));
    }

    sink.write(
        &format!("{} environment variable not found.", sources.env_var),
        Style::new(Tone::Warning),
    );
    loop {
        let input = prompter.read_line(&format!(
            "Please paste your Gemini API Key (or type '{QUIT_SENTINEL}' to quit): "
        ))?;
        let key = input.trim();

        if key.eq_ignore_ascii_case(QUIT_SENTINEL) {
            return None;
        }
        if !key.is_empty() {
            return Some((key.to_string(), KeySource::Prompt));
        }
        sink.write("API Key cannot be empty.", Style::new(Tone::Error));
    }
}
