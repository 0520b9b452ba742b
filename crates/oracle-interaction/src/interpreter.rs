//! Response Interpreter: turns a `generateContent` body into display text.
//!
//! [`interpret`] is total. Whatever shape the JSON has, the caller gets a
//! non-empty, human-readable string; malformed bodies are logged and mapped to
//! a fixed fallback instead of being propagated.

use serde_json::Value;

pub const NORMAL_FINISH: &str = "STOP";
pub const TRUNCATED_FINISH: &str = "MAX_TOKENS";

pub const TRUNCATED_MESSAGE: &str =
    "The Oracle's vision was too vast and was cut short. (MAX_TOKENS).";
pub const UNCLEAR_MESSAGE: &str =
    "The Oracle spoke, but the vision was unclear (could not parse text).";
pub const CRITICAL_MESSAGE: &str =
    "A critical error occurred while parsing the Oracle's response.";

/// What the response said, before it is rendered for the dreamer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    /// Normal completion with text.
    Vision(String),
    /// Generation hit the output token limit.
    Truncated,
    /// Generation stopped for another reason (safety, recitation, ...).
    Blocked(String),
    /// The structure was fine but carried no text.
    Unclear,
    /// The structure was not a usable `generateContent` response.
    Unparseable(ParseFailure),
}

/// Which part of the response envelope was missing or malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    NotAnObject,
    MissingCandidates,
    CandidateNotAnObject,
    MissingContent,
    MissingParts,
    PartNotAnObject,
}

impl Interpretation {
    /// The fixed text shown for each outcome; `Vision` text is returned unmodified.
    pub fn display_text(&self) -> String {
        match self {
            Self::Vision(text) => text.clone(),
            Self::Truncated => TRUNCATED_MESSAGE.to_string(),
            Self::Blocked(reason) => format!("The Oracle's vision was blocked by: {reason}."),
            Self::Unclear => UNCLEAR_MESSAGE.to_string(),
            Self::Unparseable(_) => CRITICAL_MESSAGE.to_string(),
        }
    }

    pub fn is_vision(&self) -> bool {
        matches!(self, Self::Vision(_))
    }
}

/// Classifies a response body.
pub fn classify_response(body: &Value) -> Interpretation {
    let candidate = match first_candidate(body) {
        Ok(candidate) => candidate,
        Err(failure) => return Interpretation::Unparseable(failure),
    };

    match candidate.get("finishReason") {
        None | Some(Value::Null) => {}
        Some(Value::String(reason)) if reason == NORMAL_FINISH => {}
        Some(Value::String(reason)) if reason.is_empty() => {}
        Some(Value::String(reason)) if reason == TRUNCATED_FINISH => {
            return Interpretation::Truncated;
        }
        Some(Value::String(reason)) => return Interpretation::Blocked(reason.clone()),
        Some(other) => return Interpretation::Blocked(other.to_string()),
    }

    let part = match first_part(candidate) {
        Ok(part) => part,
        Err(failure) => return Interpretation::Unparseable(failure),
    };

    match part.get("text").and_then(Value::as_str) {
        Some(text) if !text.is_empty() => Interpretation::Vision(text.to_string()),
        _ => Interpretation::Unclear,
    }
}

/// Returns the text to show the dreamer. Never fails.
pub fn interpret(body: &Value) -> String {
    let interpretation = classify_response(body);
    match &interpretation {
        Interpretation::Unparseable(failure) => {
            tracing::error!(?failure, raw = %body, "Error parsing response");
        }
        Interpretation::Truncated | Interpretation::Blocked(_) => {
            tracing::warn!(?interpretation, "Response stopped early");
        }
        Interpretation::Unclear => tracing::warn!("Response carried no text"),
        Interpretation::Vision(_) => {}
    }
    interpretation.display_text()
}

fn first_candidate(body: &Value) -> Result<&Value, ParseFailure> {
    let body = body.as_object().ok_or(ParseFailure::NotAnObject)?;
    let candidate = body
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .ok_or(ParseFailure::MissingCandidates)?;

    if candidate.is_object() {
        Ok(candidate)
    } else {
        Err(ParseFailure::CandidateNotAnObject)
    }
}

fn first_part(candidate: &Value) -> Result<&Value, ParseFailure> {
    let content = match candidate.get("content") {
        None => return Err(ParseFailure::MissingParts),
        Some(content) if content.is_object() => content,
        Some(_) => return Err(ParseFailure::MissingContent),
    };

    let part = content
        .get("parts")
        .and_then(Value::as_array)
        .and_then(|parts| parts.first())
        .ok_or(ParseFailure::MissingParts)?;

    if part.is_object() {
        Ok(part)
    } else {
        Err(ParseFailure::PartNotAnObject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(candidate: Value) -> Value {
        json!({ "candidates": [candidate] })
    }

    #[test]
    fn test_stop_with_text_is_returned_unmodified() {
        let text = "The ocean is the unconscious; flight is liberation.";
        let body = response(json!({
            "finishReason": "STOP",
            "content": { "role": "model", "parts": [{ "text": text }] }
        }));

        assert_eq!(interpret(&body), text);
    }

    #[test]
    fn test_missing_finish_reason_still_reads_text() {
        let body = response(json!({ "content": { "parts": [{ "text": "  spaced  " }] } }));
        assert_eq!(interpret(&body), "  spaced  ");
    }

    #[test]
    fn test_max_tokens_ignores_partial_text() {
        let body = response(json!({
            "finishReason": "MAX_TOKENS",
            "content": { "parts": [{ "text": "The ocean is" }] }
        }));

        assert_eq!(interpret(&body), TRUNCATED_MESSAGE);
    }

    #[test]
    fn test_other_finish_reason_is_embedded() {
        let body = response(json!({ "finishReason": "SAFETY" }));
        assert_eq!(
            interpret(&body),
            "The Oracle's vision was blocked by: SAFETY."
        );
    }

    #[test]
    fn test_missing_or_empty_text_is_unclear() {
        let no_text = response(json!({ "finishReason": "STOP", "content": { "parts": [{}] } }));
        let empty_text = response(json!({ "content": { "parts": [{ "text": "" }] } }));

        assert_eq!(interpret(&no_text), UNCLEAR_MESSAGE);
        assert_eq!(interpret(&empty_text), UNCLEAR_MESSAGE);
    }

    #[test]
    fn test_structural_failures_use_critical_message() {
        let cases = [
            (json!({}), ParseFailure::MissingCandidates),
            (json!({ "candidates": [] }), ParseFailure::MissingCandidates),
            (json!({ "candidates": "nope" }), ParseFailure::MissingCandidates),
            (json!([1, 2]), ParseFailure::NotAnObject),
            (json!(null), ParseFailure::NotAnObject),
            (json!({ "candidates": [42] }), ParseFailure::CandidateNotAnObject),
            (response(json!({})), ParseFailure::MissingParts),
            (response(json!({ "content": "text" })), ParseFailure::MissingContent),
            (response(json!({ "content": { "parts": [] } })), ParseFailure::MissingParts),
            (response(json!({ "content": { "parts": ["text"] } })), ParseFailure::PartNotAnObject),
        ];

        for (body, expected) in cases {
            assert_eq!(
                classify_response(&body),
                Interpretation::Unparseable(expected),
                "body: {body}"
            );
            assert_eq!(interpret(&body), CRITICAL_MESSAGE, "body: {body}");
        }
    }

    #[test]
    fn test_interpret_is_total_and_never_empty() {
        let bodies = [
            json!(true),
            json!("string"),
            json!(3.5),
            json!({ "candidates": [{ "finishReason": 7 }] }),
            json!({ "candidates": [{ "finishReason": null, "content": { "parts": [{ "text": 9 }] } }] }),
            json!({ "candidates": [{ "content": { "parts": { "text": "not a list" } } }] }),
        ];

        for body in bodies {
            assert!(!interpret(&body).is_empty(), "body: {body}");
        }
    }
}
