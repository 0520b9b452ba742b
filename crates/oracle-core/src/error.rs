//! Error types for the Dream Oracle.

use thiserror::Error;

/// A shared error type for the entire Dream Oracle.
///
/// The variants follow the failure taxonomy of the application:
/// permanent API rejections, transient network failures that survived every
/// retry, unparseable success bodies, and local I/O or configuration problems.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The remote API answered with a non-2xx status. Never retried.
    #[error("API Error: {reason}")]
    Api { status: u16, reason: String },

    /// No response could be obtained, even after retrying.
    #[error("Network Error: {reason}")]
    Network { reason: String },

    /// A 2xx response whose body was not valid JSON on the final attempt.
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// IO error (journal file operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OracleError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Api error
    pub fn api(status: u16, reason: impl Into<String>) -> Self {
        Self::Api {
            status,
            reason: reason.into(),
        }
    }

    /// Creates a Network error
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
        }
    }

    /// Creates a Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a permanent API error
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Only connection-level failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        self.is_network()
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for OracleError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for OracleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for OracleError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, OracleError>`.
pub type Result<T> = std::result::Result<T, OracleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_failure_kind() {
        assert_eq!(
            OracleError::api(400, "Bad Request").to_string(),
            "API Error: Bad Request"
        );
        assert_eq!(
            OracleError::network("connection refused").to_string(),
            "Network Error: connection refused"
        );
    }

    #[test]
    fn test_only_network_errors_are_retryable() {
        assert!(OracleError::network("timeout").is_retryable());
        assert!(!OracleError::api(500, "Internal Server Error").is_retryable());
        assert!(!OracleError::parse("eof").is_retryable());
        assert!(!OracleError::io("denied").is_retryable());
    }

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let err: OracleError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        assert!(err.is_io());
        assert!(err.to_string().contains("PermissionDenied"));
    }
}
