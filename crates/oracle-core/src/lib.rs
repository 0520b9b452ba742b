pub mod config;
pub mod error;
pub mod journal;
pub mod output;
pub mod prompt;

// Re-export common error type
pub use error::OracleError;
