//! Loads `config.toml` into [`OracleConfig`].

use crate::paths::OraclePaths;
use oracle_core::config::OracleConfig;
use oracle_core::error::{OracleError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only access to the application configuration file.
///
/// A missing or empty file is not an error: every setting has a default.
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the default location (`<config dir>/dream-oracle/config.toml`).
    pub fn new() -> Result<Self> {
        let path = OraclePaths::config_file().map_err(|e| OracleError::config(e.to_string()))?;
        Ok(Self { path })
    }

    /// Creates a ConfigService with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(OracleConfig)`: parsed file, or defaults when it is absent/empty
    /// - `Err(OracleError::Config)`: the file exists but could not be read or parsed
    pub fn load(&self) -> Result<OracleConfig> {
        if !self.path.exists() {
            tracing::debug!("No config file at {}, using defaults", self.path.display());
            return Ok(OracleConfig::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            OracleError::config(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        if content.trim().is_empty() {
            return Ok(OracleConfig::default());
        }

        toml::from_str(&content).map_err(|e| {
            OracleError::config(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        assert_eq!(service.load().unwrap(), OracleConfig::default());
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "  \n").unwrap();

        assert_eq!(
            ConfigService::with_path(path).load().unwrap(),
            OracleConfig::default()
        );
    }

    #[test]
    fn test_load_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "max_retries = 1\ntimeout_secs = 10\n").unwrap();

        let config = ConfigService::with_path(path).load().unwrap();
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.model, OracleConfig::default().model);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "max_retries = \"three\"").unwrap();

        let err = ConfigService::with_path(path).load().unwrap_err();
        assert!(matches!(err, OracleError::Config(_)));
    }
}
