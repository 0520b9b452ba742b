mod api_key;
mod display;
mod logging;
mod prompter;
mod session;

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;

use oracle_core::config::OracleConfig;
use oracle_infrastructure::{ConfigService, FileJournalRepository, SecretStorage, SecretStorageError};
use oracle_interaction::{ReqwestTransport, RequestExecutor};

use crate::api_key::ApiKeySources;
use crate::display::{ConsoleObserver, TerminalSink};
use crate::prompter::ReadlinePrompter;
use crate::session::Session;

fn load_config() -> Result<OracleConfig> {
    match ConfigService::new() {
        Ok(service) => {
            tracing::info!("Loading config from {}", service.path().display());
            Ok(service.load()?)
        }
        Err(e) => {
            tracing::warn!("Config location unavailable ({}), using defaults", e);
            Ok(OracleConfig::default())
        }
    }
}

fn secret_api_key() -> Option<String> {
    let storage = SecretStorage::new().ok()?;
    match storage.gemini_api_key() {
        Ok(key) => key,
        Err(SecretStorageError::NotFound(_)) => None,
        Err(e) => {
            tracing::warn!("Ignoring {}: {}", storage.path().display(), e);
            None
        }
    }
}

/// Entry point for the Dream Oracle.
///
/// Single-threaded on purpose: one dreamer, one request at a time, and the
/// retry backoff simply blocks the menu.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    if !logging::init() {
        eprintln!("{}", "Logging disabled: could not prepare the log directory.".bright_black());
    }

    let config = load_config().context("Could not load configuration")?;
    tracing::info!(model = %config.model, journal = %config.journal_path.display(), "Starting");

    let key_sources = ApiKeySources::from_env(&config.api_key_env, secret_api_key());
    let executor = RequestExecutor::new(Arc::new(ReqwestTransport::new()))
        .with_observer(Arc::new(ConsoleObserver));
    let journal = Arc::new(FileJournalRepository::new(config.journal_path.clone()));
    let prompter = ReadlinePrompter::new()?;
    let sink = TerminalSink::new(config.typing_delay());

    let mut session = Session::new(config, key_sources, executor, journal, prompter, sink);
    session.run().await;

    tracing::info!("Session ended");
    Ok(())
}
