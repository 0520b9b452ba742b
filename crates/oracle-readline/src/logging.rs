//! File logging setup.
//!
//! Logs go to a daily rolling file under the config directory so they never
//! interleave with the interactive terminal output.

use oracle_infrastructure::OraclePaths;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_FILE_PREFIX: &str = "dream-oracle.log";

/// Installs the global subscriber. Returns `false` when logging stays disabled.
pub fn init() -> bool {
    let Ok(logs_dir) = OraclePaths::logs_dir() else {
        return false;
    };
    if std::fs::create_dir_all(&logs_dir).is_err() {
        return false;
    }

    let appender = tracing_appender::rolling::daily(&logs_dir, LOG_FILE_PREFIX);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(appender).with_ansi(false))
        .try_init()
        .is_ok()
}
