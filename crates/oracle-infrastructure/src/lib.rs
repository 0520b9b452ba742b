pub mod config_service;
pub mod file_journal_repository;
pub mod paths;
pub mod secret_storage;

pub use crate::config_service::ConfigService;
pub use crate::file_journal_repository::FileJournalRepository;
pub use crate::paths::OraclePaths;
pub use crate::secret_storage::{SecretStorage, SecretStorageError};
