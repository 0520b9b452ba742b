//! Flat-file implementation of [`JournalRepository`].
//!
//! The journal is a single UTF-8 text file. Each operation opens, uses and
//! releases the file on its own; nothing is cached between calls.

use async_trait::async_trait;
use oracle_core::error::Result;
use oracle_core::journal::{ClearOutcome, Confirmation, DreamEntry, JournalRepository};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

pub struct FileJournalRepository {
    path: PathBuf,
}

impl FileJournalRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl JournalRepository for FileJournalRepository {
    async fn append(&self, entry: &DreamEntry) -> Result<()> {
        let block = entry.to_block();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(block.as_bytes()).await?;
        file.flush().await?;

        tracing::info!(
            path = %self.path.display(),
            bytes = block.len(),
            "Appended dream to journal"
        );
        Ok(())
    }

    async fn read_all(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self) -> Result<bool> {
        Ok(fs::try_exists(&self.path).await?)
    }

    async fn clear(&self, confirmation: Confirmation) -> Result<ClearOutcome> {
        if !self.exists().await? {
            return Ok(ClearOutcome::NothingToClear);
        }
        if confirmation == Confirmation::Declined {
            return Ok(ClearOutcome::Declined);
        }

        match fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "Journal cleared");
                Ok(ClearOutcome::Cleared)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ClearOutcome::NothingToClear),
            Err(e) => Err(e.into()),
        }
    }
}
