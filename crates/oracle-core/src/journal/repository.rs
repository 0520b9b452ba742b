//! Journal repository trait.
//!
//! Defines the interface for the append-only dream journal.

use super::model::DreamEntry;
use crate::error::Result;

/// The caller's answer to "erase all saved dreams?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    /// Only a literal `y` (any case) confirms.
    pub fn from_answer(answer: &str) -> Self {
        if answer.trim().eq_ignore_ascii_case("y") {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

/// What `clear` actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    Declined,
    NothingToClear,
}

/// An abstract repository for the dream journal.
///
/// The journal is append-only: entries are never edited or removed one by one,
/// the only deletion is erasing the whole journal.
#[async_trait::async_trait]
pub trait JournalRepository: Send + Sync {
    /// Appends one entry, creating the journal if needed.
    async fn append(&self, entry: &DreamEntry) -> Result<()>;

    /// Returns the full journal text, or `None` when no journal exists yet.
    async fn read_all(&self) -> Result<Option<String>>;

    /// Whether a journal exists. Fails when that cannot be determined.
    async fn exists(&self) -> Result<bool>;

    /// Erases the whole journal.
    ///
    /// # Returns
    ///
    /// - `Ok(ClearOutcome::NothingToClear)`: no journal existed
    /// - `Ok(ClearOutcome::Declined)`: the journal was left untouched
    /// - `Ok(ClearOutcome::Cleared)`: the journal was deleted
    /// - `Err(OracleError)`: deletion failed
    async fn clear(&self, confirmation: Confirmation) -> Result<ClearOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_from_answer() {
        assert_eq!(Confirmation::from_answer("y"), Confirmation::Confirmed);
        assert_eq!(Confirmation::from_answer("Y "), Confirmation::Confirmed);
        assert_eq!(Confirmation::from_answer("yes"), Confirmation::Declined);
        assert_eq!(Confirmation::from_answer(""), Confirmation::Declined);
        assert_eq!(Confirmation::from_answer("n"), Confirmation::Declined);
    }
}
