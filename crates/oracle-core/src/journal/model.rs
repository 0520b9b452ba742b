use chrono::Local;

/// Line written after every journal block: sixty `=` characters.
pub const ENTRY_SEPARATOR: &str =
    "============================================================";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Strips NUL bytes and surrounding whitespace.
pub fn sanitize_text(text: &str) -> String {
    text.replace('\0', "").trim().to_string()
}

/// A single dream/interpretation pair as recorded in the journal.
///
/// Entries are immutable once built; both texts are sanitized on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DreamEntry {
    pub timestamp: String,
    pub dream_text: String,
    pub interpretation_text: String,
}

impl DreamEntry {
    /// Creates an entry stamped with the current local time.
    pub fn new(dream: &str, interpretation: &str) -> Self {
        Self::with_timestamp(
            Local::now().format(TIMESTAMP_FORMAT).to_string(),
            dream,
            interpretation,
        )
    }

    pub fn with_timestamp(timestamp: impl Into<String>, dream: &str, interpretation: &str) -> Self {
        Self {
            timestamp: timestamp.into(),
            dream_text: sanitize_text(dream),
            interpretation_text: sanitize_text(interpretation),
        }
    }

    /// Renders the block appended to the journal file.
    pub fn to_block(&self) -> String {
        format!(
            "Time: {}\nDream: {}\n\nInterpretation:\n{}\n{}\n\n",
            self.timestamp, self.dream_text, self.interpretation_text, ENTRY_SEPARATOR
        )
    }
}
