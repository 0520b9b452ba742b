//! Dream journal domain module.
//!
//! # Module Structure
//!
//! - `model`: `DreamEntry` and the text sanitizer applied before persisting
//! - `repository`: Repository trait for the append-only journal

mod model;
mod repository;

// Re-export public API
pub use model::{DreamEntry, ENTRY_SEPARATOR, TIMESTAMP_FORMAT, sanitize_text};
pub use repository::{ClearOutcome, Confirmation, JournalRepository};
