//! Append-by-merge snapshot history, one document per group tag.

pub mod in_memory;
pub mod json_file;
pub mod types;

pub use in_memory::InMemoryHistoryStore;
pub use json_file::JsonHistoryStore;
pub use types::*;

use crate::error::{LoggerError, Result};

/// Durable record of snapshots keyed by group tag.
pub trait HistoryStore: Send + Sync {
    /// Loads the tag's history (empty if absent), merges `snapshot`, and persists
    /// the whole history back. A missing history is not an error; an unreadable
    /// one is, so nothing gets overwritten.
    fn append(&self, tag: &str, snapshot: &Snapshot) -> Result<()>;

    /// `None` when nothing was ever appended for `tag`.
    fn load(&self, tag: &str) -> Result<Option<History>>;
}

/// File name for a tag: spaces become underscores, lowercased, `.json`.
///
/// Tags differing only in case or spaces map to the same file.
pub fn file_name(tag: &str) -> String {
    format!("{}.json", tag.replace(' ', "_").to_lowercase())
}

/// Rejects tags that are blank or would resolve outside the run directory.
pub fn validate_tag(tag: &str) -> Result<()> {
    if tag.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration("group tag is empty".to_string()));
    }
    if tag.contains(['/', '\\']) || tag.contains("..") {
        return Err(LoggerError::InvalidConfiguration(format!(
            "group tag `{}` must not contain path separators or `..`",
            tag
        )));
    }
    Ok(())
}
