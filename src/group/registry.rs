use std::collections::HashMap;

use crate::error::{LoggerError, Result};
use crate::history::file_name;

/// Tracks the group tags owned by one logger.
///
/// Holds the next auto-naming index and the live group count, so independent
/// loggers never share naming state. Two live tags never map to the same
/// history file.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    next_index: usize,
    // history file name -> tag holding it
    tags: HashMap<String, String>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `tag`, or the first free `groupNN` name when none is given.
    /// Does not reserve anything.
    pub fn resolve_tag(&self, tag: Option<&str>) -> String {
        if let Some(tag) = tag {
            return tag.to_string();
        }
        let mut i = self.next_index;
        loop {
            let candidate = format!("group{:02}", i);
            if !self.tags.contains_key(&file_name(&candidate)) {
                return candidate;
            }
            i += 1;
        }
    }

    /// Reserves `tag`. Every registration advances the auto-naming index.
    ///
    /// Fails with `DuplicateGroupTag` when `tag`, or a tag sharing its history
    /// file (`"Train"` and `"train"`), is already live.
    pub fn register(&mut self, tag: &str) -> Result<()> {
        let key = file_name(tag);
        if self.tags.contains_key(&key) {
            return Err(LoggerError::DuplicateGroupTag(tag.to_string()));
        }
        self.tags.insert(key, tag.to_string());
        self.next_index += 1;
        Ok(())
    }

    /// Frees `tag`. Returns false if it was not registered.
    pub fn release(&mut self, tag: &str) -> bool {
        let key = file_name(tag);
        if self.tags.get(&key).map(String::as_str) != Some(tag) {
            return false;
        }
        self.tags.remove(&key);
        true
    }

    /// True only for the exact tag that was registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.get(&file_name(tag)).map(String::as_str) == Some(tag)
    }

    /// True when `tag` or a tag sharing its history file is live.
    pub fn is_taken(&self, tag: &str) -> bool {
        self.tags.contains_key(&file_name(tag))
    }

    pub fn live_count(&self) -> usize {
        self.tags.len()
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }
}
