use std::collections::HashMap;
use std::sync::Mutex;

use super::types::{History, Snapshot};
use super::HistoryStore;
use crate::error::Result;

/// Keeps histories in process memory. Same merge rules as the file store.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    histories: Mutex<HashMap<String, History>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> Vec<String> {
        let histories = self.histories.lock().unwrap_or_else(|e| e.into_inner());
        let mut tags: Vec<String> = histories.keys().cloned().collect();
        tags.sort();
        tags
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn append(&self, tag: &str, snapshot: &Snapshot) -> Result<()> {
        let mut histories = self.histories.lock().unwrap_or_else(|e| e.into_inner());
        histories
            .entry(tag.to_string())
            .or_insert_with(|| History::new(tag))
            .merge(snapshot);
        Ok(())
    }

    fn load(&self, tag: &str) -> Result<Option<History>> {
        let histories = self.histories.lock().unwrap_or_else(|e| e.into_inner());
        Ok(histories.get(tag).cloned())
    }
}
