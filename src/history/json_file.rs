use serde::Deserialize;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

use super::types::{History, Snapshot, FORMAT_VERSION};
use super::{file_name, validate_tag, HistoryStore};
use crate::error::{LoggerError, Result};

#[derive(Deserialize)]
struct Header {
    version: u32,
}

/// One JSON document per group tag inside a run directory.
///
/// Each append rewrites the whole document through a temp file and a rename,
/// so a crash mid-write leaves the previous history intact. Appends to the
/// same file are serialized; different files do not contend.
#[derive(Debug)]
pub struct JsonHistoryStore {
    dir: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl JsonHistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, tag: &str) -> PathBuf {
        self.dir.join(file_name(tag))
    }

    // Keyed by file name, so tags sharing a file share a lock.
    fn tag_lock(&self, tag: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(file_name(tag)).or_default().clone()
    }

    fn read(&self, tag: &str, path: &Path) -> Result<Option<History>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let corrupt = |e: serde_json::Error| LoggerError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        let header: Header = serde_json::from_str(&content).map_err(corrupt)?;
        if header.version != FORMAT_VERSION {
            return Err(LoggerError::UnsupportedVersion {
                path: path.to_path_buf(),
                found: header.version,
            });
        }
        let history: History = serde_json::from_str(&content).map_err(corrupt)?;
        if history.tag != tag {
            return Err(LoggerError::Corrupt {
                path: path.to_path_buf(),
                reason: format!("holds history for tag `{}`, not `{}`", history.tag, tag),
            });
        }
        Ok(Some(history))
    }

    fn write(&self, path: &Path, history: &History) -> Result<()> {
        let temp_path = path.with_extension("json.tmp");
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, history)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writer.flush()?;
        writer.get_ref().sync_all()?;

        fs::rename(&temp_path, path)?;
        Ok(())
    }
}

impl HistoryStore for JsonHistoryStore {
    fn append(&self, tag: &str, snapshot: &Snapshot) -> Result<()> {
        validate_tag(tag)?;
        let lock = self.tag_lock(tag);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let path = self.path_for(tag);
        let mut history = self.read(tag, &path)?.unwrap_or_else(|| History::new(tag));
        history.merge(snapshot);
        self.write(&path, &history)?;

        debug!(tag, step_idx = snapshot.step_idx, path = %path.display(), "history appended");
        Ok(())
    }

    fn load(&self, tag: &str) -> Result<Option<History>> {
        validate_tag(tag)?;
        let lock = self.tag_lock(tag);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read(tag, &self.path_for(tag))
    }
}
