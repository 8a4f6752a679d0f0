//! Persistence of history snapshots.
//!
//! Stores hold [`SnapshotRecord`] lists by name. The records are the wire
//! shape of history entries, so a history saved here can be sent to a
//! remote store unchanged.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vectorkit_core::Result;

use crate::history::SnapshotRecord;

/// History file format version
const HISTORY_FORMAT_VERSION: &str = "1.0";

/// Persists named snapshot lists.
pub trait SnapshotStore {
    fn save(&mut self, name: &str, records: &[SnapshotRecord]) -> Result<()>;

    /// Records saved under `name`, `None` if nothing was saved.
    fn load(&self, name: &str) -> Result<Option<Vec<SnapshotRecord>>>;

    /// Returns whether something was deleted.
    fn delete(&mut self, name: &str) -> Result<bool>;

    fn list(&self) -> Result<Vec<String>>;
}

/// On-disk layout of one history file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryFile {
    pub version: String,
    pub name: String,
    pub saved: DateTime<Utc>,
    pub snapshots: Vec<SnapshotRecord>,
}

impl HistoryFile {
    pub fn new(name: &str, snapshots: Vec<SnapshotRecord>) -> Self {
        Self {
            version: HISTORY_FORMAT_VERSION.to_string(),
            name: name.to_string(),
            saved: Utc::now(),
            snapshots,
        }
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Reads the snapshot records from a history file.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<SnapshotRecord>> {
    Ok(HistoryFile::load_from_file(path)?.snapshots)
}

/// One JSON file per history name inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File used for `name`; characters unsafe in file names become `_`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let mut file: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if file.is_empty() {
            file.push_str("history");
        }
        self.dir.join(format!("{file}.json"))
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&mut self, name: &str, records: &[SnapshotRecord]) -> Result<()> {
        HistoryFile::new(name, records.to_vec()).save_to_file(self.path_for(name))
    }

    fn load(&self, name: &str) -> Result<Option<Vec<SnapshotRecord>>> {
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(None);
        }
        read_records(path).map(Some)
    }

    fn delete(&mut self, name: &str) -> Result<bool> {
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Store kept in memory, for tests and hosts without a disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    histories: HashMap<String, Vec<SnapshotRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, name: &str, records: &[SnapshotRecord]) -> Result<()> {
        self.histories.insert(name.to_string(), records.to_vec());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Option<Vec<SnapshotRecord>>> {
        Ok(self.histories.get(name).cloned())
    }

    fn delete(&mut self, name: &str) -> Result<bool> {
        Ok(self.histories.remove(name).is_some())
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.histories.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
