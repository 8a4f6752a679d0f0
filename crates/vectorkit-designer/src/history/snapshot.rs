//! History entries and their persisted record form.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Index of a full snapshot within one history sequence.
///
/// Only the history module can make one, and only for an entry that is
/// full, so a differential snapshot can never point at another diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FullIndex(usize);

impl FullIndex {
    /// Returns the index of `entries[index]` if that entry is full.
    pub(super) fn of(entries: &[HistorySnapshot], index: usize) -> Option<FullIndex> {
        entries
            .get(index)
            .filter(|entry| !entry.is_diff())
            .map(|_| FullIndex(index))
    }

    /// The same entry after `removed` entries were pruned from the front.
    pub(super) fn shifted_down(self, removed: usize) -> FullIndex {
        FullIndex(self.0 - removed)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    Full,
    Diff { base: FullIndex },
}

/// One compressed entry of the history sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    pub(super) payload: String,
    pub(super) timestamp: i64,
    pub(super) object_count: Option<usize>,
    pub(super) kind: SnapshotKind,
}

impl HistorySnapshot {
    pub(super) fn new(payload: String, object_count: usize, kind: SnapshotKind) -> Self {
        Self {
            payload,
            timestamp: Utc::now().timestamp_millis(),
            object_count: Some(object_count),
            kind,
        }
    }

    /// Compressed, base64 encoded payload.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn object_count(&self) -> Option<usize> {
        self.object_count
    }

    pub fn kind(&self) -> SnapshotKind {
        self.kind
    }

    pub fn is_diff(&self) -> bool {
        matches!(self.kind, SnapshotKind::Diff { .. })
    }

    pub fn base_index(&self) -> Option<usize> {
        match self.kind {
            SnapshotKind::Full => None,
            SnapshotKind::Diff { base } => Some(base.get()),
        }
    }

    pub fn to_record(&self) -> SnapshotRecord {
        SnapshotRecord {
            compressed: self.payload.clone(),
            timestamp: self.timestamp,
            object_count: self.object_count,
            is_diff: self.is_diff(),
            base_index: self.base_index(),
        }
    }
}

/// Wire and storage shape of one history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    pub compressed: String,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_count: Option<usize>,
    pub is_diff: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_index: Option<usize>,
}
