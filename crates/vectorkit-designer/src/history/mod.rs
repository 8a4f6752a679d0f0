//! Undo/redo history built from compressed scene snapshots.
//!
//! Every committed mutation appends one entry. Most entries hold the full
//! serialized scene; an entry that directly follows a full one may instead
//! hold a diff against it when the diff is small enough. Diffs never point
//! at other diffs, so restoring any step touches at most two entries.

mod compression;
mod diff;
mod snapshot;

pub use compression::{compress, decompress};
pub use diff::{BackgroundChange, SceneDiff, SceneState};
pub use snapshot::{FullIndex, HistorySnapshot, SnapshotKind, SnapshotRecord};

use tracing::debug;
use vectorkit_core::{HistoryError, Result, SceneError};
use vectorkit_settings::HistorySettings;

use crate::scene::SceneGraph;

/// Bytes assumed per stored character when estimating memory use.
const BYTES_PER_CHAR: usize = 2;

/// Bounded linear undo/redo history.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    entries: Vec<HistorySnapshot>,
    current: Option<usize>,
    settings: HistorySettings,
    /// Entries dropped from the front since the last `clear`, so checkpoint
    /// spacing stays stable once the history is full.
    pruned: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::with_settings(HistorySettings::default())
    }

    pub fn with_settings(settings: HistorySettings) -> Self {
        Self {
            entries: Vec::new(),
            current: None,
            settings,
            pruned: 0,
        }
    }

    pub fn settings(&self) -> &HistorySettings {
        &self.settings
    }

    /// Captures the scene as a new history step.
    ///
    /// Any redo branch after the current step is replaced by the new entry.
    /// On error the history is left as it was.
    pub fn save_state<S: SceneGraph>(&mut self, scene: &S) -> Result<()> {
        let text = scene.serialize_scene()?;
        let state = SceneState::parse(&text)
            .map_err(|reason| SceneError::Serialization { reason })?;

        let index = self.current.map_or(0, |current| current + 1);
        let checkpoint = self.settings.checkpoint_interval.max(1);
        let entry = if index == 0 || (self.pruned + index) % checkpoint == 0 {
            debug!("History step {}: checkpoint", index);
            self.full_entry(&text, state.objects.len())?
        } else {
            match self.diff_entry(index, &text, &state)? {
                Some(entry) => entry,
                None => self.full_entry(&text, state.objects.len())?,
            }
        };

        // the redo branch is only dropped once the new entry exists
        self.entries.truncate(index);
        self.entries.push(entry);
        self.enforce_limit()?;
        self.current = Some(self.entries.len() - 1);
        Ok(())
    }

    fn full_entry(&self, text: &str, object_count: usize) -> Result<HistorySnapshot> {
        let payload = compress(text)?;
        Ok(HistorySnapshot::new(payload, object_count, SnapshotKind::Full))
    }

    /// Diff entry against the previous entry, if that entry is full and the
    /// compressed diff stays under the size threshold.
    fn diff_entry(
        &self,
        index: usize,
        text: &str,
        state: &SceneState,
    ) -> Result<Option<HistorySnapshot>> {
        let Some(base) = index.checked_sub(1).and_then(|i| FullIndex::of(&self.entries, i))
        else {
            debug!("History step {}: previous entry is a diff, storing full", index);
            return Ok(None);
        };
        let base_state = self.decode_state(index, base.get())?;
        let Some(diff) = SceneDiff::between(&base_state, state) else {
            debug!("History step {}: change not expressible as diff", index);
            return Ok(None);
        };

        let diff_text = serde_json::to_string(&diff)?;
        let payload = compress(&diff_text)?;
        let limit = self.settings.diff_threshold * text.len() as f64;
        if payload.len() as f64 > limit {
            debug!(
                "History step {}: diff of {} chars over limit {:.0}, storing full",
                index,
                payload.len(),
                limit
            );
            return Ok(None);
        }

        debug!(
            "History step {}: diff of {} chars against step {}",
            index,
            payload.len(),
            base.get()
        );
        Ok(Some(HistorySnapshot::new(
            payload,
            state.objects.len(),
            SnapshotKind::Diff { base },
        )))
    }

    /// Drops entries from the front until the sequence fits `max_size`.
    fn enforce_limit(&mut self) -> Result<()> {
        let max_size = self.settings.max_size.max(1);
        while self.entries.len() > max_size {
            self.prune_front()?;
        }
        Ok(())
    }

    fn prune_front(&mut self) -> Result<()> {
        for i in 1..self.entries.len() {
            if self.entries[i].base_index() == Some(0) {
                let text = self.state_text(i)?;
                let payload = compress(&text)?;
                let entry = &mut self.entries[i];
                entry.payload = payload;
                entry.kind = SnapshotKind::Full;
                debug!("Materialized history step {} before pruning its base", i);
            }
        }

        self.entries.remove(0);
        for entry in &mut self.entries {
            if let SnapshotKind::Diff { base } = entry.kind {
                entry.kind = SnapshotKind::Diff {
                    base: base.shifted_down(1),
                };
            }
        }
        self.pruned += 1;
        self.current = self.current.and_then(|c| c.checked_sub(1));
        Ok(())
    }

    /// Loads history step `step` into `scene`.
    pub fn restore_state<S: SceneGraph>(&self, scene: &mut S, step: usize) -> Result<()> {
        let text = self.state_text(step)?;
        scene.load_scene(&text)
    }

    /// Serialized scene as it was at `step`.
    pub fn state_text(&self, step: usize) -> Result<String> {
        let entry = self.entries.get(step).ok_or(HistoryError::InvalidStep {
            step,
            len: self.entries.len(),
        })?;

        match entry.kind {
            SnapshotKind::Full => Ok(decompress(&entry.payload, step)?),
            SnapshotKind::Diff { base } => {
                let base_state = self.decode_state(step, base.get())?;
                let diff_text = decompress(&entry.payload, step)?;
                let diff: SceneDiff =
                    serde_json::from_str(&diff_text).map_err(|e| HistoryError::Corrupted {
                        step,
                        reason: format!("invalid diff: {e}"),
                    })?;
                let state = diff
                    .apply(&base_state)
                    .and_then(|state| state.to_text())
                    .map_err(|reason| HistoryError::Corrupted { step, reason })?;
                Ok(state)
            }
        }
    }

    /// Parsed full snapshot `base`, on behalf of the diff at `step`.
    fn decode_state(&self, step: usize, base: usize) -> Result<SceneState> {
        let entry = self
            .entries
            .get(base)
            .filter(|entry| !entry.is_diff())
            .ok_or(HistoryError::BrokenDiffChain { step, base })?;
        let text = decompress(&entry.payload, base)?;
        Ok(SceneState::parse(&text)
            .map_err(|reason| HistoryError::Corrupted { step: base, reason })?)
    }

    /// Steps back one entry. Returns `false` when already at the oldest step.
    pub fn undo<S: SceneGraph>(&mut self, scene: &mut S) -> Result<bool> {
        let Some(target) = self.current.filter(|&c| c > 0).map(|c| c - 1) else {
            return Ok(false);
        };
        self.restore_state(scene, target)?;
        self.current = Some(target);
        Ok(true)
    }

    /// Steps forward one entry. Returns `false` when already at the newest step.
    pub fn redo<S: SceneGraph>(&mut self, scene: &mut S) -> Result<bool> {
        let Some(target) = self
            .current
            .map(|c| c + 1)
            .filter(|&t| t < self.entries.len())
        else {
            return Ok(false);
        };
        self.restore_state(scene, target)?;
        self.current = Some(target);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.current.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.current.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// Index of the current entry, `None` while the history is empty.
    pub fn current_step(&self) -> Option<usize> {
        self.current
    }

    pub fn history_length(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = None;
        self.pruned = 0;
    }

    /// Rough estimate of the memory held by stored payloads, in bytes.
    pub fn memory_usage(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.payload.len() * BYTES_PER_CHAR)
            .sum()
    }

    pub fn entries(&self) -> &[HistorySnapshot] {
        &self.entries
    }

    pub fn snapshot(&self, step: usize) -> Option<&HistorySnapshot> {
        self.entries.get(step)
    }

    pub fn to_records(&self) -> Vec<SnapshotRecord> {
        self.entries.iter().map(HistorySnapshot::to_record).collect()
    }

    /// Rebuilds a history from persisted records, pointing at the newest entry.
    ///
    /// Every diff record must name a full record that comes before it.
    pub fn from_records(records: &[SnapshotRecord], settings: HistorySettings) -> Result<Self> {
        let mut history = Self::with_settings(settings);
        for (index, record) in records.iter().enumerate() {
            let kind = if record.is_diff {
                let base_index = record.base_index.ok_or_else(|| HistoryError::InvalidRecord {
                    index,
                    reason: "diff record without baseIndex".to_string(),
                })?;
                if base_index >= index {
                    return Err(HistoryError::InvalidRecord {
                        index,
                        reason: format!("base {base_index} is not before the record"),
                    }
                    .into());
                }
                let base = FullIndex::of(&history.entries, base_index).ok_or_else(|| {
                    HistoryError::InvalidRecord {
                        index,
                        reason: format!("base {base_index} is not a full snapshot"),
                    }
                })?;
                SnapshotKind::Diff { base }
            } else {
                SnapshotKind::Full
            };
            history.entries.push(HistorySnapshot {
                payload: record.compressed.clone(),
                timestamp: record.timestamp,
                object_count: record.object_count,
                kind,
            });
        }

        history.enforce_limit()?;
        history.current = history.entries.len().checked_sub(1);
        Ok(history)
    }
}
