use log::debug;
use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;

/// Tuning for [`HistoryManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Oldest entries are evicted past this many; `None` keeps everything
    pub max_entries: Option<usize>,
    /// Drop the redo branch when committing behind the end of history
    pub truncate_redo_on_commit: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: None,
            truncate_redo_on_commit: true,
        }
    }
}

/// Linear undo/redo log of surface snapshots.
///
/// `cursor` is `None` while nothing has been committed, otherwise it indexes
/// the entry the surface currently shows. Every operation is total: requests
/// past either end leave the cursor where it is.
#[derive(Debug, Default)]
pub struct HistoryManager {
    entries: Vec<Snapshot>,
    cursor: Option<usize>,
    config: HistoryConfig,
}

impl HistoryManager {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Record a completed stroke and make it current
    pub fn commit(&mut self, snapshot: Snapshot) {
        if self.config.truncate_redo_on_commit {
            let keep = self.cursor.map_or(0, |cursor| cursor + 1);
            if keep < self.entries.len() {
                debug!("Discarding {} redo entries", self.entries.len() - keep);
                self.entries.truncate(keep);
            }
        }

        self.entries.push(snapshot);
        let mut cursor = self.entries.len() - 1;

        if let Some(max) = self.config.max_entries.filter(|max| *max > 0) {
            if self.entries.len() > max {
                let evicted = self.entries.len() - max;
                self.entries.drain(..evicted);
                cursor -= evicted;
            }
        }

        self.cursor = Some(cursor);
        debug!("Committed history entry {} of {}", cursor + 1, self.entries.len());
    }

    /// Step back one entry; a no-op at the first entry or when empty
    pub fn undo(&mut self) -> Option<&Snapshot> {
        match self.cursor {
            Some(cursor) if cursor > 0 => self.cursor = Some(cursor - 1),
            _ => debug!("Nothing to undo"),
        }
        self.current()
    }

    /// Step forward one entry; a no-op at the last entry or when empty
    pub fn redo(&mut self) -> Option<&Snapshot> {
        match self.cursor {
            Some(cursor) if cursor + 1 < self.entries.len() => self.cursor = Some(cursor + 1),
            _ => debug!("Nothing to redo"),
        }
        self.current()
    }

    /// The entry the surface currently shows
    pub fn current(&self) -> Option<&Snapshot> {
        self.cursor.and_then(|cursor| self.entries.get(cursor))
    }

    /// Forget every entry. The live surface is left alone.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if there is an earlier entry to step back to
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|cursor| cursor > 0)
    }

    /// Returns true if there is a later entry to step forward to
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|cursor| cursor + 1 < self.entries.len())
    }
}
