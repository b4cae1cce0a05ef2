//! Per-folder running statistics.

use std::collections::HashMap;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use sharetally_core::EntryKind;

/// Running statistics for one folder key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderStats {
    /// Owning identity (SID or `DOMAIN\user`).
    pub owner: CompactString,
    /// Sum of all constituent entry sizes.
    pub total_bytes: u64,
    /// Smallest age seen, i.e. the most recent modification.
    pub newest_age_seconds: u64,
    /// The folder's own directory entry has been absorbed.
    pub dir_entry_seen: bool,
    /// Number of file records absorbed.
    pub file_count: u64,
    /// Number of directory records absorbed, including the folder's own.
    pub dir_count: u64,
}

impl FolderStats {
    fn new(kind: EntryKind, owner: &str, size_bytes: u64, age_seconds: u64, exact: bool) -> Self {
        let mut stats = Self {
            owner: owner.into(),
            total_bytes: size_bytes,
            newest_age_seconds: age_seconds,
            dir_entry_seen: kind.is_dir() && exact,
            file_count: 0,
            dir_count: 0,
        };
        stats.count(kind);
        stats
    }

    fn count(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::File => self.file_count += 1,
            EntryKind::Directory => self.dir_count += 1,
        }
    }
}

/// Final per-folder result, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSummary {
    pub owner: CompactString,
    pub key: CompactString,
    pub total_bytes: u64,
    pub newest_age_seconds: u64,
    pub dir_entry_seen: bool,
    pub file_count: u64,
    pub dir_count: u64,
}

impl FolderSummary {
    fn new(key: CompactString, stats: FolderStats) -> Self {
        Self {
            owner: stats.owner,
            key,
            total_bytes: stats.total_bytes,
            newest_age_seconds: stats.newest_age_seconds,
            dir_entry_seen: stats.dir_entry_seen,
            file_count: stats.file_count,
            dir_count: stats.dir_count,
        }
    }
}

/// Map from folder key to its running statistics.
///
/// Single writer: every record goes through [`absorb`](Self::absorb) in
/// arrival order, which the owner rule depends on.
#[derive(Debug, Default, Clone)]
pub struct AggregationStore {
    folders: HashMap<CompactString, FolderStats>,
}

impl AggregationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the statistics for `key`.
    ///
    /// `exact` marks the record as the folder's own entry. Only such a
    /// directory record replaces the owner; otherwise the first owner seen
    /// for the folder stands.
    pub fn absorb(
        &mut self,
        key: &str,
        kind: EntryKind,
        owner: &str,
        size_bytes: u64,
        age_seconds: u64,
        exact: bool,
    ) {
        let Some(stats) = self.folders.get_mut(key) else {
            self.folders.insert(
                key.into(),
                FolderStats::new(kind, owner, size_bytes, age_seconds, exact),
            );
            return;
        };

        stats.total_bytes = stats.total_bytes.saturating_add(size_bytes);
        if age_seconds < stats.newest_age_seconds {
            stats.newest_age_seconds = age_seconds;
        }
        if kind.is_dir() && exact {
            stats.owner = owner.into();
            stats.dir_entry_seen = true;
        }
        stats.count(kind);
    }

    pub fn get(&self, key: &str) -> Option<&FolderStats> {
        self.folders.get(key)
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Consume the store into summaries sorted by key (byte-wise).
    pub fn into_snapshot(self) -> Vec<FolderSummary> {
        let mut rows: Vec<FolderSummary> = self
            .folders
            .into_iter()
            .map(|(key, stats)| FolderSummary::new(key, stats))
            .collect();
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        rows
    }
}
