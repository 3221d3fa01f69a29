//! Persistent cache of the last session snapshot.
//!
//! Holds the session list, resolved repository roots and worktree diff
//! stats between runs so startup can skip most external lookups. The file is
//! versioned; a snapshot with any other version is ignored.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{read_json, write_json_atomic, StoreError};
use crate::tmux::Session;
use crate::topology::RepoRootMap;

/// Current on-disk format version
pub const CACHE_VERSION: u32 = 1;

const CACHE_FILE: &str = "sessions-cache.json";

/// Uncommitted line counts of a worktree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStat {
    pub added: u32,
    pub deleted: u32,
}

impl DiffStat {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.deleted == 0
    }
}

/// Everything persisted between runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub repo_roots: RepoRootMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_roots_refreshed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub stats: HashMap<String, DiffStat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_ttl: Option<DateTime<Utc>>,
}

impl CacheSnapshot {
    /// Cached stats are usable only when present and not yet expired.
    pub fn stats_valid(&self, now: DateTime<Utc>) -> bool {
        !self.stats.is_empty() && self.stats_ttl.is_some_and(|ttl| now < ttl)
    }
}

/// File-backed snapshot store.
///
/// All access is serialized through an internal lock so a read-modify-write
/// in [`CacheStore::update`] cannot interleave with another save.
#[derive(Debug)]
pub struct CacheStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at the default location in the user's config directory
    pub fn open_default() -> Result<Self> {
        let dir = crate::config::app_dir().context("Could not locate cache file")?;
        Ok(Self::new(dir.join(CACHE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot. Missing, corrupt or wrong-version files yield `None`.
    pub fn load(&self) -> Option<CacheSnapshot> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read_unlocked()
    }

    /// Stamp the snapshot with the current version and time, then replace the file.
    pub fn save(&self, snapshot: &mut CacheSnapshot) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.write_unlocked(snapshot)
    }

    /// Read-modify-write under the lock. Starts from an empty snapshot when
    /// nothing usable is on disk. Returns what was written.
    pub fn update<F>(&self, mutate: F) -> Result<CacheSnapshot, StoreError>
    where
        F: FnOnce(&mut CacheSnapshot),
    {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut snapshot = self.read_unlocked().unwrap_or_default();
        mutate(&mut snapshot);
        self.write_unlocked(&mut snapshot)?;
        Ok(snapshot)
    }

    fn read_unlocked(&self) -> Option<CacheSnapshot> {
        let snapshot: CacheSnapshot = read_json(&self.path)?;
        if snapshot.version != CACHE_VERSION {
            tracing::debug!(
                found = snapshot.version,
                expected = CACHE_VERSION,
                "discarding cache with unexpected version"
            );
            return None;
        }
        Some(snapshot)
    }

    fn write_unlocked(&self, snapshot: &mut CacheSnapshot) -> Result<(), StoreError> {
        snapshot.version = CACHE_VERSION;
        snapshot.updated_at = Some(Utc::now());
        write_json_atomic(&self.path, snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn store() -> (tempfile::TempDir, CacheStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join(CACHE_FILE));
        (dir, store)
    }

    fn sample() -> CacheSnapshot {
        let mut snap = CacheSnapshot {
            sessions: vec![Session {
                name: "api".to_string(),
                windows: 2,
                attached: true,
                path: "/c/api".to_string(),
                activity: 42,
            }],
            repo_roots_refreshed_at: Some(Utc::now()),
            ..Default::default()
        };
        snap.repo_roots.insert("api".to_string(), PathBuf::from("/c/api"));
        snap.stats.insert("api".to_string(), DiffStat { added: 3, deleted: 1 });
        snap
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = store();
        let mut snap = sample();
        store.save(&mut snap).unwrap();

        let loaded = store.load().expect("snapshot should load");
        assert_eq!(loaded.version, CACHE_VERSION);
        assert!(loaded.updated_at.is_some());
        assert_eq!(loaded, snap);
    }

    #[test]
    fn load_missing_file_is_none() {
        let (_dir, store) = store();
        assert!(store.load().is_none());
    }

    #[test]
    fn load_invalid_json_is_none() {
        let (_dir, store) = store();
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn load_wrong_version_is_none() {
        let (_dir, store) = store();
        std::fs::write(store.path(), r#"{"version":999,"sessions":[]}"#).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn stats_valid_requires_entries_and_future_ttl() {
        let now = Utc::now();
        let mut snap = sample();

        snap.stats_ttl = Some(now + Duration::seconds(30));
        assert!(snap.stats_valid(now));

        snap.stats_ttl = Some(now - Duration::seconds(1));
        assert!(!snap.stats_valid(now));

        snap.stats_ttl = None;
        assert!(!snap.stats_valid(now));

        snap.stats.clear();
        snap.stats_ttl = Some(now + Duration::seconds(30));
        assert!(!snap.stats_valid(now));
    }

    #[test]
    fn update_preserves_untouched_fields() {
        let (_dir, store) = store();
        let mut snap = sample();
        store.save(&mut snap).unwrap();

        store
            .update(|s| {
                s.stats.clear();
                s.stats.insert("web".to_string(), DiffStat { added: 9, deleted: 0 });
            })
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.sessions, snap.sessions);
        assert_eq!(loaded.repo_roots, snap.repo_roots);
        assert_eq!(loaded.stats.len(), 1);
        assert_eq!(loaded.stats["web"].added, 9);
    }

    #[test]
    fn update_starts_from_empty_when_nothing_on_disk() {
        let (_dir, store) = store();
        let written = store
            .update(|s| s.sessions.push(Session::default()))
            .unwrap();
        assert_eq!(written.version, CACHE_VERSION);
        assert_eq!(store.load().unwrap().sessions.len(), 1);
    }

    #[test]
    fn concurrent_updates_lose_nothing() {
        let (_dir, store) = store();
        let store = std::sync::Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..10 {
                        store
                            .update(|s| {
                                s.stats
                                    .insert(format!("s{t}-{i}"), DiffStat { added: 1, deleted: 0 });
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.load().unwrap().stats.len(), 80);
    }
}
