//! Last-used timestamps for palette commands and agents.
//!
//! Used to float recently used entries to the top of otherwise static lists.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{read_json, write_json_atomic, StoreError};

const RECENCY_FILE: &str = "recency.json";

/// On-disk recency data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecencyData {
    #[serde(default)]
    pub commands: HashMap<String, DateTime<Utc>>,
}

/// File-backed recency store with serialized read-modify-write
#[derive(Debug)]
pub struct RecencyStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RecencyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at the default location in the user's config directory
    pub fn open_default() -> Result<Self> {
        let dir = crate::config::app_dir().context("Could not locate recency file")?;
        Ok(Self::new(dir.join(RECENCY_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current timestamps. Unreadable data is treated as empty.
    pub fn load(&self) -> RecencyData {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        read_json(&self.path).unwrap_or_default()
    }

    /// Mark `id` as used now.
    pub fn record(&self, id: &str) -> Result<(), StoreError> {
        self.record_at(id, Utc::now())
    }

    /// Mark `id` as used at `at`.
    pub fn record_at(&self, id: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut data: RecencyData = read_json(&self.path).unwrap_or_default();
        data.commands.insert(id.to_string(), at);
        write_json_atomic(&self.path, &data)
    }
}

/// Reorder items so recently used ones come first.
///
/// Items with a timestamp are sorted newest first (stable on ties); the rest
/// follow in their original order. With no timestamps or no items the input
/// is returned unchanged. Applying it twice gives the same order as once.
pub fn rank_by_recency<T, F>(
    items: Vec<T>,
    timestamps: &HashMap<String, DateTime<Utc>>,
    key_of: F,
) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    if timestamps.is_empty() || items.is_empty() {
        return items;
    }

    let mut recent: Vec<(DateTime<Utc>, T)> = Vec::new();
    let mut rest: Vec<T> = Vec::new();
    for item in items {
        match timestamps.get(key_of(&item)).copied() {
            Some(ts) => recent.push((ts, item)),
            None => rest.push(item),
        }
    }

    recent.sort_by(|a, b| b.0.cmp(&a.0));
    recent.into_iter().map(|(_, item)| item).chain(rest).collect()
}
