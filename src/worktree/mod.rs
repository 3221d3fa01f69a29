//! Worktree listing and management through the `wt` CLI.
//!
//! `wt list --format=json` is the source of truth for worktrees and their
//! uncommitted diff counts. Mutations shell out to `wt` as well.

pub mod ab;
pub mod branch;

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

/// One entry of `wt list --format=json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Worktree {
    #[serde(deserialize_with = "null_as_default")]
    pub branch: String,
    #[serde(deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub commit: Commit,
    #[serde(deserialize_with = "null_as_default")]
    pub working_tree: WorkingTree,
    #[serde(deserialize_with = "null_as_default")]
    pub main_state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub remote: Remote,
    pub is_main: bool,
    pub is_current: bool,
    pub is_previous: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub symbols: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Commit {
    #[serde(deserialize_with = "null_as_default")]
    pub sha: String,
    #[serde(deserialize_with = "null_as_default")]
    pub short_sha: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkingTree {
    pub staged: bool,
    pub modified: bool,
    pub untracked: bool,
    pub renamed: bool,
    pub deleted: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub diff: Diff,
}

/// Uncommitted line counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Diff {
    pub added: u32,
    pub deleted: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Remote {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub branch: String,
    pub ahead: u32,
    pub behind: u32,
}

impl Worktree {
    /// Label for the list: the branch, or the directory name when detached
    pub fn label(&self) -> &str {
        if !self.branch.is_empty() {
            return &self.branch;
        }
        Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }

    /// Whether the worktree may be removed from the list view
    pub fn is_removable(&self) -> bool {
        !self.is_main && !self.is_current && !self.branch.is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode `wt list --format=json` output.
pub fn parse_worktrees(json: &str) -> Result<Vec<Worktree>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(json).context("Failed to parse wt list output")
}

/// Diff counts of one worktree, keyed by its path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeDiff {
    pub path: PathBuf,
    pub added: u32,
    pub deleted: u32,
}

/// Source of per-worktree diff counts for a repository.
///
/// Called from a background thread, hence `Send + Sync`.
pub trait WorktreeDiffSource: Send + Sync {
    fn list_diffs(&self, repo_root: &Path) -> Result<Vec<WorktreeDiff>>;
}

/// Lists the worktrees of a repository
pub trait WorktreeSource {
    /// Worktrees of the repository at `dir`, or of the current directory.
    fn list_worktrees(&self, dir: Option<&Path>) -> Result<Vec<Worktree>>;
}

/// Wrapper around the `wt` binary
#[derive(Debug, Clone, Copy, Default)]
pub struct WtClient;

impl WtClient {
    pub fn new() -> Self {
        Self
    }

    /// List worktrees of the repository at `dir`, or of the current directory.
    pub fn list(&self, dir: Option<&Path>) -> Result<Vec<Worktree>> {
        let mut command = Command::new("wt");
        command.args(["list", "--format=json"]);
        if let Some(dir) = dir {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .context("Failed to run wt - is it installed?")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("wt list failed: {}", stderr.trim());
        }

        parse_worktrees(&String::from_utf8_lossy(&output.stdout))
    }

    /// Switch to an existing worktree branch.
    pub fn switch_to(&self, branch: &str) -> Result<()> {
        self.run(&["switch", branch])
    }

    /// Create a worktree for a new branch and switch to it.
    pub fn create(&self, branch: &str) -> Result<()> {
        self.run(&["switch", "--create", branch])
    }

    pub fn remove(&self, branch: &str) -> Result<()> {
        self.run(&["remove", branch])
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        let output = Command::new("wt")
            .args(args)
            .output()
            .with_context(|| format!("Failed to run wt {}", args.join(" ")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("wt {} failed: {}", args.join(" "), stderr.trim());
        }
        Ok(())
    }
}

impl WorktreeSource for WtClient {
    fn list_worktrees(&self, dir: Option<&Path>) -> Result<Vec<Worktree>> {
        self.list(dir)
    }
}

impl WorktreeDiffSource for WtClient {
    fn list_diffs(&self, repo_root: &Path) -> Result<Vec<WorktreeDiff>> {
        Ok(self
            .list(Some(repo_root))?
            .into_iter()
            .filter(|wt| !wt.path.is_empty())
            .map(|wt| WorktreeDiff {
                path: PathBuf::from(wt.path),
                added: wt.working_tree.diff.added,
                deleted: wt.working_tree.diff.deleted,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
      {
        "branch": "main",
        "path": "/code/shop",
        "kind": "worktree",
        "commit": {"sha": "abc123", "short_sha": "abc", "message": "init", "timestamp": 1700000000},
        "working_tree": {"staged": false, "modified": true, "untracked": false, "renamed": false, "deleted": false,
                         "diff": {"added": 12, "deleted": 3}},
        "main_state": "is_main",
        "remote": {"name": "origin", "branch": "main", "ahead": 0, "behind": 2},
        "is_main": true,
        "is_current": true,
        "is_previous": false,
        "symbols": "@"
      },
      {
        "branch": null,
        "path": "/code/shop-detached",
        "working_tree": null,
        "extra_field": 1
      }
    ]"#;

    #[test]
    fn parse_worktrees_reads_full_entries() {
        let wts = parse_worktrees(SAMPLE).unwrap();
        assert_eq!(wts.len(), 2);

        let main = &wts[0];
        assert_eq!(main.branch, "main");
        assert_eq!(main.commit.short_sha, "abc");
        assert_eq!(main.working_tree.diff, Diff { added: 12, deleted: 3 });
        assert_eq!(main.remote.behind, 2);
        assert!(main.is_main && main.is_current);
        assert!(!main.is_removable());
    }

    #[test]
    fn parse_worktrees_tolerates_nulls_and_missing_fields() {
        let wts = parse_worktrees(SAMPLE).unwrap();
        let detached = &wts[1];
        assert_eq!(detached.branch, "");
        assert_eq!(detached.working_tree, WorkingTree::default());
        assert_eq!(detached.label(), "shop-detached");
        assert!(!detached.is_removable());
    }

    #[test]
    fn parse_worktrees_empty_output() {
        assert!(parse_worktrees("").unwrap().is_empty());
        assert!(parse_worktrees("[]").unwrap().is_empty());
    }

    #[test]
    fn parse_worktrees_rejects_garbage() {
        assert!(parse_worktrees("not json").is_err());
    }
}
