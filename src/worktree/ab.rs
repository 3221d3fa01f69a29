//! Paired worktrees for running two agents on the same task.
//!
//! For a repository at `/code/shop` the pair lives next to it as
//! `/code/shop-ab-codex` and `/code/shop-ab-claude`, each on its own
//! `ab/<base>-<agent>` branch cut from the base branch.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

use crate::git::normalize_path;

/// Paths of the two prepared worktrees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbWorktrees {
    pub codex: PathBuf,
    pub claude: PathBuf,
}

/// Create (or reuse) the codex/claude worktree pair for the repository at `cwd`.
///
/// The base branch must exist locally. An existing worktree at the target
/// path is reused; any other file or directory there is an error.
pub fn prepare_ab_worktrees(cwd: &Path, base_branch: &str) -> Result<AbWorktrees> {
    let root = git_output(cwd, &["rev-parse", "--show-toplevel"])
        .context("Failed to resolve repository root")?;
    let root = PathBuf::from(root);

    let base = match base_branch.trim() {
        "" => "main",
        trimmed => trimmed,
    };
    if !branch_exists(&root, base) {
        anyhow::bail!("Base branch {base:?} does not exist");
    }

    let repo_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("Repository root has no directory name")?;
    let parent = root
        .parent()
        .context("Cannot determine parent directory for worktrees")?;

    let pair = AbWorktrees {
        codex: parent.join(format!("{repo_name}-ab-codex")),
        claude: parent.join(format!("{repo_name}-ab-claude")),
    };

    ensure_worktree(&root, &pair.codex, &ab_branch_name(base, "codex"), base)?;
    ensure_worktree(&root, &pair.claude, &ab_branch_name(base, "claude"), base)?;

    tracing::info!(codex = %pair.codex.display(), claude = %pair.claude.display(), "prepared A/B worktrees");
    Ok(pair)
}

/// Branch used by `agent` for an A/B run off `base_branch`.
pub fn ab_branch_name(base_branch: &str, agent: &str) -> String {
    let base = match base_branch.trim() {
        "" => "main",
        trimmed => trimmed,
    };
    format!("ab/{}-{agent}", base.replace(' ', "-"))
}

/// Worktree paths listed in `git worktree list --porcelain` output.
pub fn parse_worktree_list(porcelain: &str) -> Vec<PathBuf> {
    porcelain
        .lines()
        .filter_map(|line| line.strip_prefix("worktree "))
        .map(|path| normalize_path(Path::new(path.trim())))
        .collect()
}

fn ensure_worktree(repo_root: &Path, path: &Path, branch: &str, base_branch: &str) -> Result<()> {
    let listed = git_output(repo_root, &["worktree", "list", "--porcelain"])
        .with_context(|| format!("Failed to check worktree {}", path.display()))?;
    if parse_worktree_list(&listed).contains(&normalize_path(path)) {
        return Ok(());
    }

    if path.exists() {
        anyhow::bail!("Path exists and is not a git worktree: {}", path.display());
    }

    let path_arg = path.to_string_lossy().into_owned();
    let args: Vec<&str> = if branch_exists(repo_root, branch) {
        vec!["worktree", "add", path_arg.as_str(), branch]
    } else {
        vec!["worktree", "add", "-b", branch, path_arg.as_str(), base_branch]
    };

    let output = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(&args)
        .output()
        .context("Failed to run git worktree add")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git worktree add {branch} failed: {}", stderr.trim());
    }
    Ok(())
}

fn git_output(cwd: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(cwd)
        .args(args)
        .output()
        .context("Failed to run git")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git {} failed: {}", args.join(" "), stderr.trim());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn branch_exists(repo_root: &Path, branch: &str) -> bool {
    Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(["show-ref", "--verify", "--quiet"])
        .arg(format!("refs/heads/{branch}"))
        .status()
        .is_ok_and(|status| status.success())
}
