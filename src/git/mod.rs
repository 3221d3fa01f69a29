//! Git repository root resolution.
//!
//! Linked worktrees share their repository's common git directory, so the
//! parent of `git rev-parse --git-common-dir` identifies the repository no
//! matter which worktree a session lives in.

use std::path::{Component, Path, PathBuf};
use std::process::Command;

/// Maps a directory to the root of the repository containing it.
pub trait RepoRootResolver {
    /// Returns `None` for an empty path, a directory outside any repository,
    /// or any failure running git.
    fn resolve(&self, dir: &Path) -> Option<PathBuf>;
}

/// Resolver backed by the `git` binary
#[derive(Debug, Clone, Copy, Default)]
pub struct GitRepoRootResolver;

impl RepoRootResolver for GitRepoRootResolver {
    fn resolve(&self, dir: &Path) -> Option<PathBuf> {
        if dir.as_os_str().is_empty() {
            return None;
        }

        let output = match Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(["rev-parse", "--git-common-dir"])
            .output()
        {
            Ok(output) => output,
            Err(err) => {
                tracing::debug!(dir = %dir.display(), error = %err, "failed to run git");
                return None;
            }
        };

        if !output.status.success() {
            return None;
        }

        let common_dir = String::from_utf8_lossy(&output.stdout);
        repo_root_from_common_dir(dir, common_dir.trim())
    }
}

/// Derive the repository root from `--git-common-dir` output.
///
/// Relative output is taken relative to `dir`. The result is the parent of
/// the lexically normalized common directory.
pub fn repo_root_from_common_dir(dir: &Path, common_dir: &str) -> Option<PathBuf> {
    if common_dir.is_empty() {
        return None;
    }

    let common = Path::new(common_dir);
    let absolute = if common.is_absolute() {
        common.to_path_buf()
    } else {
        dir.join(common)
    };

    normalize_path(&absolute).parent().map(Path::to_path_buf)
}

/// Lexically clean a path: drop `.` segments and fold `..` into the
/// preceding segment. The filesystem is never consulted.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let ends_in_normal = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if ends_in_normal {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_from_relative_git_dir() {
        let root = repo_root_from_common_dir(Path::new("/home/u/repo"), ".git");
        assert_eq!(root, Some(PathBuf::from("/home/u/repo")));
    }

    #[test]
    fn root_from_subdirectory() {
        let root = repo_root_from_common_dir(Path::new("/home/u/repo/src/bin"), "../../.git");
        assert_eq!(root, Some(PathBuf::from("/home/u/repo")));
    }

    #[test]
    fn root_from_linked_worktree() {
        let root =
            repo_root_from_common_dir(Path::new("/home/u/repo-feature"), "/home/u/repo/.git");
        assert_eq!(root, Some(PathBuf::from("/home/u/repo")));
    }

    #[test]
    fn root_from_empty_output_is_none() {
        assert_eq!(repo_root_from_common_dir(Path::new("/home/u/repo"), ""), None);
    }

    #[test]
    fn normalize_path_folds_dots() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_path(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn resolve_empty_path_is_none() {
        assert_eq!(GitRepoRootResolver.resolve(Path::new("")), None);
    }

    #[test]
    fn resolve_outside_repository_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(GitRepoRootResolver.resolve(dir.path()), None);
    }
}
