//! Session topology: turning a flat session list into a grouped tree.

pub mod builder;
pub mod enrich;
pub mod naming;
pub mod resolve;
pub mod tree;

use std::collections::BTreeMap;
use std::path::PathBuf;

pub use builder::build_tree;
pub use enrich::{resolve_worktree_stats, spawn_stats_fetch, Phase, SessionTopology, StatsUpdate};
pub use resolve::{resolve_repo_roots, resolve_repo_roots_incremental};
pub use tree::{NodeId, NodeKind, SessionTree, TreeNode};

/// Session name → root of the repository the session belongs to
pub type RepoRootMap = BTreeMap<String, PathBuf>;
