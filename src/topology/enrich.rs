//! Diff-stat enrichment of a built tree.
//!
//! Stats come from an external tool and can be slow, so they are fetched off
//! the UI thread and applied later. Each installed tree gets a generation
//! number; results computed for an older generation are discarded.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::tree::{NodeId, SessionTree};
use super::RepoRootMap;
use crate::cache::DiffStat;
use crate::tmux::Session;
use crate::worktree::WorktreeDiffSource;

/// Query each distinct repository once and map worktree diffs back to sessions.
///
/// A session matches a worktree when its path equals the worktree path.
/// Only non-zero stats are returned. Failing repositories are skipped.
pub fn resolve_worktree_stats(
    sessions: &[Session],
    repo_roots: &RepoRootMap,
    source: &dyn WorktreeDiffSource,
) -> HashMap<String, DiffStat> {
    let path_to_session: HashMap<&Path, &str> = sessions
        .iter()
        .filter(|s| !s.path.is_empty())
        .map(|s| (Path::new(s.path.as_str()), s.name.as_str()))
        .collect();

    let unique_roots: BTreeSet<&Path> = repo_roots.values().map(PathBuf::as_path).collect();

    let mut stats = HashMap::new();
    for root in unique_roots {
        let diffs = match source.list_diffs(root) {
            Ok(diffs) => diffs,
            Err(err) => {
                tracing::debug!(root = %root.display(), error = %err, "skipping worktree stats");
                continue;
            }
        };

        for diff in diffs {
            if diff.added == 0 && diff.deleted == 0 {
                continue;
            }
            if let Some(&name) = path_to_session.get(diff.path.as_path()) {
                stats.insert(
                    name.to_string(),
                    DiffStat {
                        added: diff.added,
                        deleted: diff.deleted,
                    },
                );
            }
        }
    }
    stats
}

/// Stats computed for a specific tree generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsUpdate {
    pub generation: u64,
    pub stats: HashMap<String, DiffStat>,
}

/// Compute stats on a background thread and send them back tagged with `generation`.
///
/// A closed receiver is not an error; the result is simply dropped.
pub fn spawn_stats_fetch(
    generation: u64,
    sessions: Vec<Session>,
    repo_roots: RepoRootMap,
    source: Arc<dyn WorktreeDiffSource>,
    tx: Sender<StatsUpdate>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stats = resolve_worktree_stats(&sessions, &repo_roots, source.as_ref());
        tracing::debug!(generation, entries = stats.len(), "worktree stats fetched");
        if tx.send(StatsUpdate { generation, stats }).is_err() {
            tracing::debug!(generation, "stats receiver gone");
        }
    })
}

/// Lifecycle phase of the current tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Empty,
    Built,
    Enriched,
}

/// Owner of the current session tree.
///
/// `Empty → Built` on [`install`](Self::install), `Built → Enriched` on a
/// successful [`enrich`](Self::enrich). Installing a new tree always returns
/// to `Built` with a fresh generation.
#[derive(Debug, Default)]
pub struct SessionTopology {
    tree: SessionTree,
    phase: Phase,
    generation: u64,
}

impl SessionTopology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tree(&self) -> &SessionTree {
        &self.tree
    }

    /// Replace the tree and return its generation.
    pub fn install(&mut self, tree: SessionTree) -> u64 {
        self.generation += 1;
        self.tree = tree;
        self.phase = Phase::Built;
        self.generation
    }

    /// Apply stats computed for `generation`.
    ///
    /// Returns `false`, leaving the tree untouched, when the stats are for an
    /// older tree or this tree was already enriched.
    pub fn enrich(&mut self, generation: u64, stats: &HashMap<String, DiffStat>) -> bool {
        if generation != self.generation || self.phase != Phase::Built {
            return false;
        }
        self.tree.apply_stats(stats);
        self.phase = Phase::Enriched;
        true
    }

    pub fn toggle_expanded(&mut self, id: NodeId) -> bool {
        self.tree.toggle_expanded(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::build_tree;
    use crate::worktree::WorktreeDiff;
    use std::sync::mpsc;
    use std::sync::Mutex;

    /// Diff source answering from a fixed table and counting queries
    #[derive(Default)]
    struct StaticDiffSource {
        diffs: HashMap<PathBuf, Vec<WorktreeDiff>>,
        queried: Mutex<Vec<PathBuf>>,
    }

    impl StaticDiffSource {
        fn with(root: &str, entries: &[(&str, u32, u32)]) -> Self {
            let mut source = Self::default();
            source.diffs.insert(
                PathBuf::from(root),
                entries
                    .iter()
                    .map(|(path, added, deleted)| WorktreeDiff {
                        path: PathBuf::from(path),
                        added: *added,
                        deleted: *deleted,
                    })
                    .collect(),
            );
            source
        }
    }

    impl WorktreeDiffSource for StaticDiffSource {
        fn list_diffs(&self, repo_root: &Path) -> anyhow::Result<Vec<WorktreeDiff>> {
            self.queried.lock().unwrap().push(repo_root.to_path_buf());
            match self.diffs.get(repo_root) {
                Some(diffs) => Ok(diffs.clone()),
                None => anyhow::bail!("not a repository"),
            }
        }
    }

    fn sess(name: &str, path: &str) -> Session {
        Session {
            name: name.to_string(),
            windows: 1,
            path: path.to_string(),
            ..Default::default()
        }
    }

    fn shop_fixture() -> (Vec<Session>, RepoRootMap) {
        let sessions = vec![
            sess("shop", "/c/shop"),
            sess("shop-login", "/c/shop-login"),
            sess("shop-clean", "/c/shop-clean"),
        ];
        let roots = sessions
            .iter()
            .map(|s| (s.name.clone(), PathBuf::from("/c/shop")))
            .collect();
        (sessions, roots)
    }

    #[test]
    fn resolve_worktree_stats_maps_paths_and_drops_zeroes() {
        let (sessions, roots) = shop_fixture();
        let source = StaticDiffSource::with(
            "/c/shop",
            &[("/c/shop", 0, 0), ("/c/shop-login", 7, 2), ("/c/elsewhere", 1, 1)],
        );

        let stats = resolve_worktree_stats(&sessions, &roots, &source);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats["shop-login"], DiffStat { added: 7, deleted: 2 });
        assert_eq!(source.queried.lock().unwrap().len(), 1, "one query per repository");
    }

    #[test]
    fn resolve_worktree_stats_skips_failing_repositories() {
        let (sessions, roots) = shop_fixture();
        let source = StaticDiffSource::default();
        assert!(resolve_worktree_stats(&sessions, &roots, &source).is_empty());
    }

    #[test]
    fn enrich_applies_once_for_current_generation() {
        let (sessions, roots) = shop_fixture();
        let mut topology = SessionTopology::new();
        assert_eq!(topology.phase(), Phase::Empty);

        let generation = topology.install(build_tree(&sessions, &roots));
        assert_eq!(topology.phase(), Phase::Built);

        let mut stats = HashMap::new();
        stats.insert("shop-login".to_string(), DiffStat { added: 4, deleted: 1 });

        assert!(topology.enrich(generation, &stats));
        assert_eq!(topology.phase(), Phase::Enriched);
        let node = topology.tree().find_session("shop-login").unwrap();
        assert_eq!(topology.tree().node(node).added, 4);

        assert!(!topology.enrich(generation, &stats), "already enriched");
    }

    #[test]
    fn enrich_discards_stale_generation() {
        let (sessions, roots) = shop_fixture();
        let mut topology = SessionTopology::new();
        let old = topology.install(build_tree(&sessions, &roots));
        let current = topology.install(build_tree(&sessions, &roots));
        assert_ne!(old, current);

        let mut stats = HashMap::new();
        stats.insert("shop".to_string(), DiffStat { added: 1, deleted: 0 });

        assert!(!topology.enrich(old, &stats));
        assert_eq!(topology.phase(), Phase::Built);
        let node = topology.tree().find_session("shop").unwrap();
        assert!(!topology.tree().node(node).has_stats());
    }

    #[test]
    fn spawn_stats_fetch_reports_generation() {
        let (sessions, roots) = shop_fixture();
        let source: Arc<dyn WorktreeDiffSource> =
            Arc::new(StaticDiffSource::with("/c/shop", &[("/c/shop-clean", 0, 9)]));
        let (tx, rx) = mpsc::channel();

        spawn_stats_fetch(7, sessions, roots, source, tx).join().unwrap();

        let update = rx.recv().unwrap();
        assert_eq!(update.generation, 7);
        assert_eq!(update.stats["shop-clean"], DiffStat { added: 0, deleted: 9 });
    }
}
