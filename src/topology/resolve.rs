//! Repository root resolution with incremental reuse of cached results.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};

use super::naming::name_matches_repo;
use super::RepoRootMap;
use crate::cache::CacheSnapshot;
use crate::git::RepoRootResolver;
use crate::tmux::Session;

/// Cached roots older than this are re-resolved from scratch.
pub const REPO_ROOTS_REVALIDATE_SECS: i64 = 10 * 60;

/// Resolve the root of every session with a working directory.
///
/// A resolved root is kept only when the session name matches the
/// repository's directory name.
pub fn resolve_repo_roots(sessions: &[Session], resolver: &dyn RepoRootResolver) -> RepoRootMap {
    sessions
        .iter()
        .filter_map(|s| resolve_session(s, resolver).map(|root| (s.name.clone(), root)))
        .collect()
}

/// Resolve roots, reusing cached entries for unchanged sessions.
///
/// A full resolution is done (and stamped with `now`) when there is no
/// usable cache or its stamp is older than [`REPO_ROOTS_REVALIDATE_SECS`].
/// Otherwise a session keeps its cached root when its path is unchanged and
/// the root still matches its name; every other session is resolved fresh.
/// The returned stamp is then the cached one.
pub fn resolve_repo_roots_incremental(
    sessions: &[Session],
    snapshot: Option<&CacheSnapshot>,
    now: DateTime<Utc>,
    resolver: &dyn RepoRootResolver,
) -> (RepoRootMap, DateTime<Utc>) {
    let Some((snapshot, refreshed_at)) = snapshot.and_then(|snap| {
        let stamp = snap.repo_roots_refreshed_at?;
        let fresh = !snap.repo_roots.is_empty()
            && now.signed_duration_since(stamp) <= Duration::seconds(REPO_ROOTS_REVALIDATE_SECS);
        fresh.then_some((snap, stamp))
    }) else {
        tracing::debug!(sessions = sessions.len(), "resolving all repository roots");
        return (resolve_repo_roots(sessions, resolver), now);
    };

    let cached_paths: HashMap<&str, &str> = snapshot
        .sessions
        .iter()
        .map(|c| (c.name.as_str(), c.path.as_str()))
        .collect();

    let mut roots = RepoRootMap::new();
    let (mut reused, mut resolved) = (0usize, 0usize);
    for session in sessions {
        if session.path.is_empty() {
            continue;
        }

        if let Some(root) = reusable_root(session, &cached_paths, &snapshot.repo_roots) {
            roots.insert(session.name.clone(), root.to_path_buf());
            reused += 1;
            continue;
        }

        resolved += 1;
        if let Some(root) = resolve_session(session, resolver) {
            roots.insert(session.name.clone(), root);
        }
    }

    tracing::debug!(reused, resolved, "incremental root resolution");
    (roots, refreshed_at)
}

fn resolve_session(session: &Session, resolver: &dyn RepoRootResolver) -> Option<PathBuf> {
    if session.path.is_empty() {
        return None;
    }
    let root = resolver.resolve(Path::new(&session.path))?;
    name_matches_repo(&session.name, &root).then_some(root)
}

fn reusable_root<'a>(
    session: &Session,
    cached_paths: &HashMap<&str, &str>,
    cached_roots: &'a RepoRootMap,
) -> Option<&'a Path> {
    if cached_paths.get(session.name.as_str()) != Some(&session.path.as_str()) {
        return None;
    }
    let root = cached_roots.get(&session.name)?;
    name_matches_repo(&session.name, root).then_some(root.as_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Resolver answering from a fixed table and recording every lookup
    #[derive(Default)]
    struct CountingResolver {
        answers: HashMap<PathBuf, PathBuf>,
        calls: RefCell<Vec<PathBuf>>,
    }

    impl CountingResolver {
        fn with(pairs: &[(&str, &str)]) -> Self {
            Self {
                answers: pairs
                    .iter()
                    .map(|(dir, root)| (PathBuf::from(dir), PathBuf::from(root)))
                    .collect(),
                calls: RefCell::default(),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl RepoRootResolver for CountingResolver {
        fn resolve(&self, dir: &Path) -> Option<PathBuf> {
            self.calls.borrow_mut().push(dir.to_path_buf());
            self.answers.get(dir).cloned()
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

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn snapshot(sessions: Vec<Session>, roots: &[(&str, &str)], stamp: DateTime<Utc>) -> CacheSnapshot {
        CacheSnapshot {
            sessions,
            repo_roots: roots
                .iter()
                .map(|(n, r)| (n.to_string(), PathBuf::from(r)))
                .collect(),
            repo_roots_refreshed_at: Some(stamp),
            ..Default::default()
        }
    }

    #[test]
    fn full_resolution_validates_names() {
        let resolver = CountingResolver::with(&[
            ("/c/api", "/c/api"),
            ("/c/api-fix", "/c/api"),
            ("/c/api/docs", "/c/api"),
        ]);
        let sessions = vec![
            sess("api", "/c/api"),
            sess("api-fix", "/c/api-fix"),
            sess("notes", "/c/api/docs"),
            sess("detached", ""),
        ];

        let roots = resolve_repo_roots(&sessions, &resolver);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots["api-fix"], PathBuf::from("/c/api"));
        assert!(!roots.contains_key("notes"));
        assert_eq!(resolver.call_count(), 3, "empty paths are never resolved");
    }

    #[test]
    fn incremental_without_snapshot_resolves_everything() {
        let resolver = CountingResolver::with(&[("/c/api", "/c/api")]);
        let sessions = vec![sess("api", "/c/api")];

        let (roots, stamp) = resolve_repo_roots_incremental(&sessions, None, now(), &resolver);
        assert_eq!(roots.len(), 1);
        assert_eq!(stamp, now());
        assert_eq!(resolver.call_count(), 1);
    }

    #[test]
    fn incremental_reuses_unchanged_sessions() {
        let resolver = CountingResolver::with(&[("/c/api", "/c/api"), ("/c/web", "/c/web")]);
        let stamp = now() - Duration::minutes(5);
        let snap = snapshot(
            vec![sess("api", "/c/api"), sess("web", "/c/web")],
            &[("api", "/c/api"), ("web", "/c/web")],
            stamp,
        );
        let sessions = vec![sess("api", "/c/api"), sess("web", "/c/web")];

        let (roots, refreshed) =
            resolve_repo_roots_incremental(&sessions, Some(&snap), now(), &resolver);

        assert_eq!(roots, snap.repo_roots);
        assert_eq!(refreshed, stamp);
        assert_eq!(resolver.call_count(), 0);
    }

    #[test]
    fn incremental_reuses_a_large_unchanged_session_list() {
        let names: Vec<String> = (0..300).map(|i| format!("svc{i}")).collect();
        let sessions: Vec<Session> = names
            .iter()
            .map(|n| sess(n, &format!("/c/{n}")))
            .collect();
        let pairs: Vec<(String, String)> = names
            .iter()
            .map(|n| (n.clone(), format!("/c/{n}")))
            .collect();
        let pair_refs: Vec<(&str, &str)> = pairs
            .iter()
            .map(|(n, r)| (n.as_str(), r.as_str()))
            .collect();
        // Cached sessions in reverse order, so lookup cannot rely on position.
        let mut cached = sessions.clone();
        cached.reverse();
        let snap = snapshot(cached, &pair_refs, now() - Duration::minutes(2));
        let resolver = CountingResolver::default();

        let (roots, _) = resolve_repo_roots_incremental(&sessions, Some(&snap), now(), &resolver);
        assert_eq!(roots.len(), 300);
        assert_eq!(roots["svc299"], PathBuf::from("/c/svc299"));
        assert_eq!(resolver.call_count(), 0);
    }

    #[test]
    fn incremental_resolves_new_and_moved_sessions() {
        let resolver = CountingResolver::with(&[("/c/web", "/c/web"), ("/c/api-v2", "/c/api")]);
        let snap = snapshot(
            vec![sess("api", "/c/api")],
            &[("api", "/c/api")],
            now() - Duration::minutes(1),
        );
        let sessions = vec![sess("api", "/c/api-v2"), sess("web", "/c/web")];

        let (roots, _) = resolve_repo_roots_incremental(&sessions, Some(&snap), now(), &resolver);

        assert_eq!(roots.len(), 2);
        assert_eq!(
            *resolver.calls.borrow(),
            vec![PathBuf::from("/c/api-v2"), PathBuf::from("/c/web")]
        );
    }

    #[test]
    fn incremental_drops_cached_root_that_no_longer_matches() {
        // Session was renamed away from its repository.
        let resolver = CountingResolver::with(&[("/c/api", "/c/api")]);
        let snap = snapshot(
            vec![sess("scratch", "/c/api")],
            &[("scratch", "/c/api")],
            now() - Duration::minutes(1),
        );
        let sessions = vec![sess("scratch", "/c/api")];

        let (roots, _) = resolve_repo_roots_incremental(&sessions, Some(&snap), now(), &resolver);
        assert!(roots.is_empty());
        assert_eq!(resolver.call_count(), 1);
    }

    #[test]
    fn incremental_expired_stamp_forces_full_resolution() {
        let resolver = CountingResolver::with(&[("/c/api", "/c/api")]);
        let snap = snapshot(
            vec![sess("api", "/c/api")],
            &[("api", "/c/api")],
            now() - Duration::minutes(11),
        );
        let sessions = vec![sess("api", "/c/api")];

        let (_, refreshed) = resolve_repo_roots_incremental(&sessions, Some(&snap), now(), &resolver);
        assert_eq!(refreshed, now());
        assert_eq!(resolver.call_count(), 1);
    }

    #[test]
    fn incremental_missing_stamp_or_roots_forces_full_resolution() {
        let resolver = CountingResolver::with(&[("/c/api", "/c/api")]);
        let sessions = vec![sess("api", "/c/api")];

        let mut no_stamp = snapshot(vec![sess("api", "/c/api")], &[("api", "/c/api")], now());
        no_stamp.repo_roots_refreshed_at = None;
        let (_, refreshed) =
            resolve_repo_roots_incremental(&sessions, Some(&no_stamp), now(), &resolver);
        assert_eq!(refreshed, now());

        let no_roots = snapshot(vec![sess("api", "/c/api")], &[], now() - Duration::minutes(1));
        let (roots, refreshed) =
            resolve_repo_roots_incremental(&sessions, Some(&no_roots), now(), &resolver);
        assert_eq!(refreshed, now());
        assert_eq!(roots.len(), 1);
        assert_eq!(resolver.call_count(), 2);
    }
}
