//! Build the grouped session tree.
//!
//! Sessions that share a repository root are grouped under the repository's
//! name. Sessions outside any repository fall back to name-prefix grouping
//! (`project` adopts `project-dev`). The result is at most two levels deep.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use super::naming::{find_real_parent, is_main_branch, normalize, sort_key, trim_normalized_prefix};
use super::tree::{SessionTree, TreeNode};
use super::RepoRootMap;
use crate::tmux::Session;

/// Build the session tree from the session list and resolved repository roots.
///
/// Pure and deterministic: the same input always yields the same tree.
pub fn build_tree(sessions: &[Session], repo_roots: &RepoRootMap) -> SessionTree {
    let mut sorted: Vec<&Session> = sessions.iter().collect();
    sorted.sort_by_cached_key(|s| (sort_key(&s.name), Reverse(s.activity)));

    let mut repo_groups: BTreeMap<&Path, Vec<&Session>> = BTreeMap::new();
    let mut no_repo: Vec<&Session> = Vec::new();
    for session in sorted {
        match repo_roots.get(&session.name) {
            Some(root) if !root.as_os_str().is_empty() => {
                repo_groups.entry(root.as_path()).or_default().push(session);
            }
            _ => no_repo.push(session),
        }
    }

    let mut tree = SessionTree::new();
    for (root, members) in &repo_groups {
        add_repo_group(&mut tree, root, members);
    }
    add_name_prefix_groups(&mut tree, &no_repo);

    tree.sort_roots_by_activity();
    tree
}

fn add_repo_group(tree: &mut SessionTree, root: &Path, members: &[&Session]) {
    if let [only] = members {
        tree.push_root(TreeNode::session(&only.name, only, 0));
        return;
    }

    let group_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.to_string_lossy().into_owned());
    let norm_group = normalize(&group_name);

    // The first member named like the repository stands in for the group.
    let main_pos = members.iter().position(|s| normalize(&s.name) == norm_group);

    let mut children: Vec<&Session> = members
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != main_pos)
        .map(|(_, s)| *s)
        .collect();
    children.sort_by(|a, b| {
        is_main_branch(&b.name)
            .cmp(&is_main_branch(&a.name))
            .then_with(|| b.activity.cmp(&a.activity))
    });

    let mut parent = match main_pos {
        Some(i) => TreeNode::session(&group_name, members[i], 0),
        None => TreeNode::group_header(&group_name),
    };
    parent.expanded = true;
    let parent_id = tree.push_root(parent);

    for child in children {
        let display = trim_normalized_prefix(&child.name, &norm_group);
        tree.add_child(parent_id, TreeNode::session(display, child, 1));
    }
}

fn add_name_prefix_groups(tree: &mut SessionTree, sessions: &[&Session]) {
    let normalized: Vec<String> = sessions.iter().map(|s| normalize(&s.name)).collect();
    let names: HashSet<String> = normalized.iter().cloned().collect();

    // Normalized name -> first raw session carrying it.
    let mut first_with_norm: HashMap<&str, &str> = HashMap::new();
    for (session, norm) in sessions.iter().zip(&normalized) {
        first_with_norm.entry(norm.as_str()).or_insert(session.name.as_str());
    }

    let mut parent_of: HashMap<&str, &str> = HashMap::new();
    for (session, norm) in sessions.iter().zip(&normalized) {
        let parent = find_real_parent(norm, &names).and_then(|p| first_with_norm.get(p));
        if let Some(&parent) = parent {
            parent_of.insert(session.name.as_str(), parent);
        }
    }

    // Parents are strictly shorter than their children, so this terminates.
    let root_ancestor = |name: &str| -> String {
        let mut current = name;
        while let Some(&parent) = parent_of.get(current) {
            current = parent;
        }
        current.to_string()
    };

    let mut children_of: HashMap<String, Vec<&Session>> = HashMap::new();
    for &session in sessions {
        if parent_of.contains_key(session.name.as_str()) {
            children_of
                .entry(root_ancestor(&session.name))
                .or_default()
                .push(session);
        }
    }

    for &session in sessions {
        if parent_of.contains_key(session.name.as_str()) {
            continue;
        }

        let Some(mut kids) = children_of.remove(&session.name) else {
            tree.push_root(TreeNode::session(&session.name, session, 0));
            continue;
        };

        kids.sort_by(|a, b| b.activity.cmp(&a.activity));
        let mut parent = TreeNode::session(&session.name, session, 0);
        parent.expanded = true;
        let parent_id = tree.push_root(parent);

        let norm_parent = normalize(&session.name);
        for kid in kids {
            let display = trim_normalized_prefix(&kid.name, &norm_parent);
            tree.add_child(parent_id, TreeNode::session(display, kid, 1));
        }
    }
}
