//! Arena-backed session tree.
//!
//! Nodes live in a flat `Vec` and reference their children by [`NodeId`].
//! The tree is at most two levels deep: roots at depth 0, children at depth 1.

use std::collections::HashMap;

use crate::cache::DiffStat;
use crate::tmux::Session;

/// Index of a node inside a [`SessionTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A real tmux session
    Session,
    /// A virtual parent for repository members that have no main session
    GroupHeader,
}

/// A single row of the session tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub kind: NodeKind,
    /// Name shown in the tree (children are shown without their group prefix)
    pub name: String,
    /// Underlying tmux session name, empty for group headers
    pub session_name: String,
    pub windows: u32,
    pub attached: bool,
    pub children: Vec<NodeId>,
    pub expanded: bool,
    pub depth: u8,
    /// Most recent activity of this node and its children
    pub activity: i64,
    pub added: u32,
    pub deleted: u32,
}

impl TreeNode {
    pub(crate) fn session(display: &str, session: &Session, depth: u8) -> Self {
        Self {
            kind: NodeKind::Session,
            name: display.to_string(),
            session_name: session.name.clone(),
            windows: session.windows,
            attached: session.attached,
            children: Vec::new(),
            expanded: false,
            depth,
            activity: session.activity,
            added: 0,
            deleted: 0,
        }
    }

    pub(crate) fn group_header(name: &str) -> Self {
        Self {
            kind: NodeKind::GroupHeader,
            name: name.to_string(),
            session_name: String::new(),
            windows: 0,
            attached: false,
            children: Vec::new(),
            expanded: false,
            depth: 0,
            activity: 0,
            added: 0,
            deleted: 0,
        }
    }

    pub fn is_session(&self) -> bool {
        self.kind == NodeKind::Session
    }

    /// The tmux session behind this node, if any
    pub fn session_name(&self) -> Option<&str> {
        self.is_session().then_some(self.session_name.as_str())
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn has_stats(&self) -> bool {
        self.added > 0 || self.deleted > 0
    }
}

/// Grouped, ordered view of the current sessions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTree {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

impl SessionTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_root(&mut self, node: TreeNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.roots.push(id);
        id
    }

    /// Attach a depth-1 child, raising the parent's activity if needed.
    pub(crate) fn add_child(&mut self, parent: NodeId, mut node: TreeNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.depth = 1;
        let activity = node.activity;
        self.nodes.push(node);

        let parent = &mut self.nodes[parent.0];
        parent.children.push(id);
        parent.activity = parent.activity.max(activity);
        id
    }

    /// Stable sort of the roots by most recent activity first.
    pub(crate) fn sort_roots_by_activity(&mut self) {
        let nodes = &self.nodes;
        self.roots
            .sort_by(|a, b| nodes[b.0].activity.cmp(&nodes[a.0].activity));
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Node lookup. Ids are only handed out by this tree, so they are always valid.
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Total number of nodes, group headers included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Visible rows: every root, followed by its children when expanded.
    pub fn flatten(&self) -> Vec<NodeId> {
        self.walk(false)
    }

    /// Every row regardless of expansion.
    pub fn flatten_all(&self) -> Vec<NodeId> {
        self.walk(true)
    }

    fn walk(&self, include_collapsed: bool) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            out.push(root);
            let node = &self.nodes[root.0];
            if include_collapsed || node.expanded {
                out.extend(node.children.iter().copied());
            }
        }
        out
    }

    /// Flip the expanded flag of a node with children. Returns the new state,
    /// or `false` for nodes that cannot expand.
    pub fn toggle_expanded(&mut self, id: NodeId) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) if node.has_children() => {
                node.expanded = !node.expanded;
                node.expanded
            }
            _ => false,
        }
    }

    /// Find the node for a tmux session by its raw name.
    pub fn find_session(&self, session_name: &str) -> Option<NodeId> {
        self.flatten_all().into_iter().find(|id| {
            let node = &self.nodes[id.0];
            node.is_session() && node.session_name == session_name
        })
    }

    /// Copy diff stats onto matching root and child nodes.
    ///
    /// Nodes without an entry keep their current counts.
    pub fn apply_stats(&mut self, stats: &HashMap<String, DiffStat>) {
        if stats.is_empty() {
            return;
        }
        for id in self.flatten_all() {
            let node = &mut self.nodes[id.0];
            if !node.is_session() {
                continue;
            }
            if let Some(stat) = stats.get(&node.session_name) {
                node.added = stat.added;
                node.deleted = stat.deleted;
            }
        }
    }
}
