//! Sessions tree view.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

use super::Action;
use crate::cache::DiffStat;
use crate::config::QuickSelectModifier;
use crate::fuzzy::FuzzyFilter;
use crate::input::{quick_select_index, InputKeyResult, TextInput};
use crate::projects::{PickerKeyResult, Project, ProjectPicker};
use crate::topology::{NodeId, NodeKind, SessionTopology, SessionTree, TreeNode};

/// Sub-state of the sessions view
#[derive(Debug, Default)]
pub enum SessionsMode {
    #[default]
    Normal,
    /// Waiting for y/n before killing this session
    ConfirmKill(String),
    Rename {
        old: String,
        input: TextInput,
    },
    /// Flat fuzzy search over every session
    Search(TextInput),
    PickProject(ProjectPicker),
}

/// Identity of a root across rebuilds. Sessions are matched by tmux name,
/// headers by their group name.
fn expansion_key(node: &TreeNode) -> (NodeKind, String) {
    let name = node.session_name().unwrap_or(&node.name);
    (node.kind, name.to_string())
}

#[derive(Debug, Default)]
pub struct SessionsView {
    topology: SessionTopology,
    /// Rows currently listed, tree order or search matches
    visible: Vec<NodeId>,
    selected: usize,
    pub list_state: ListState,
    mode: SessionsMode,
    filter: FuzzyFilter,
}

impl SessionsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topology(&self) -> &SessionTopology {
        &self.topology
    }

    pub fn tree(&self) -> &SessionTree {
        self.topology.tree()
    }

    pub fn mode(&self) -> &SessionsMode {
        &self.mode
    }

    pub fn visible(&self) -> &[NodeId] {
        &self.visible
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.mode, SessionsMode::Search(_))
    }

    pub fn is_picking(&self) -> bool {
        matches!(self.mode, SessionsMode::PickProject(_))
    }

    /// True while a prompt, confirmation, search or picker owns the keyboard
    pub fn is_editing(&self) -> bool {
        !matches!(self.mode, SessionsMode::Normal)
    }

    /// The open project picker, for rendering its scrolled list
    pub fn picker_mut(&mut self) -> Option<&mut ProjectPicker> {
        match &mut self.mode {
            SessionsMode::PickProject(picker) => Some(picker),
            _ => None,
        }
    }

    pub fn selected_node(&self) -> Option<&TreeNode> {
        self.visible
            .get(self.selected)
            .map(|&id| self.topology.tree().node(id))
    }

    pub fn selected_session_name(&self) -> Option<&str> {
        self.selected_node().and_then(TreeNode::session_name)
    }

    /// Install a freshly built tree and return its generation.
    ///
    /// Groups keep their expanded state and the cursor stays on the same
    /// session when it still exists.
    pub fn install_tree(&mut self, mut tree: SessionTree) -> u64 {
        let previous = self.selected_session_name().map(str::to_string);
        let expanded: HashMap<(NodeKind, String), bool> = {
            let old = self.topology.tree();
            old.roots()
                .iter()
                .map(|&id| old.node(id))
                .filter(|node| node.has_children())
                .map(|node| (expansion_key(node), node.expanded))
                .collect()
        };

        for id in tree.roots().to_vec() {
            let node = tree.node(id);
            if expanded
                .get(&expansion_key(node))
                .is_some_and(|&was| was != node.expanded)
            {
                tree.toggle_expanded(id);
            }
        }

        let generation = self.topology.install(tree);
        self.rebuild_visible();
        if let Some(id) = previous.and_then(|name| self.topology.tree().find_session(&name)) {
            if let Some(pos) = self.visible.iter().position(|&v| v == id) {
                self.select(pos);
            }
        }
        generation
    }

    /// Apply background stats; see [`SessionTopology::enrich`].
    pub fn enrich(&mut self, generation: u64, stats: &HashMap<String, DiffStat>) -> bool {
        self.topology.enrich(generation, stats)
    }

    fn rebuild_visible(&mut self) {
        self.visible = match &self.mode {
            SessionsMode::Search(input) => self.search_matches(input.value()),
            _ => self.topology.tree().flatten(),
        };
        self.select(self.selected);
    }

    fn search_matches(&self, query: &str) -> Vec<NodeId> {
        let tree = self.topology.tree();
        let sessions: Vec<NodeId> = tree
            .flatten_all()
            .into_iter()
            .filter(|&id| tree.node(id).is_session())
            .collect();
        let names: Vec<&str> = sessions
            .iter()
            .map(|&id| tree.node(id).session_name.as_str())
            .collect();
        self.filter
            .filter_indices(query, &names, |name| *name)
            .into_iter()
            .map(|i| sessions[i])
            .collect()
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(self.visible.len().saturating_sub(1));
        self.list_state.select(if self.visible.is_empty() {
            None
        } else {
            Some(self.selected)
        });
    }

    fn jump_root(&mut self, forward: bool) {
        let tree = self.topology.tree();
        let is_root = |i: &usize| tree.node(self.visible[*i]).depth == 0;
        let target = if forward {
            (self.selected + 1..self.visible.len()).find(is_root)
        } else {
            (0..self.selected).rev().find(is_root)
        };
        if let Some(index) = target {
            self.select(index);
        }
    }

    /// Ask for confirmation to kill the selected session.
    pub fn begin_kill(&mut self) {
        if let Some(name) = self.selected_session_name() {
            self.mode = SessionsMode::ConfirmKill(name.to_string());
        }
    }

    /// Start renaming the selected session, pre-filled with its name.
    pub fn begin_rename(&mut self) {
        if let Some(name) = self.selected_session_name() {
            self.mode = SessionsMode::Rename {
                old: name.to_string(),
                input: TextInput::with_value(name),
            };
        }
    }

    pub fn begin_search(&mut self) {
        self.mode = SessionsMode::Search(TextInput::new());
        self.rebuild_visible();
        self.select(0);
    }

    fn end_search(&mut self) {
        self.mode = SessionsMode::Normal;
        self.rebuild_visible();
    }

    /// Show the project picker over the tree.
    pub fn open_picker(&mut self, projects: Vec<Project>) {
        let mut picker = ProjectPicker::new();
        picker.set_projects(projects);
        self.mode = SessionsMode::PickProject(picker);
    }

    /// Leave any prompt and go back to browsing the tree.
    pub fn cancel(&mut self) {
        if self.is_searching() {
            self.end_search();
        } else {
            self.mode = SessionsMode::Normal;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, quick: QuickSelectModifier) -> Option<Action> {
        match &mut self.mode {
            SessionsMode::Normal => self.handle_normal(key, quick),
            SessionsMode::ConfirmKill(name) => match key.code {
                KeyCode::Char('y' | 'Y') => {
                    let name = std::mem::take(name);
                    self.mode = SessionsMode::Normal;
                    Some(Action::KillSession(name))
                }
                KeyCode::Char('n' | 'N') | KeyCode::Esc => {
                    self.mode = SessionsMode::Normal;
                    None
                }
                _ => None,
            },
            SessionsMode::Rename { old, input } => match key.code {
                KeyCode::Enter => {
                    let new_name = input.value().trim().to_string();
                    let old = std::mem::take(old);
                    self.mode = SessionsMode::Normal;
                    (!new_name.is_empty() && new_name != old)
                        .then_some(Action::RenameSession { old, new_name })
                }
                KeyCode::Esc => {
                    self.mode = SessionsMode::Normal;
                    None
                }
                _ => {
                    input.handle_key(key);
                    None
                }
            },
            SessionsMode::Search(input) => {
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                match key.code {
                    KeyCode::Enter => {
                        let name = self.selected_session_name()?.to_string();
                        self.end_search();
                        Some(Action::SwitchSession(name))
                    }
                    KeyCode::Esc => {
                        self.end_search();
                        None
                    }
                    KeyCode::Up => {
                        self.select(self.selected.saturating_sub(1));
                        None
                    }
                    KeyCode::Char('k') if ctrl => {
                        self.select(self.selected.saturating_sub(1));
                        None
                    }
                    KeyCode::Down => {
                        self.select(self.selected + 1);
                        None
                    }
                    KeyCode::Char('j') if ctrl => {
                        self.select(self.selected + 1);
                        None
                    }
                    _ => {
                        if input.handle_key(key) == InputKeyResult::Changed {
                            self.rebuild_visible();
                            self.select(0);
                        }
                        None
                    }
                }
            }
            SessionsMode::PickProject(picker) => match picker.handle_key(key) {
                PickerKeyResult::Continue => None,
                PickerKeyResult::Cancel => {
                    self.mode = SessionsMode::Normal;
                    None
                }
                PickerKeyResult::Open(project) => {
                    self.mode = SessionsMode::Normal;
                    Some(Action::OpenProject(project))
                }
            },
        }
    }

    fn handle_normal(&mut self, key: KeyEvent, quick: QuickSelectModifier) -> Option<Action> {
        if let Some(index) = quick_select_index(key, quick) {
            if index < self.visible.len() {
                self.select(index);
            }
            return None;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.select(self.selected + 1),
            KeyCode::Char('k') | KeyCode::Up => self.select(self.selected.saturating_sub(1)),
            KeyCode::Char('g') | KeyCode::Home => self.select(0),
            KeyCode::Char('G') | KeyCode::End => self.select(usize::MAX),
            KeyCode::Char('J') => self.jump_root(true),
            KeyCode::Char('K') => self.jump_root(false),
            KeyCode::Enter => {
                return self
                    .selected_session_name()
                    .map(|name| Action::SwitchSession(name.to_string()));
            }
            KeyCode::Char(' ') => {
                if let Some(&id) = self.visible.get(self.selected) {
                    if self.topology.tree().node(id).has_children() {
                        self.topology.toggle_expanded(id);
                        self.rebuild_visible();
                    }
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                return self
                    .selected_session_name()
                    .map(|name| Action::ShowWindows(name.to_string()));
            }
            KeyCode::Char('/') => self.begin_search(),
            KeyCode::Char('d') => self.begin_kill(),
            KeyCode::Char('r') => self.begin_rename(),
            KeyCode::Char('n') => return Some(Action::OpenProjectPicker),
            _ => {}
        }
        None
    }
}
