//! Worktrees view.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;

use super::Action;
use crate::config::QuickSelectModifier;
use crate::input::{clicked_row, quick_select_index, TextInput};
use crate::worktree::branch::generate_branch_name;
use crate::worktree::Worktree;

/// Sub-state of the worktrees view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WorktreesMode {
    #[default]
    Normal,
    /// Waiting for y/n before removing this branch's worktree
    ConfirmRemove(String),
    /// Typing a branch name for a new worktree
    Create(TextInput),
    /// Typing a task description to derive a branch name from
    Describe(TextInput),
    /// Editing the branch name generated from a description
    ConfirmBranch(TextInput),
}

#[derive(Debug, Default)]
pub struct WorktreesView {
    worktrees: Vec<Worktree>,
    selected: usize,
    pub list_state: ListState,
    /// Where the worktree list was last drawn
    pub list_area: Rect,
    mode: WorktreesMode,
}

impl WorktreesView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn worktrees(&self) -> &[Worktree] {
        &self.worktrees
    }

    pub fn mode(&self) -> &WorktreesMode {
        &self.mode
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Worktree> {
        self.worktrees.get(self.selected)
    }

    pub fn is_editing(&self) -> bool {
        self.mode != WorktreesMode::Normal
    }

    pub fn set_worktrees(&mut self, worktrees: Vec<Worktree>) {
        self.worktrees = worktrees;
        self.select(self.selected);
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(self.worktrees.len().saturating_sub(1));
        self.list_state.select(if self.worktrees.is_empty() {
            None
        } else {
            Some(self.selected)
        });
    }

    pub fn begin_create(&mut self) {
        self.mode = WorktreesMode::Create(TextInput::new());
    }

    pub fn begin_describe(&mut self) {
        self.mode = WorktreesMode::Describe(TextInput::new());
    }

    /// Ask to remove the selected worktree.
    ///
    /// Returns `false` when nothing removable is selected; the main and the
    /// current worktree are never removed.
    pub fn begin_remove(&mut self) -> bool {
        match self.selected() {
            Some(wt) if wt.is_removable() => {
                self.mode = WorktreesMode::ConfirmRemove(wt.branch.clone());
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.mode = WorktreesMode::Normal;
    }

    /// Wheel moves the selection; releasing the left button over a worktree
    /// switches to it. Ignored while a prompt is open.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<Action> {
        if self.is_editing() {
            return None;
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => self.select(self.selected.saturating_sub(1)),
            MouseEventKind::ScrollDown => self.select(self.selected + 1),
            MouseEventKind::Up(MouseButton::Left) => {
                let offset = self.list_state.offset();
                return clicked_row(self.list_area, offset, mouse.column, mouse.row)
                    .and_then(|index| self.worktrees.get(index))
                    .map(|wt| Action::SwitchWorktree(wt.branch.clone()));
            }
            _ => {}
        }
        None
    }

    pub fn handle_key(&mut self, key: KeyEvent, quick: QuickSelectModifier) -> Option<Action> {
        match &mut self.mode {
            WorktreesMode::Normal => self.handle_normal(key, quick),
            WorktreesMode::ConfirmRemove(branch) => match key.code {
                KeyCode::Char('y' | 'Y') => {
                    let branch = std::mem::take(branch);
                    self.mode = WorktreesMode::Normal;
                    Some(Action::RemoveWorktree(branch))
                }
                KeyCode::Char('n' | 'N') | KeyCode::Esc => {
                    self.mode = WorktreesMode::Normal;
                    None
                }
                _ => None,
            },
            WorktreesMode::Create(input) | WorktreesMode::ConfirmBranch(input) => match key.code {
                KeyCode::Enter => {
                    let branch = input.value().trim().to_string();
                    self.mode = WorktreesMode::Normal;
                    (!branch.is_empty()).then_some(Action::CreateWorktree(branch))
                }
                KeyCode::Esc => {
                    self.mode = WorktreesMode::Normal;
                    None
                }
                _ => {
                    input.handle_key(key);
                    None
                }
            },
            WorktreesMode::Describe(input) => match key.code {
                KeyCode::Enter => {
                    let description = input.value().trim().to_string();
                    self.mode = if description.is_empty() {
                        WorktreesMode::Normal
                    } else {
                        WorktreesMode::ConfirmBranch(TextInput::with_value(generate_branch_name(
                            &description,
                        )))
                    };
                    None
                }
                KeyCode::Esc => {
                    self.mode = WorktreesMode::Normal;
                    None
                }
                _ => {
                    input.handle_key(key);
                    None
                }
            },
        }
    }

    fn handle_normal(&mut self, key: KeyEvent, quick: QuickSelectModifier) -> Option<Action> {
        if let Some(index) = quick_select_index(key, quick) {
            return self
                .worktrees
                .get(index)
                .map(|wt| Action::SwitchWorktree(wt.branch.clone()));
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.select(self.selected + 1),
            KeyCode::Char('k') | KeyCode::Up => self.select(self.selected.saturating_sub(1)),
            KeyCode::Char('g') | KeyCode::Home => self.select(0),
            KeyCode::Char('G') | KeyCode::End => self.select(usize::MAX),
            KeyCode::Enter => {
                return self
                    .selected()
                    .map(|wt| Action::SwitchWorktree(wt.branch.clone()));
            }
            KeyCode::Char('n') => self.begin_create(),
            KeyCode::Char('N') => self.begin_describe(),
            KeyCode::Char('d') => {
                if !self.begin_remove() && self.selected().is_some() {
                    return Some(Action::Notify(
                        "The main and current worktrees cannot be removed".into(),
                    ));
                }
            }
            KeyCode::Char('m') => return Some(Action::popup("wt merge", "80%", "80%")),
            KeyCode::Char('c') => return Some(Action::popup("wt step commit", "80%", "80%")),
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn ch(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn wt(branch: &str, is_main: bool, is_current: bool) -> Worktree {
        Worktree {
            branch: branch.to_string(),
            path: format!("/code/shop.{branch}"),
            is_main,
            is_current,
            ..Worktree::default()
        }
    }

    fn view() -> WorktreesView {
        let mut view = WorktreesView::new();
        view.set_worktrees(vec![
            wt("main", true, false),
            wt("feat-cart", false, true),
            wt("fix-tax", false, false),
        ]);
        view
    }

    fn press(view: &mut WorktreesView, key: KeyEvent) -> Option<Action> {
        view.handle_key(key, QuickSelectModifier::None)
    }

    fn type_str(view: &mut WorktreesView, text: &str) {
        for c in text.chars() {
            press(view, ch(c));
        }
    }

    #[test]
    fn enter_and_digits_switch() {
        let mut view = view();
        press(&mut view, ch('j'));
        assert_eq!(
            press(&mut view, key(KeyCode::Enter)),
            Some(Action::SwitchWorktree("feat-cart".into()))
        );
        assert_eq!(
            press(&mut view, ch('3')),
            Some(Action::SwitchWorktree("fix-tax".into()))
        );
        assert_eq!(press(&mut view, ch('4')), None);
    }

    #[test]
    fn main_and_current_cannot_be_removed() {
        let mut view = view();
        assert!(matches!(press(&mut view, ch('d')), Some(Action::Notify(_))));
        assert!(!view.is_editing());

        press(&mut view, ch('j'));
        press(&mut view, ch('d'));
        assert!(!view.is_editing());

        press(&mut view, ch('j'));
        assert_eq!(press(&mut view, ch('d')), None);
        assert_eq!(view.mode(), &WorktreesMode::ConfirmRemove("fix-tax".into()));
        assert_eq!(
            press(&mut view, ch('y')),
            Some(Action::RemoveWorktree("fix-tax".into()))
        );
        assert!(!view.is_editing());
    }

    #[test]
    fn create_from_typed_branch() {
        let mut view = view();
        press(&mut view, ch('n'));
        type_str(&mut view, "feat-login");
        assert_eq!(
            press(&mut view, key(KeyCode::Enter)),
            Some(Action::CreateWorktree("feat-login".into()))
        );
    }

    #[test]
    fn blank_branch_creates_nothing() {
        let mut view = view();
        press(&mut view, ch('n'));
        type_str(&mut view, "  ");
        assert_eq!(press(&mut view, key(KeyCode::Enter)), None);
        assert!(!view.is_editing());
    }

    #[test]
    fn describe_generates_editable_branch() {
        let mut view = view();
        press(&mut view, ch('N'));
        type_str(&mut view, "add dark mode");
        assert_eq!(press(&mut view, key(KeyCode::Enter)), None);

        let WorktreesMode::ConfirmBranch(input) = view.mode() else {
            panic!("expected branch confirmation, got {:?}", view.mode());
        };
        let generated = input.value().to_string();
        assert!(generated.starts_with("feat/"), "{generated}");

        press(&mut view, ch('2'));
        assert_eq!(
            press(&mut view, key(KeyCode::Enter)),
            Some(Action::CreateWorktree(format!("{generated}2")))
        );
    }

    #[test]
    fn popups_for_merge_and_commit() {
        let mut view = view();
        assert_eq!(
            press(&mut view, ch('m')),
            Some(Action::popup("wt merge", "80%", "80%"))
        );
        assert_eq!(
            press(&mut view, ch('c')),
            Some(Action::popup("wt step commit", "80%", "80%"))
        );
    }

    #[test]
    fn esc_cancels_prompts() {
        let mut view = view();
        press(&mut view, ch('N'));
        press(&mut view, key(KeyCode::Esc));
        assert!(!view.is_editing());
    }

    #[test]
    fn shrinking_list_clamps_selection() {
        let mut view = view();
        press(&mut view, ch('G'));
        view.set_worktrees(vec![wt("main", true, true)]);
        assert_eq!(view.selected_index(), 0);
        view.set_worktrees(Vec::new());
        assert!(view.selected().is_none());
        assert_eq!(press(&mut view, key(KeyCode::Enter)), None);
    }

    fn mouse(kind: MouseEventKind, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: 3,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn mouse_scrolls_and_click_switches() {
        let mut view = view();
        view.list_area = Rect::new(1, 1, 30, 6);

        view.handle_mouse(mouse(MouseEventKind::ScrollDown, 0));
        assert_eq!(view.selected_index(), 1);
        view.handle_mouse(mouse(MouseEventKind::ScrollUp, 0));
        view.handle_mouse(mouse(MouseEventKind::ScrollUp, 0));
        assert_eq!(view.selected_index(), 0);

        assert_eq!(
            view.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 3)),
            Some(Action::SwitchWorktree("fix-tax".into()))
        );
        assert_eq!(
            view.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 5)),
            None
        );
    }

    #[test]
    fn mouse_is_ignored_while_prompting() {
        let mut view = view();
        view.list_area = Rect::new(1, 1, 30, 6);
        view.begin_create();
        assert_eq!(
            view.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 1)),
            None
        );
        view.handle_mouse(mouse(MouseEventKind::ScrollDown, 0));
        assert_eq!(view.selected_index(), 0);
    }
}
