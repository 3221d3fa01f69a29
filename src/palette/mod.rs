//! Command palette state.
//!
//! The registry is ranked by recency once per [`PaletteState::reset`]; each
//! query change filters that ranked list without re-ranking it.

pub mod commands;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;

use crate::config::QuickSelectModifier;
use crate::fuzzy::FuzzyFilter;
use crate::input::{clicked_row, quick_select_index, InputKeyResult, TextInput};
use crate::recency::rank_by_recency;

pub use commands::{default_commands, find_command, is_valid_command, Category, Command};

/// Result of handling a key in the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKeyResult {
    Continue,
    /// Run the command with this id
    Execute(&'static str),
    Close,
}

#[derive(Debug)]
pub struct PaletteState {
    /// Registry in recency order
    ranked: Vec<Command>,
    /// Commands matching the current query
    filtered: Vec<Command>,
    pub input: TextInput,
    selected: usize,
    pub list_state: ListState,
    /// Where the command list was last drawn
    pub list_area: Rect,
    filter: FuzzyFilter,
}

impl Default for PaletteState {
    fn default() -> Self {
        Self::new()
    }
}

impl PaletteState {
    pub fn new() -> Self {
        let ranked = default_commands();
        Self {
            filtered: ranked.clone(),
            ranked,
            input: TextInput::new(),
            selected: 0,
            list_state: ListState::default().with_selected(Some(0)),
            list_area: Rect::default(),
            filter: FuzzyFilter::new(),
        }
    }

    /// Re-rank the registry and clear query and selection.
    pub fn reset(&mut self, timestamps: &HashMap<String, DateTime<Utc>>) {
        self.ranked = rank_by_recency(default_commands(), timestamps, |c| c.id);
        self.input.clear();
        self.refilter();
    }

    pub fn query(&self) -> &str {
        self.input.value()
    }

    pub fn set_query(&mut self, query: &str) {
        self.input.set_value(query);
        self.refilter();
    }

    pub fn filtered(&self) -> &[Command] {
        &self.filtered
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Command> {
        self.filtered.get(self.selected)
    }

    fn refilter(&mut self) {
        self.filtered = self
            .filter
            .filter(self.input.value(), &self.ranked, |c| c.title);
        self.select(0);
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(self.filtered.len().saturating_sub(1));
        self.list_state.select(if self.filtered.is_empty() {
            None
        } else {
            Some(self.selected)
        });
    }

    pub fn move_down(&mut self) {
        self.select(self.selected + 1);
    }

    pub fn move_up(&mut self) {
        self.select(self.selected.saturating_sub(1));
    }

    /// Wheel moves the selection; releasing the left button over a command
    /// runs it.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> PaletteKeyResult {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.move_up(),
            MouseEventKind::ScrollDown => self.move_down(),
            MouseEventKind::Up(MouseButton::Left) => {
                let offset = self.list_state.offset();
                let clicked = clicked_row(self.list_area, offset, mouse.column, mouse.row)
                    .and_then(|index| self.filtered.get(index));
                if let Some(cmd) = clicked {
                    return PaletteKeyResult::Execute(cmd.id);
                }
            }
            _ => {}
        }
        PaletteKeyResult::Continue
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PaletteKeyResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // The query is free text, so digits only quick-select with Alt.
        if let Some(index) = quick_select_index(key, QuickSelectModifier::Alt) {
            return match self.filtered.get(index) {
                Some(cmd) => PaletteKeyResult::Execute(cmd.id),
                None => PaletteKeyResult::Continue,
            };
        }

        match key.code {
            KeyCode::Esc => PaletteKeyResult::Close,
            KeyCode::Enter => match self.selected() {
                Some(cmd) => PaletteKeyResult::Execute(cmd.id),
                None => PaletteKeyResult::Continue,
            },
            KeyCode::Up => {
                self.move_up();
                PaletteKeyResult::Continue
            }
            KeyCode::Down => {
                self.move_down();
                PaletteKeyResult::Continue
            }
            KeyCode::Char('k') if ctrl => {
                self.move_up();
                PaletteKeyResult::Continue
            }
            KeyCode::Char('j') if ctrl => {
                self.move_down();
                PaletteKeyResult::Continue
            }
            _ => {
                if self.input.handle_key(key) == InputKeyResult::Changed {
                    self.refilter();
                }
                PaletteKeyResult::Continue
            }
        }
    }
}
