//! Windows of a single session.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::ListState;

use super::Action;
use crate::config::QuickSelectModifier;
use crate::input::quick_select_index;
use crate::tmux::{Window, WindowSource};

/// Windows loaded for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowsUpdate {
    pub session: String,
    pub windows: Vec<Window>,
}

/// List the windows of `session` on a background thread.
///
/// A failed listing is logged and delivered as an empty list.
pub fn spawn_windows_load(
    session: String,
    source: Arc<dyn WindowSource>,
    tx: Sender<WindowsUpdate>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let windows = source.list_windows(&session).unwrap_or_else(|err| {
            tracing::warn!(error = %err, %session, "failed to list windows");
            Vec::new()
        });
        if tx.send(WindowsUpdate { session, windows }).is_err() {
            tracing::debug!("windows receiver gone");
        }
    })
}

#[derive(Debug, Default)]
pub struct WindowsView {
    /// Session whose windows are shown or being loaded
    session: String,
    windows: Vec<Window>,
    loading: bool,
    selected: usize,
    pub list_state: ListState,
}

impl WindowsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Window> {
        self.windows.get(self.selected)
    }

    /// Point the view at `session`.
    ///
    /// Returns `false` when that session is already shown, in which case no
    /// load is needed. Otherwise the list is cleared until
    /// [`apply_loaded`](Self::apply_loaded) delivers it.
    pub fn load_session(&mut self, session: &str) -> bool {
        if session == self.session {
            return false;
        }
        self.session = session.to_string();
        self.windows.clear();
        self.loading = true;
        self.select(0);
        true
    }

    /// Install loaded windows. A load for a session the view has since left
    /// is dropped and `false` returned.
    pub fn apply_loaded(&mut self, update: WindowsUpdate) -> bool {
        if update.session != self.session {
            return false;
        }
        self.windows = update.windows;
        self.loading = false;
        self.select(self.selected);
        true
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(self.windows.len().saturating_sub(1));
        self.list_state.select(if self.windows.is_empty() {
            None
        } else {
            Some(self.selected)
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        // Bare digits are free for tmux bindings here, so only Alt+digit moves.
        if let Some(index) = quick_select_index(key, QuickSelectModifier::Alt) {
            if index < self.windows.len() {
                self.select(index);
            }
            return None;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.select(self.selected + 1),
            KeyCode::Char('k') | KeyCode::Up => self.select(self.selected.saturating_sub(1)),
            KeyCode::Char('g') | KeyCode::Home => self.select(0),
            KeyCode::Char('G') | KeyCode::End => self.select(usize::MAX),
            KeyCode::Enter => {
                return self.selected().map(|w| Action::SwitchWindow(w.target()));
            }
            KeyCode::Char('h') | KeyCode::Left => return Some(Action::BackToSessions),
            _ => {}
        }
        None
    }
}
