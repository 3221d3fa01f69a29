//! Key routing: global shortcuts, the palette overlay, then the active view.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, StartMode, View};
use crate::palette::PaletteKeyResult;

fn is_ctrl(key: KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

fn is_plain(key: KeyEvent, c: char) -> bool {
    key.code == KeyCode::Char(c)
        && !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

/// Handle one key press.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if is_ctrl(key, 'c') {
        app.quit();
        return;
    }
    if app.palette_active {
        handle_palette_key(app, key);
        return;
    }

    let editing = app.is_editing();
    if !editing && handle_global_key(app, key) {
        return;
    }
    if editing
        && key.code == KeyCode::Esc
        && app.mode == StartMode::Projects
        && app.sessions.is_picking()
    {
        app.quit();
        return;
    }
    route_to_view(app, key, editing);
}

fn handle_palette_key(app: &mut App, key: KeyEvent) {
    if is_ctrl(key, 'p') {
        app.close_palette();
        return;
    }
    match app.palette.handle_key(key) {
        PaletteKeyResult::Continue => {}
        PaletteKeyResult::Execute(id) => {
            if let Some(action) = app.execute_command(id) {
                app.perform(action);
            }
        }
        PaletteKeyResult::Close => app.close_palette(),
    }
}

/// Shortcuts available whenever no prompt owns the keyboard. Returns true
/// when the key was consumed.
fn handle_global_key(app: &mut App, key: KeyEvent) -> bool {
    if is_ctrl(key, 'p') {
        app.open_palette();
        return true;
    }
    if key.code == KeyCode::Esc {
        app.go_back();
        return true;
    }
    if is_plain(key, 'q') {
        app.quit();
        return true;
    }
    // `w` launches into a window in the agents view.
    if is_plain(key, 'w') && !matches!(app.view, View::Worktrees | View::Agents) {
        app.show_worktrees();
        return true;
    }
    if is_plain(key, 'a') && app.view != View::Agents {
        app.show_agents();
        return true;
    }
    false
}

fn route_to_view(app: &mut App, key: KeyEvent, was_editing: bool) {
    let quick = app.config.quick_select;
    let action = match app.view {
        View::Sessions => app.sessions.handle_key(key, quick),
        View::Worktrees => app.worktrees.handle_key(key, quick),
        View::Agents => app.agents.handle_key(key, quick),
        View::AbPrompt => app.ab_prompt.handle_key(key),
        View::Windows => app.windows.handle_key(key),
    };
    if let Some(action) = action {
        app.perform(action);
    }

    // A prompt opened by a palette command just finished.
    if was_editing && !app.is_editing() && !app.should_quit && app.palette_return() {
        app.return_to_palette();
    }
}
