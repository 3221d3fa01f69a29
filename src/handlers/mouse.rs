//! Mouse routing: the palette overlay, then the worktrees list.

use crossterm::event::MouseEvent;

use crate::app::{App, View};
use crate::palette::PaletteKeyResult;

pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.palette_active {
        if let PaletteKeyResult::Execute(id) = app.palette.handle_mouse(mouse) {
            if let Some(action) = app.execute_command(id) {
                app.perform(action);
            }
        }
        return;
    }
    if app.view == View::Worktrees {
        if let Some(action) = app.worktrees.handle_mouse(mouse) {
            app.perform(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::harness;
    use crate::app::StartMode;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEventKind};
    use ratatui::layout::Rect;

    fn mouse(kind: MouseEventKind, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: 12,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn clicking_a_palette_row_runs_it() {
        let mut h = harness(StartMode::Palette);
        h.app.start();
        h.app.palette.list_area = Rect::new(10, 4, 40, 8);

        handle_mouse_event(&mut h.app, mouse(MouseEventKind::ScrollDown, 0));
        assert!(h.app.palette_active);
        assert_eq!(h.app.palette.selected_index(), 1);

        // First row is switch_session.
        handle_mouse_event(&mut h.app, mouse(MouseEventKind::Up(MouseButton::Left), 4));
        assert!(!h.app.palette_active);
        assert_eq!(h.app.view, View::Sessions);
        assert!(!h.app.should_quit);
    }

    #[test]
    fn wheel_outside_palette_moves_worktree_selection() {
        let mut h = harness(StartMode::Sessions);
        h.app.show_worktrees();
        handle_mouse_event(&mut h.app, mouse(MouseEventKind::ScrollDown, 0));
        assert_eq!(h.app.worktrees.selected_index(), 1);

        h.app.show_agents();
        handle_mouse_event(&mut h.app, mouse(MouseEventKind::ScrollUp, 0));
        assert_eq!(h.app.worktrees.selected_index(), 1);
    }
}
