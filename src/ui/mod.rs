//! Terminal UI: one view at a time, the palette overlay and a help bar.

pub mod agents;
pub mod help_bar;
pub mod input;
pub mod layout;
pub mod notice;
pub mod palette;
pub mod sessions;
pub mod windows;
pub mod worktrees;

use ratatui::{
    style::{Color, Style},
    text::Span,
    Frame,
};

use crate::app::{App, View};
use layout::create_layout_with_help;

/// Gutter with the 1-9 quick-select digit of a row
pub(crate) fn quick_label(index: usize) -> Span<'static> {
    if index < 9 {
        Span::styled(format!("{} ", index + 1), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw("  ")
    }
}

pub fn draw_ui(f: &mut Frame, app: &mut App) {
    let (main_area, help_area) = create_layout_with_help(f.area());

    match app.view {
        View::Sessions => {
            let loading = app.stats_pending();
            sessions::draw_sessions(f, main_area, &mut app.sessions, loading);
        }
        View::Worktrees => worktrees::draw_worktrees(f, main_area, &mut app.worktrees),
        View::Agents => agents::draw_agents(f, main_area, &mut app.agents),
        View::AbPrompt => agents::draw_ab_prompt(f, main_area, &app.ab_prompt, &app.config.ab),
        View::Windows => windows::draw_windows(f, main_area, &mut app.windows),
    }

    if app.palette_active {
        palette::draw_palette(f, main_area, &mut app.palette);
    }

    help_bar::draw_help_bar(f, help_area, app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::harness;
    use crate::app::StartMode;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| draw_ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn sessions_view_shows_grouped_tree() {
        let mut h = harness(StartMode::Sessions);
        h.app.refresh_sessions(chrono::Utc::now());
        let text = screen(&mut h.app);
        assert!(text.contains("Sessions"));
        assert!(text.contains("▾ shop"));
        assert!(text.contains("└ main"));
        assert!(text.contains("notes"));
    }

    #[test]
    fn palette_overlay_lists_commands() {
        let mut h = harness(StartMode::Palette);
        h.app.start();
        let text = screen(&mut h.app);
        assert!(text.contains("Commands"));
        assert!(text.contains("Switch Session"));
    }

    #[test]
    fn notice_replaces_hints() {
        let mut h = harness(StartMode::Sessions);
        h.app.notices.error("wt list failed");
        let text = screen(&mut h.app);
        assert!(text.contains("ERROR"));
        assert!(text.contains("wt list failed"));
    }

    #[test]
    fn every_view_renders() {
        let mut h = harness(StartMode::Sessions);
        h.app.show_worktrees();
        assert!(screen(&mut h.app).contains("feat-cart"));
        h.app.show_agents();
        assert!(screen(&mut h.app).contains("Claude Code"));
        h.app.show_ab_prompt();
        assert!(screen(&mut h.app).contains("Plan mode"));
        h.app.perform(crate::app::Action::OpenProjectPicker);
        assert!(screen(&mut h.app).contains("~/code/shop"));
        h.app.show_windows("shop");
        crate::app::tests::wait_for_windows(&mut h.app);
        let text = screen(&mut h.app);
        assert!(text.contains(" shop "));
        assert!(text.contains("1:edit ●"));
        assert!(text.contains("2:run"));
    }
}
