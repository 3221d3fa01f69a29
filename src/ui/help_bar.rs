//! One-line help bar: the current notice, or key hints for the active view.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, SessionsMode, View, WorktreesMode};

/// Key hints for the current state, as (key, label) pairs
pub fn hints(app: &App) -> &'static [(&'static str, &'static str)] {
    if app.palette_active {
        return &[
            ("Enter", "run"),
            ("↑/↓", "move"),
            ("Alt+1-9", "run nth"),
            ("Esc", "close"),
        ];
    }
    match app.view {
        View::Sessions => match app.sessions.mode() {
            SessionsMode::Normal => &[
                ("Enter", "switch"),
                ("Space", "fold"),
                ("l", "windows"),
                ("/", "search"),
                ("d", "kill"),
                ("r", "rename"),
                ("n", "project"),
                ("w", "worktrees"),
                ("a", "agents"),
                ("C-p", "commands"),
                ("q", "quit"),
            ],
            SessionsMode::ConfirmKill(_) => &[("y", "kill"), ("n/Esc", "cancel")],
            SessionsMode::Rename { .. } => &[("Enter", "rename"), ("Esc", "cancel")],
            SessionsMode::Search(_) | SessionsMode::PickProject(_) => {
                &[("Enter", "open"), ("↑/↓", "move"), ("Esc", "cancel")]
            }
        },
        View::Worktrees => match app.worktrees.mode() {
            WorktreesMode::Normal => &[
                ("Enter", "switch"),
                ("n", "new"),
                ("N", "describe"),
                ("d", "remove"),
                ("m", "merge"),
                ("c", "commit"),
                ("a", "agents"),
                ("Esc", "back"),
            ],
            WorktreesMode::ConfirmRemove(_) => &[("y", "remove"), ("n/Esc", "cancel")],
            WorktreesMode::Describe(_) => &[("Enter", "generate branch"), ("Esc", "cancel")],
            WorktreesMode::Create(_) | WorktreesMode::ConfirmBranch(_) => {
                &[("Enter", "create"), ("Esc", "cancel")]
            }
        },
        View::Agents => &[
            ("Enter", "pane"),
            ("s", "split"),
            ("w", "window"),
            ("Tab", "mode"),
            ("C-p", "commands"),
            ("Esc", "back"),
        ],
        View::AbPrompt => &[("Enter", "launch"), ("Tab", "plan mode"), ("Esc", "back")],
        View::Windows => &[
            ("Enter", "switch"),
            ("Alt+1-9", "select"),
            ("h", "sessions"),
            ("Esc", "back"),
            ("q", "quit"),
        ],
    }
}

pub fn draw_help_bar(f: &mut Frame, area: Rect, app: &App) {
    if let Some(notice) = app.notices.current() {
        let msg = Paragraph::new(Line::from(vec![
            Span::styled(
                notice.level.label(),
                Style::default().fg(Color::Black).bg(notice.level.color()),
            ),
            Span::raw(format!(" {}", notice.message)),
        ]))
        .style(Style::default().bg(Color::DarkGray));
        f.render_widget(msg, area);
        return;
    }

    let spans: Vec<Span> = hints(app)
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(
                    format!(" {key} "),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{label} "), Style::default().fg(Color::White)),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
