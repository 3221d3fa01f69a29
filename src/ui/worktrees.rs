use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::input::input_line;
use super::quick_label;
use crate::app::{WorktreesMode, WorktreesView};
use crate::worktree::Worktree;

pub fn draw_worktrees(f: &mut Frame, area: Rect, view: &mut WorktreesView) {
    let block = Block::default()
        .title(" Worktrees ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(inner);
    let (list_area, prompt_area) = (chunks[0], chunks[1]);
    view.list_area = list_area;

    let width = prompt_area.width;
    let prompt = match view.mode() {
        WorktreesMode::Normal => None,
        WorktreesMode::ConfirmRemove(branch) => Some(Line::from(vec![
            Span::styled(" REMOVE ", Style::default().fg(Color::Black).bg(Color::Red)),
            Span::raw(format!(" {branch}? (y/n)")),
        ])),
        WorktreesMode::Create(input) => Some(input_line("New branch: ", input, width, true)),
        WorktreesMode::Describe(input) => Some(input_line("Describe: ", input, width, true)),
        WorktreesMode::ConfirmBranch(input) => Some(input_line("Branch: ", input, width, true)),
    };
    if let Some(prompt) = prompt {
        f.render_widget(Paragraph::new(prompt), prompt_area);
    }

    if view.worktrees().is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "No worktrees (is this a git repository with wt installed?)",
                Style::default().fg(Color::DarkGray),
            )),
            list_area,
        );
        return;
    }

    let items: Vec<ListItem<'static>> = view
        .worktrees()
        .iter()
        .enumerate()
        .map(|(i, wt)| worktree_item(wt, i))
        .collect();
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, list_area, &mut view.list_state);
}

fn worktree_item(wt: &Worktree, index: usize) -> ListItem<'static> {
    let marker = if wt.is_current {
        Span::styled("● ", Style::default().fg(Color::Green))
    } else {
        Span::raw("  ")
    };
    let mut spans = vec![
        quick_label(index),
        marker,
        Span::styled(wt.label().to_string(), Style::default().fg(Color::White)),
    ];

    if wt.is_main {
        spans.push(Span::styled(" (main)", Style::default().fg(Color::Magenta)));
    }
    if !wt.commit.short_sha.is_empty() {
        spans.push(Span::styled(
            format!(" {}", wt.commit.short_sha),
            Style::default().fg(Color::Yellow),
        ));
    }

    let diff = wt.working_tree.diff;
    if diff.added > 0 || diff.deleted > 0 {
        spans.push(Span::styled(
            format!(" +{}", diff.added),
            Style::default().fg(Color::Green),
        ));
        spans.push(Span::styled(
            format!(" -{}", diff.deleted),
            Style::default().fg(Color::Red),
        ));
    }
    if wt.remote.ahead > 0 {
        spans.push(Span::styled(
            format!(" ↑{}", wt.remote.ahead),
            Style::default().fg(Color::Cyan),
        ));
    }
    if wt.remote.behind > 0 {
        spans.push(Span::styled(
            format!(" ↓{}", wt.remote.behind),
            Style::default().fg(Color::Cyan),
        ));
    }
    if !wt.commit.message.is_empty() {
        let subject = wt.commit.message.lines().next().unwrap_or_default();
        spans.push(Span::styled(
            format!("  {subject}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    ListItem::new(Line::from(spans))
}
