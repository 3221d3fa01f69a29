//! Sessions view: the grouped tree, session search and the project picker.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::input::input_line;
use super::layout::input_and_list;
use super::quick_label;
use crate::app::{SessionsMode, SessionsView};
use crate::topology::{NodeId, SessionTree};

pub fn draw_sessions(f: &mut Frame, area: Rect, view: &mut SessionsView, loading_stats: bool) {
    if view.is_picking() {
        draw_project_picker(f, area, view);
        return;
    }

    let title = match (view.is_searching(), loading_stats) {
        (true, _) => " Sessions: search ",
        (false, true) => " Sessions (loading stats) ",
        (false, false) => " Sessions ",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(inner);
    let (mut list_area, prompt_area) = (chunks[0], chunks[1]);

    let prompt = match view.mode() {
        SessionsMode::Search(input) => {
            let (input_area, rest) = input_and_list(inner);
            f.render_widget(
                Paragraph::new(input_line("/ ", input, input_area.width, true)),
                input_area,
            );
            list_area = rest;
            None
        }
        SessionsMode::ConfirmKill(name) => Some(Line::from(vec![
            Span::styled(" KILL ", Style::default().fg(Color::Black).bg(Color::Red)),
            Span::raw(format!(" {name}? (y/n)")),
        ])),
        SessionsMode::Rename { old, input } => {
            Some(input_line(&format!("Rename {old}: "), input, prompt_area.width, true))
        }
        SessionsMode::Normal | SessionsMode::PickProject(_) => {
            list_area = inner;
            None
        }
    };
    if let Some(prompt) = prompt {
        f.render_widget(Paragraph::new(prompt), prompt_area);
    }

    if view.visible().is_empty() {
        let empty = if view.is_searching() {
            "No matching sessions"
        } else {
            "No tmux sessions"
        };
        f.render_widget(
            Paragraph::new(Span::styled(empty, Style::default().fg(Color::DarkGray))),
            list_area,
        );
        return;
    }

    let flat = view.is_searching();
    let items: Vec<ListItem<'static>> = view
        .visible()
        .iter()
        .enumerate()
        .map(|(i, &id)| tree_item(view.tree(), id, i, flat))
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

/// One tree row. `flat` rows show the raw session name without nesting.
fn tree_item(tree: &SessionTree, id: NodeId, index: usize, flat: bool) -> ListItem<'static> {
    let node = tree.node(id);
    let mut spans = vec![quick_label(index)];

    let name = if flat {
        node.session_name.clone()
    } else {
        let marker = match (node.depth, node.has_children(), node.expanded) {
            (1, _, _) => "  └ ",
            (_, true, true) => "▾ ",
            (_, true, false) => "▸ ",
            _ => "  ",
        };
        spans.push(Span::styled(marker, Style::default().fg(Color::DarkGray)));
        node.name.clone()
    };

    let name_style = if node.is_session() {
        Style::default().fg(Color::White)
    } else {
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD)
    };
    spans.push(Span::styled(name, name_style));

    if node.attached {
        spans.push(Span::styled(" ●", Style::default().fg(Color::Green)));
    }
    if node.is_session() {
        spans.push(Span::styled(
            format!(" {}w", node.windows),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if !flat && !node.expanded && node.has_children() {
        spans.push(Span::styled(
            format!(" (+{})", node.children.len()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if node.has_stats() {
        spans.push(Span::styled(
            format!(" +{}", node.added),
            Style::default().fg(Color::Green),
        ));
        spans.push(Span::styled(
            format!(" -{}", node.deleted),
            Style::default().fg(Color::Red),
        ));
    }

    ListItem::new(Line::from(spans))
}

fn draw_project_picker(f: &mut Frame, area: Rect, view: &mut SessionsView) {
    let Some(picker) = view.picker_mut() else {
        return;
    };

    let block = Block::default()
        .title(" Open Project ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (input_area, list_area) = input_and_list(inner);
    f.render_widget(
        Paragraph::new(input_line("> ", &picker.input, input_area.width, true)),
        input_area,
    );

    if picker.filtered().is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "No matching projects",
                Style::default().fg(Color::DarkGray),
            )),
            list_area,
        );
        return;
    }

    let items: Vec<ListItem<'static>> = picker
        .filtered()
        .iter()
        .map(|project| ListItem::new(Line::from(project.display.clone())))
        .collect();
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, list_area, &mut picker.list_state);
}
