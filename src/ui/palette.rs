//! Command palette overlay.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use super::input::input_line;
use super::layout::centered_area;
use super::quick_label;
use crate::palette::{Category, PaletteState};

/// Palette area: centered, 60% wide and 60% tall
pub fn palette_area(total: Rect) -> Rect {
    centered_area(total, 60, 60, 50, 12)
}

fn category_color(category: Category) -> Color {
    match category {
        Category::Session => Color::Cyan,
        Category::Worktree => Color::Green,
        Category::Agent => Color::Magenta,
        Category::Tool => Color::Yellow,
        Category::View => Color::Blue,
    }
}

pub fn draw_palette(f: &mut Frame, total: Rect, state: &mut PaletteState) {
    let area = palette_area(total);
    if area.width < 20 || area.height < 5 {
        return;
    }
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Commands ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Query
        Constraint::Min(1),    // Commands
        Constraint::Length(1), // Description
    ])
    .split(inner);

    f.render_widget(
        Paragraph::new(input_line("> ", &state.input, chunks[0].width, true)),
        chunks[0],
    );

    if let Some(command) = state.selected() {
        f.render_widget(
            Paragraph::new(Span::styled(
                command.description,
                Style::default().fg(Color::DarkGray),
            )),
            chunks[2],
        );
    }

    state.list_area = chunks[1];
    if state.filtered().is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "No matching commands",
                Style::default().fg(Color::DarkGray),
            )),
            chunks[1],
        );
        return;
    }

    let items: Vec<ListItem<'static>> = state
        .filtered()
        .iter()
        .enumerate()
        .map(|(i, command)| {
            ListItem::new(Line::from(vec![
                quick_label(i),
                Span::styled(
                    format!("{:<9}", command.category.label()),
                    Style::default().fg(category_color(command.category)),
                ),
                Span::styled(command.title, Style::default().fg(Color::White)),
            ]))
        })
        .collect();
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[1], &mut state.list_state);
}
