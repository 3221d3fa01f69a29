use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::quick_label;
use crate::app::WindowsView;
use crate::tmux::Window;

pub fn draw_windows(f: &mut Frame, area: Rect, view: &mut WindowsView) {
    let block = Block::default()
        .title(format!(" {} ", view.session()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if view.windows().is_empty() {
        let text = if view.is_loading() {
            "Loading windows..."
        } else {
            "No windows"
        };
        f.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray))),
            inner,
        );
        return;
    }

    let items: Vec<ListItem<'static>> = view
        .windows()
        .iter()
        .enumerate()
        .map(|(i, w)| window_item(w, i))
        .collect();
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, inner, &mut view.list_state);
}

fn window_item(window: &Window, index: usize) -> ListItem<'static> {
    let mut spans = vec![
        quick_label(index),
        Span::raw(format!("{}:{}", window.index, window.name)),
    ];
    if window.active {
        spans.push(Span::styled(" ●", Style::default().fg(Color::Green)));
    }
    ListItem::new(Line::from(spans))
}
