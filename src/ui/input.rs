//! Single-line text input rendering with a block cursor.

use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

use crate::input::TextInput;

/// Render `input` after `prefix`, scrolled so the cursor stays within `width`.
///
/// Inactive inputs are dimmed and show no cursor.
pub fn input_line(prefix: &str, input: &TextInput, width: u16, active: bool) -> Line<'static> {
    if !active {
        return Line::from(vec![
            Span::styled(prefix.to_string(), Style::default().fg(Color::DarkGray)),
            Span::styled(input.value().to_string(), Style::default().fg(Color::DarkGray)),
        ]);
    }

    let chars: Vec<char> = input.value().chars().collect();
    let cursor = input.cursor().min(chars.len());
    let available = (width as usize).saturating_sub(prefix.chars().count()).max(1);
    let start = if cursor >= available {
        cursor + 1 - available
    } else {
        0
    };
    let end = (start + available).min(chars.len());

    let mut spans = vec![Span::styled(
        prefix.to_string(),
        Style::default().fg(Color::Yellow),
    )];
    let cursor_style = Style::default().bg(Color::White).fg(Color::Black);
    for (i, c) in chars[start..end].iter().enumerate() {
        if start + i == cursor {
            spans.push(Span::styled(c.to_string(), cursor_style));
        } else {
            spans.push(Span::raw(c.to_string()));
        }
    }
    if cursor >= end {
        spans.push(Span::styled(" ", Style::default().bg(Color::White)));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn cursor_at_end_adds_block() {
        let input = TextInput::with_value("feat");
        let line = input_line("> ", &input, 40, true);
        assert_eq!(text(&line), "> feat ");
    }

    #[test]
    fn long_input_scrolls_to_cursor() {
        let input = TextInput::with_value("abcdefghij");
        let line = input_line("> ", &input, 7, true);
        assert_eq!(text(&line), "> ghij ");
    }

    #[test]
    fn inactive_input_has_no_cursor() {
        let input = TextInput::with_value("notes");
        assert_eq!(text(&input_line("/ ", &input, 40, false)), "/ notes");
    }
}
