//! Agent launcher and the A/B prompt.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::input::input_line;
use super::quick_label;
use crate::app::{AbPromptState, AgentsView};
use crate::config::AbConfig;

pub fn draw_agents(f: &mut Frame, area: Rect, view: &mut AgentsView) {
    let block = Block::default()
        .title(" Agents ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let items: Vec<ListItem<'static>> = view
        .agents()
        .iter()
        .enumerate()
        .map(|(i, agent)| {
            let mut spans = vec![
                quick_label(i),
                Span::styled(agent.name.to_string(), Style::default().fg(Color::White)),
            ];
            if let Some(mode) = view.mode_of(i) {
                // Only agents with a choice show their mode
                if agent.modes.len() > 1 {
                    spans.push(Span::styled(
                        format!(" [{}]", mode.name),
                        Style::default().fg(Color::Yellow),
                    ));
                }
                spans.push(Span::styled(
                    format!("  {}", agent.full_command(mode)),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
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

pub fn draw_ab_prompt(f: &mut Frame, area: Rect, state: &AbPromptState, config: &AbConfig) {
    let block = Block::default()
        .title(" A/B: Codex + Claude ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Prompt
        Constraint::Length(1), // Spacer
        Constraint::Length(1), // Plan mode
        Constraint::Min(0),    // Details
    ])
    .split(inner);

    f.render_widget(
        Paragraph::new(input_line("Prompt: ", &state.input, chunks[0].width, true)),
        chunks[0],
    );

    let (plan_label, plan_style) = if state.plan_mode {
        ("on", Style::default().fg(Color::Green))
    } else {
        ("off", Style::default().fg(Color::DarkGray))
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Plan mode: "),
            Span::styled(plan_label, plan_style.add_modifier(Modifier::BOLD)),
            Span::styled(" (Tab to toggle)", Style::default().fg(Color::DarkGray)),
        ])),
        chunks[2],
    );

    let details = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Base branch: {}", config.base_branch),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            format!("Codex:  {}", config.codex_template),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            format!("Claude: {}", config.claude_template),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(details).wrap(Wrap { trim: false }), chunks[3]);
}
