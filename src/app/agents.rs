//! Agent launcher view and the A/B prompt.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::ListState;

use super::Action;
use crate::agents::{default_agents, Agent, AgentMode, LaunchTarget};
use crate::config::QuickSelectModifier;
use crate::input::{quick_select_index, TextInput};
use crate::recency::rank_by_recency;

#[derive(Debug)]
pub struct AgentsView {
    agents: Vec<Agent>,
    /// Selected mode per agent, parallel to `agents`
    mode_index: Vec<usize>,
    selected: usize,
    pub list_state: ListState,
}

impl Default for AgentsView {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentsView {
    pub fn new() -> Self {
        let agents = default_agents();
        Self {
            mode_index: vec![0; agents.len()],
            agents,
            selected: 0,
            list_state: ListState::default().with_selected(Some(0)),
        }
    }

    /// Re-rank agents by their last launch and reset modes and cursor.
    pub fn reset(&mut self, timestamps: &HashMap<String, DateTime<Utc>>) {
        let keyed: Vec<(String, Agent)> = default_agents()
            .into_iter()
            .map(|agent| (agent.recency_key(), agent))
            .collect();
        self.agents = rank_by_recency(keyed, timestamps, |(key, _)| key.as_str())
            .into_iter()
            .map(|(_, agent)| agent)
            .collect();
        self.mode_index = vec![0; self.agents.len()];
        self.select(0);
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Currently chosen mode of the agent at `index`
    pub fn mode_of(&self, index: usize) -> Option<&AgentMode> {
        let agent = self.agents.get(index)?;
        agent.modes.get(self.mode_index.get(index).copied().unwrap_or(0))
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(self.agents.len().saturating_sub(1));
        self.list_state.select(if self.agents.is_empty() {
            None
        } else {
            Some(self.selected)
        });
    }

    fn cycle_mode(&mut self, forward: bool) {
        let Some(agent) = self.agents.get(self.selected) else {
            return;
        };
        let count = agent.modes.len();
        if count == 0 {
            return;
        }
        let current = &mut self.mode_index[self.selected];
        *current = if forward {
            (*current + 1) % count
        } else {
            (*current + count - 1) % count
        };
    }

    fn launch(&self, index: usize, target: LaunchTarget) -> Option<Action> {
        let agent = self.agents.get(index)?;
        let mode = self.mode_of(index)?;
        Some(Action::LaunchAgent {
            agent_id: agent.id.to_string(),
            mode_id: mode.id.to_string(),
            target,
        })
    }

    pub fn handle_key(&mut self, key: KeyEvent, quick: QuickSelectModifier) -> Option<Action> {
        if let Some(index) = quick_select_index(key, quick) {
            if index >= self.agents.len() {
                return None;
            }
            self.select(index);
            return self.launch(index, LaunchTarget::Pane);
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.select(self.selected + 1),
            KeyCode::Char('k') | KeyCode::Up => self.select(self.selected.saturating_sub(1)),
            KeyCode::Char('g') | KeyCode::Home => self.select(0),
            KeyCode::Char('G') | KeyCode::End => self.select(usize::MAX),
            KeyCode::Tab => self.cycle_mode(true),
            KeyCode::BackTab => self.cycle_mode(false),
            KeyCode::Enter => return self.launch(self.selected, LaunchTarget::Pane),
            KeyCode::Char('s') => return self.launch(self.selected, LaunchTarget::Split),
            KeyCode::Char('w') => return self.launch(self.selected, LaunchTarget::Window),
            _ => {}
        }
        None
    }
}

/// Prompt entry for launching Codex and Claude side by side
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbPromptState {
    pub input: TextInput,
    pub plan_mode: bool,
}

impl AbPromptState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::Back),
            KeyCode::Tab => {
                self.plan_mode = !self.plan_mode;
                None
            }
            KeyCode::Enter => {
                let prompt = self.input.value().trim();
                (!prompt.is_empty()).then(|| Action::LaunchAb {
                    prompt: prompt.to_string(),
                    plan_mode: self.plan_mode,
                })
            }
            _ => {
                self.input.handle_key(key);
                None
            }
        }
    }
}
