//! Coding agent registry.
//!
//! Each agent is a CLI command with one or more launch modes; a mode only
//! appends flags to the base command.

pub mod template;

use std::fmt;

/// A launch mode of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentMode {
    pub id: &'static str,
    pub name: &'static str,
    /// Flags appended to the agent command, may be empty
    pub flags: &'static str,
}

/// A coding agent that can be launched in tmux
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub id: &'static str,
    pub name: &'static str,
    pub command: &'static str,
    pub modes: Vec<AgentMode>,
}

impl Agent {
    /// The command line for `mode`
    pub fn full_command(&self, mode: &AgentMode) -> String {
        if mode.flags.is_empty() {
            self.command.to_string()
        } else {
            format!("{} {}", self.command, mode.flags)
        }
    }

    pub fn mode(&self, mode_id: &str) -> Option<&AgentMode> {
        self.modes.iter().find(|m| m.id == mode_id)
    }

    /// Key under which launches of this agent are recorded for recency
    pub fn recency_key(&self) -> String {
        recency_key(self.id)
    }
}

/// Recency key of an agent id
pub fn recency_key(agent_id: &str) -> String {
    format!("agent:{agent_id}")
}

const fn mode(id: &'static str, name: &'static str, flags: &'static str) -> AgentMode {
    AgentMode { id, name, flags }
}

/// The built-in agents, in display order
pub fn default_agents() -> Vec<Agent> {
    vec![
        Agent {
            id: "claude",
            name: "Claude Code",
            command: "claude",
            modes: vec![
                mode("default", "Default", ""),
                mode("skip-perms", "Skip Permissions", "--dangerously-skip-permissions"),
            ],
        },
        Agent {
            id: "gemini",
            name: "Gemini CLI",
            command: "gemini",
            modes: vec![mode("default", "Default", "")],
        },
        Agent {
            id: "codex",
            name: "Codex CLI",
            command: "codex",
            modes: vec![
                mode("default", "Default", ""),
                mode("exec", "Exec", "--approval-mode full-auto"),
                mode("review", "Review", "--approval-mode review"),
                mode("apply", "Apply", "--approval-mode auto-edit"),
            ],
        },
        Agent {
            id: "aichat",
            name: "AIChat",
            command: "aichat",
            modes: vec![
                mode("default", "Interactive", ""),
                mode("execute", "Execute", "-e"),
            ],
        },
        Agent {
            id: "opencode",
            name: "OpenCode",
            command: "opencode",
            modes: vec![mode("default", "Default", "")],
        },
    ]
}

/// Look up a built-in agent by id.
pub fn find_agent(id: &str) -> Option<Agent> {
    default_agents().into_iter().find(|a| a.id == id)
}

/// Where an agent is started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchTarget {
    /// Typed into the last active pane
    #[default]
    Pane,
    /// In a new horizontal split
    Split,
    /// In a new window named after the agent
    Window,
}

impl fmt::Display for LaunchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LaunchTarget::Pane => "pane",
            LaunchTarget::Split => "split",
            LaunchTarget::Window => "window",
        };
        f.write_str(label)
    }
}
