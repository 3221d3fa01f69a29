//! Built-in palette commands.

use std::fmt;

/// Palette grouping of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Session,
    Worktree,
    Agent,
    Tool,
    View,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Session => "Session",
            Category::Worktree => "Worktree",
            Category::Agent => "Agent",
            Category::Tool => "Tool",
            Category::View => "View",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A command that can be run from the palette or `muxtree run <id>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: Category,
}

const fn cmd(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    category: Category,
) -> Command {
    Command {
        id,
        title,
        description,
        category,
    }
}

const COMMANDS: &[Command] = &[
    // Session
    cmd(
        "switch_session",
        "Switch Session",
        "Switch to a session (use the tree view)",
        Category::Session,
    ),
    cmd(
        "kill_session",
        "Kill Session",
        "Kill the selected session",
        Category::Session,
    ),
    cmd(
        "kill_current_session",
        "Kill Current Session",
        "Kill the current tmux session and switch to another",
        Category::Session,
    ),
    cmd(
        "rename_session",
        "Rename Session",
        "Rename the selected session",
        Category::Session,
    ),
    cmd(
        "open_project",
        "Open Project",
        "Open a recent project as a new session",
        Category::Session,
    ),
    // Worktree
    cmd(
        "wt_switch",
        "Switch Worktree",
        "Switch to a worktree branch",
        Category::Worktree,
    ),
    cmd(
        "wt_create",
        "Create Worktree",
        "Create a new worktree branch",
        Category::Worktree,
    ),
    cmd(
        "wt_create_describe",
        "Create Worktree from Description",
        "Describe a task and auto-generate a branch name",
        Category::Worktree,
    ),
    cmd(
        "wt_remove",
        "Remove Worktree",
        "Remove the selected worktree",
        Category::Worktree,
    ),
    cmd(
        "wt_merge",
        "Merge Worktree",
        "Merge a worktree branch into main",
        Category::Worktree,
    ),
    cmd(
        "wt_commit",
        "LLM Commit",
        "Generate a commit message with LLM",
        Category::Worktree,
    ),
    // Agent
    cmd(
        "launch_claude",
        "Launch Claude Code",
        "Start Claude Code in the current pane",
        Category::Agent,
    ),
    cmd(
        "launch_gemini",
        "Launch Gemini CLI",
        "Start Gemini CLI in the current pane",
        Category::Agent,
    ),
    cmd(
        "launch_codex",
        "Launch Codex CLI",
        "Start Codex CLI in the current pane",
        Category::Agent,
    ),
    cmd(
        "launch_aichat",
        "Launch AIChat",
        "Start AIChat in the current pane",
        Category::Agent,
    ),
    cmd(
        "launch_opencode",
        "Launch OpenCode",
        "Start OpenCode in the current pane",
        Category::Agent,
    ),
    cmd(
        "agent_ab",
        "Launch A/B (Codex + Claude)",
        "Start Codex and Claude side-by-side in a new tmux window",
        Category::Agent,
    ),
    // Tool
    cmd(
        "tool_lazygit",
        "Lazygit",
        "Open lazygit in a popup",
        Category::Tool,
    ),
    cmd(
        "tool_lumen_diff",
        "Lumen Diff",
        "Open lumen diff in a popup",
        Category::Tool,
    ),
    // View
    cmd(
        "view_sessions",
        "Sessions View",
        "Switch to sessions view",
        Category::View,
    ),
    cmd(
        "view_worktrees",
        "Worktrees View",
        "Switch to worktrees view",
        Category::View,
    ),
    cmd(
        "view_agents",
        "Agents View",
        "Switch to agents view",
        Category::View,
    ),
];

/// All built-in commands in registry order
pub fn default_commands() -> Vec<Command> {
    COMMANDS.to_vec()
}

pub fn find_command(id: &str) -> Option<Command> {
    COMMANDS.iter().find(|c| c.id == id).copied()
}

pub fn is_valid_command(id: &str) -> bool {
    find_command(id).is_some()
}
