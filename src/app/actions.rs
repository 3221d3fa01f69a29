//! Actions produced by views and palette commands, and their effects.

use anyhow::{Context, Result};
use chrono::Utc;

use super::*;
use crate::agents::template::render_prompt_template;
use crate::agents::{find_agent, recency_key, LaunchTarget};
use crate::config::AbConfig;
use crate::palette::is_valid_command;
use crate::projects::{resolve_project, Project};
use crate::worktree::ab::prepare_ab_worktrees;

/// Something a key press or command asks the app to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SwitchSession(String),
    KillSession(String),
    /// Move the client to another session, then kill the one it left
    KillCurrentSession,
    RenameSession { old: String, new_name: String },
    OpenProjectPicker,
    OpenProject(Project),
    /// Drill into a session's windows
    ShowWindows(String),
    /// Switch to `session:index`
    SwitchWindow(String),
    BackToSessions,
    SwitchWorktree(String),
    CreateWorktree(String),
    RemoveWorktree(String),
    RunPopup {
        command: String,
        width: String,
        height: String,
    },
    LaunchAgent {
        agent_id: String,
        mode_id: String,
        target: LaunchTarget,
    },
    LaunchAb { prompt: String, plan_mode: bool },
    Notify(String),
    Back,
}

impl Action {
    pub fn popup(command: &str, width: &str, height: &str) -> Self {
        Action::RunPopup {
            command: command.to_string(),
            width: width.to_string(),
            height: height.to_string(),
        }
    }

    fn launch(agent_id: &str) -> Self {
        Action::LaunchAgent {
            agent_id: agent_id.to_string(),
            mode_id: "default".to_string(),
            target: LaunchTarget::Pane,
        }
    }
}

/// What the app does after an action succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Stay,
    Quit,
}

/// Codex and Claude command lines for an A/B run.
///
/// In plan mode Claude's prompt is prefixed with the configured plan prefix.
pub fn ab_commands(config: &AbConfig, prompt: &str, plan_mode: bool) -> Result<(String, String)> {
    let prompt = prompt.trim();
    let claude_prompt = match config.plan_prefix.trim_end() {
        prefix if plan_mode && !prefix.is_empty() => format!("{prefix} {prompt}"),
        _ => prompt.to_string(),
    };
    let codex = render_prompt_template(&config.codex_template, prompt)
        .context("Invalid codex template")?;
    let claude = render_prompt_template(&config.claude_template, &claude_prompt)
        .context("Invalid claude template")?;
    Ok((codex, claude))
}

impl App {
    /// Run a palette command.
    ///
    /// The command is recorded for recency first. Commands that open a view
    /// return `None`; the rest return the action to perform.
    pub fn execute_command(&mut self, id: &str) -> Option<Action> {
        self.palette_active = false;
        if !is_valid_command(id) {
            tracing::warn!(command = id, "unknown command");
            return Some(Action::Notify(format!("Unknown command: {id}")));
        }
        if let Err(err) = self.recency.record(id) {
            tracing::warn!(error = %err, command = id, "failed to record command use");
        }
        tracing::debug!(command = id, "executing command");

        self.palette_return = id != "switch_session";
        let now = Utc::now();
        match id {
            "switch_session" | "view_sessions" => {
                self.show_sessions();
                self.refresh_sessions(now);
                None
            }
            "kill_session" => {
                self.show_sessions();
                self.refresh_sessions(now);
                self.sessions.begin_kill();
                None
            }
            "rename_session" => {
                self.show_sessions();
                self.refresh_sessions(now);
                self.sessions.begin_rename();
                None
            }
            "kill_current_session" => Some(Action::KillCurrentSession),
            "open_project" => Some(Action::OpenProjectPicker),
            "wt_switch" | "view_worktrees" => {
                self.show_worktrees();
                None
            }
            "wt_create" => {
                self.show_worktrees();
                self.worktrees.begin_create();
                None
            }
            "wt_create_describe" => {
                self.show_worktrees();
                self.worktrees.begin_describe();
                None
            }
            "wt_remove" => {
                self.show_worktrees();
                if self.worktrees.begin_remove() {
                    None
                } else {
                    Some(Action::Notify(
                        "Select a worktree other than the main or current one".to_string(),
                    ))
                }
            }
            "wt_merge" => Some(Action::popup("wt merge", "80%", "80%")),
            "wt_commit" => Some(Action::popup("wt step commit", "80%", "80%")),
            "agent_ab" => {
                self.show_ab_prompt();
                None
            }
            "tool_lazygit" => Some(Action::popup("lazygit", "100%", "100%")),
            "tool_lumen_diff" => Some(Action::popup("lumen diff", "100%", "100%")),
            "view_agents" => {
                self.show_agents();
                None
            }
            launch => launch.strip_prefix("launch_").map(Action::launch),
        }
    }

    /// Perform `action`. Failures are logged and shown as a notice; the app
    /// only quits when a quitting action succeeded.
    pub fn perform(&mut self, action: Action) {
        match self.try_perform(action) {
            Ok(Outcome::Quit) => self.should_quit = true,
            Ok(Outcome::Stay) => {}
            Err(err) => {
                tracing::warn!(error = %err, "action failed");
                self.notices.error(format!("{err:#}"));
            }
        }
    }

    fn try_perform(&mut self, action: Action) -> Result<Outcome> {
        let tmux = self.collab.tmux;
        match action {
            Action::SwitchSession(name) => {
                tmux.switch_client(&name)
                    .with_context(|| format!("Failed to switch to {name}"))?;
                Ok(Outcome::Quit)
            }
            Action::KillSession(name) => {
                tmux.kill_session(&name)
                    .with_context(|| format!("Failed to kill {name}"))?;
                tracing::info!(session = %name, "killed session");
                self.notices.info(format!("Killed {name}"));
                self.refresh_sessions(Utc::now());
                Ok(Outcome::Stay)
            }
            Action::KillCurrentSession => {
                let current = tmux.current_session()?;
                if current.is_empty() {
                    return Ok(Outcome::Quit);
                }
                let sessions = self.collab.sessions.list_sessions().unwrap_or_default();
                if let Some(other) = sessions.iter().find(|s| s.name != current) {
                    tmux.switch_client(&other.name)?;
                }
                tmux.kill_session(&current)
                    .with_context(|| format!("Failed to kill {current}"))?;
                tracing::info!(session = %current, "killed current session");
                Ok(Outcome::Quit)
            }
            Action::RenameSession { old, new_name } => {
                tmux.rename_session(&old, &new_name)
                    .with_context(|| format!("Failed to rename {old}"))?;
                self.refresh_sessions(Utc::now());
                Ok(Outcome::Stay)
            }
            Action::OpenProjectPicker => {
                let projects = self
                    .collab
                    .projects
                    .list_projects()
                    .context("Failed to list zoxide projects")?;
                self.view = View::Sessions;
                self.sessions.open_picker(projects);
                Ok(Outcome::Stay)
            }
            Action::OpenProject(project) => {
                let (name, dir) = resolve_project(&project.path);
                if !tmux.has_session(&name) {
                    tmux.new_session_in_dir(&name, &dir)
                        .with_context(|| format!("Failed to create session {name}"))?;
                    tracing::info!(session = %name, dir = %dir.display(), "created session");
                }
                tmux.switch_client(&name)?;
                Ok(Outcome::Quit)
            }
            Action::ShowWindows(session) => {
                self.show_windows(&session);
                Ok(Outcome::Stay)
            }
            Action::SwitchWindow(target) => {
                tmux.switch_client(&target)
                    .with_context(|| format!("Failed to switch to {target}"))?;
                Ok(Outcome::Quit)
            }
            Action::BackToSessions => {
                self.back_to_sessions();
                Ok(Outcome::Stay)
            }
            Action::SwitchWorktree(branch) => {
                self.collab.wt.switch_to(&branch)?;
                Ok(Outcome::Quit)
            }
            Action::CreateWorktree(branch) => {
                self.collab.wt.create(&branch)?;
                tracing::info!(%branch, "created worktree");
                Ok(Outcome::Quit)
            }
            Action::RemoveWorktree(branch) => {
                self.collab.wt.remove(&branch)?;
                tracing::info!(%branch, "removed worktree");
                self.notices.info(format!("Removed {branch}"));
                self.load_worktrees();
                Ok(Outcome::Stay)
            }
            Action::RunPopup {
                command,
                width,
                height,
            } => {
                tmux.display_popup(&command, &width, &height)?;
                Ok(Outcome::Quit)
            }
            Action::LaunchAgent {
                agent_id,
                mode_id,
                target,
            } => {
                self.launch_agent(&agent_id, &mode_id, target)?;
                Ok(Outcome::Quit)
            }
            Action::LaunchAb { prompt, plan_mode } => {
                self.launch_ab(&prompt, plan_mode)?;
                Ok(Outcome::Quit)
            }
            Action::Notify(message) => {
                self.notices.warn(message);
                Ok(Outcome::Stay)
            }
            Action::Back => {
                self.go_back();
                Ok(Outcome::Stay)
            }
        }
    }

    fn launch_agent(&mut self, agent_id: &str, mode_id: &str, target: LaunchTarget) -> Result<()> {
        let agent = find_agent(agent_id).with_context(|| format!("Unknown agent {agent_id}"))?;
        let mode = agent
            .mode(mode_id)
            .with_context(|| format!("{} has no mode {mode_id}", agent.name))?;
        let command = agent.full_command(mode);

        if let Err(err) = self.recency.record(&recency_key(agent.id)) {
            tracing::warn!(error = %err, agent = agent.id, "failed to record agent use");
        }

        let tmux = self.collab.tmux;
        match target {
            LaunchTarget::Pane => tmux.send_keys("!", &command),
            LaunchTarget::Split => tmux.split_window(&command, None),
            LaunchTarget::Window => tmux.new_window(agent.name, &command, None),
        }
        .with_context(|| format!("Failed to launch {}", agent.name))?;

        tracing::info!(agent = agent.id, mode = mode.id, %target, "launched agent");
        Ok(())
    }

    fn launch_ab(&mut self, prompt: &str, plan_mode: bool) -> Result<()> {
        let (codex_cmd, claude_cmd) = ab_commands(&self.config.ab, prompt, plan_mode)?;
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let pair = prepare_ab_worktrees(&cwd, &self.config.ab.base_branch)?;

        let tmux = self.collab.tmux;
        tmux.new_window("ab", &codex_cmd, Some(&pair.codex))
            .context("Failed to open A/B window")?;
        tmux.split_window(&claude_cmd, Some(&pair.claude))
            .context("Failed to split A/B window")?;
        tracing::info!(plan_mode, "launched A/B run");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::harness;
    use super::*;

    #[test]
    fn executing_records_recency_and_closes_palette() {
        let mut h = harness(StartMode::Sessions);
        h.app.open_palette();

        let action = h.app.execute_command("wt_merge");
        assert_eq!(action, Some(Action::popup("wt merge", "80%", "80%")));
        assert!(!h.app.palette_active);
        assert!(h.app.palette_return());
        assert!(h.app.recency.load().commands.contains_key("wt_merge"));
    }

    #[test]
    fn switch_session_does_not_return_to_palette() {
        let mut h = harness(StartMode::Sessions);
        assert_eq!(h.app.execute_command("switch_session"), None);
        assert_eq!(h.app.view, View::Sessions);
        assert!(!h.app.palette_return());
        assert!(!h.app.sessions.tree().is_empty());
    }

    #[test]
    fn launch_commands_use_default_mode_in_pane() {
        let mut h = harness(StartMode::Sessions);
        assert_eq!(
            h.app.execute_command("launch_codex"),
            Some(Action::LaunchAgent {
                agent_id: "codex".into(),
                mode_id: "default".into(),
                target: LaunchTarget::Pane,
            })
        );
    }

    #[test]
    fn worktree_commands_open_prompts() {
        let mut h = harness(StartMode::Sessions);
        assert_eq!(h.app.execute_command("wt_create"), None);
        assert_eq!(h.app.view, View::Worktrees);
        assert!(matches!(h.app.worktrees.mode(), WorktreesMode::Create(_)));

        // The first row is the main worktree, which cannot be removed.
        h.app.worktrees.cancel();
        assert!(matches!(
            h.app.execute_command("wt_remove"),
            Some(Action::Notify(_))
        ));
    }

    #[test]
    fn kill_session_command_asks_for_confirmation() {
        let mut h = harness(StartMode::Sessions);
        assert_eq!(h.app.execute_command("kill_session"), None);
        assert!(matches!(
            h.app.sessions.mode(),
            SessionsMode::ConfirmKill(name) if name == "shop"
        ));
    }

    #[test]
    fn unknown_command_is_a_notice() {
        let mut h = harness(StartMode::Sessions);
        let action = h.app.execute_command("does_not_exist").unwrap();
        h.app.perform(action);
        assert!(h.app.notices.current().is_some());
        assert!(h.app.recency.load().commands.is_empty());
    }

    #[test]
    fn agent_ab_shows_prompt() {
        let mut h = harness(StartMode::Sessions);
        assert_eq!(h.app.execute_command("agent_ab"), None);
        assert_eq!(h.app.view, View::AbPrompt);
        assert!(h.app.is_editing());
    }

    #[test]
    fn open_project_picker_lists_projects() {
        let mut h = harness(StartMode::Sessions);
        h.app.perform(Action::OpenProjectPicker);
        assert!(h.app.sessions.is_picking());
        assert!(!h.app.should_quit);
    }

    #[test]
    fn ab_commands_prefix_claude_in_plan_mode() {
        let config = AbConfig::default();
        let (codex, claude) = ab_commands(&config, "add tests", true).unwrap();
        assert_eq!(codex, "codex 'add tests'");
        assert_eq!(claude, "claude '/plan add tests'");

        let (_, claude) = ab_commands(&config, "add tests", false).unwrap();
        assert_eq!(claude, "claude 'add tests'");
    }

    #[test]
    fn ab_commands_reject_templates_without_placeholder() {
        let config = AbConfig {
            codex_template: "codex".into(),
            ..AbConfig::default()
        };
        assert!(ab_commands(&config, "x", false).is_err());
    }
}
