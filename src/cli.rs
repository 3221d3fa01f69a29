//! Command line interface.

use std::fmt::Write as _;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use crate::app::StartMode;
use crate::config::QuickSelectModifier;
use crate::palette::{default_commands, is_valid_command};

#[derive(Debug, Parser)]
#[command(name = "muxtree", version)]
#[command(about = "tmux session manager and command palette", long_about = None)]
pub struct Cli {
    /// Modifier for the 1-9 quick-select shortcuts, overrides the config file
    #[arg(long = "super-key", global = true, value_enum)]
    pub super_key: Option<QuickSelectModifier>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Session tree (default)
    #[command(alias = "s")]
    Sessions,
    /// Command palette
    #[command(alias = "p")]
    Palette,
    /// Worktree manager
    #[command(alias = "wt")]
    Worktrees,
    /// Agent launcher
    #[command(alias = "a")]
    Agents,
    /// Windows of the current session
    #[command(alias = "w")]
    Windows,
    /// Open a project
    #[command(alias = "o")]
    Projects,
    /// Run a palette command by id
    Run { command_id: String },
    /// List all command ids
    Commands,
    /// A bare command id, shorthand for `run <id>`
    #[command(external_subcommand)]
    External(Vec<String>),
}

/// What `main` should do
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Tui(StartMode),
    ListCommands,
}

impl Cli {
    pub fn invocation(&self) -> Result<Invocation> {
        let mode = match &self.command {
            None | Some(CliCommand::Sessions) => StartMode::Sessions,
            Some(CliCommand::Palette) => StartMode::Palette,
            Some(CliCommand::Worktrees) => StartMode::Worktrees,
            Some(CliCommand::Agents) => StartMode::Agents,
            Some(CliCommand::Windows) => StartMode::Windows,
            Some(CliCommand::Projects) => StartMode::Projects,
            Some(CliCommand::Commands) => return Ok(Invocation::ListCommands),
            Some(CliCommand::Run { command_id }) => run_mode(command_id)?,
            Some(CliCommand::External(args)) => match args.as_slice() {
                [id] => run_mode(id)?,
                [id, ..] => bail!("unexpected arguments after {id:?}"),
                [] => StartMode::Sessions,
            },
        };
        Ok(Invocation::Tui(mode))
    }
}

fn run_mode(id: &str) -> Result<StartMode> {
    if !is_valid_command(id) {
        bail!("unknown command {id:?}, see `muxtree commands`");
    }
    Ok(StartMode::Run(id.to_string()))
}

/// Command ids grouped by category, for `muxtree commands`
pub fn format_command_list() -> String {
    let mut out = String::new();
    let mut last = None;
    for command in default_commands() {
        if last != Some(command.category) {
            if last.is_some() {
                out.push('\n');
            }
            let _ = writeln!(out, "  {}:", command.category);
            last = Some(command.category);
        }
        let _ = writeln!(out, "    {:<24} {}", command.id, command.description);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(args: &[&str]) -> Result<Invocation> {
        Cli::try_parse_from(args)?.invocation()
    }

    #[test]
    fn no_subcommand_opens_sessions() {
        assert_eq!(
            invocation(&["muxtree"]).unwrap(),
            Invocation::Tui(StartMode::Sessions)
        );
    }

    #[test]
    fn aliases_select_views() {
        assert_eq!(
            invocation(&["muxtree", "wt"]).unwrap(),
            Invocation::Tui(StartMode::Worktrees)
        );
        assert_eq!(
            invocation(&["muxtree", "w"]).unwrap(),
            Invocation::Tui(StartMode::Windows)
        );
        assert_eq!(
            invocation(&["muxtree", "o"]).unwrap(),
            Invocation::Tui(StartMode::Projects)
        );
        assert_eq!(
            invocation(&["muxtree", "p"]).unwrap(),
            Invocation::Tui(StartMode::Palette)
        );
    }

    #[test]
    fn run_validates_command_id() {
        assert_eq!(
            invocation(&["muxtree", "run", "wt_merge"]).unwrap(),
            Invocation::Tui(StartMode::Run("wt_merge".into()))
        );
        assert!(invocation(&["muxtree", "run", "nope"]).is_err());
    }

    #[test]
    fn bare_command_id_is_run_shorthand() {
        assert_eq!(
            invocation(&["muxtree", "kill_current_session"]).unwrap(),
            Invocation::Tui(StartMode::Run("kill_current_session".into()))
        );
        assert!(invocation(&["muxtree", "frobnicate"]).is_err());
    }

    #[test]
    fn super_key_is_global() {
        let cli = Cli::try_parse_from(["muxtree", "agents", "--super-key", "alt"]).unwrap();
        assert_eq!(cli.super_key, Some(QuickSelectModifier::Alt));
        assert_eq!(cli.command, Some(CliCommand::Agents));
    }

    #[test]
    fn command_list_is_grouped() {
        let list = format_command_list();
        assert!(list.starts_with("  Session:\n"));
        assert!(list.contains("\n\n  Worktree:\n"));
        assert!(list.contains("    wt_merge"));
    }
}
