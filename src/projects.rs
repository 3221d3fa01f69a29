//! Recent-project picker backed by zoxide.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

use crate::fuzzy::FuzzyFilter;
use crate::input::{InputKeyResult, TextInput};
use crate::worktree::{Worktree, WtClient};

/// A directory known to zoxide
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub score: f64,
    pub path: PathBuf,
    /// Path with the home directory replaced by `~`
    pub display: String,
}

/// Parse `zoxide query -ls` output (`<score> <path>` per line).
pub fn parse_zoxide_output(output: &str, home: Option<&Path>) -> Vec<Project> {
    output
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            let (score, path) = line.split_once(' ')?;
            let path = path.trim();
            if path.is_empty() {
                return None;
            }
            Some(Project {
                score: score.parse().unwrap_or(0.0),
                path: PathBuf::from(path),
                display: shorten_home(path, home),
            })
        })
        .collect()
}

/// Replace a leading home directory with `~`.
pub fn shorten_home(path: &str, home: Option<&Path>) -> String {
    let Some(home) = home.and_then(Path::to_str).filter(|h| !h.is_empty()) else {
        return path.to_string();
    };
    match path.strip_prefix(home) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => format!("~{rest}"),
        _ => path.to_string(),
    }
}

/// Source of candidate project directories
pub trait ProjectSource {
    fn list_projects(&self) -> Result<Vec<Project>>;
}

/// Projects from zoxide's frecency database
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoxideProjects;

impl ProjectSource for ZoxideProjects {
    fn list_projects(&self) -> Result<Vec<Project>> {
        list_projects()
    }
}

/// Run zoxide and list known directories, highest score first.
pub fn list_projects() -> Result<Vec<Project>> {
    let output = Command::new("zoxide")
        .args(["query", "-ls"])
        .output()
        .context("Failed to run zoxide - is it installed?")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("zoxide query failed: {}", stderr.trim());
    }
    let home = dirs::home_dir();
    Ok(parse_zoxide_output(
        &String::from_utf8_lossy(&output.stdout),
        home.as_deref(),
    ))
}

/// Session name and working directory for opening `dir`.
///
/// A repository with several worktrees opens its main worktree under
/// `<name>-main`, matching how the sessions tree groups worktree sessions.
pub fn resolve_project(dir: &Path) -> (String, PathBuf) {
    if !is_git_repo(dir) {
        return session_for(dir, &[]);
    }
    match WtClient::new().list(Some(dir)) {
        Ok(worktrees) => session_for(dir, &worktrees),
        Err(err) => {
            tracing::debug!(dir = %dir.display(), error = %err, "could not list worktrees");
            session_for(dir, &[])
        }
    }
}

/// Pure part of [`resolve_project`].
pub fn session_for(dir: &Path, worktrees: &[Worktree]) -> (String, PathBuf) {
    let base = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());

    if worktrees.len() > 1 {
        if let Some(main) = worktrees.iter().find(|wt| wt.is_main && !wt.path.is_empty()) {
            return (format!("{base}-main"), PathBuf::from(&main.path));
        }
    }
    (base, dir.to_path_buf())
}

fn is_git_repo(dir: &Path) -> bool {
    Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["rev-parse", "--git-dir"])
        .output()
        .is_ok_and(|output| output.status.success())
}

/// Result of handling a key in the picker
#[derive(Debug, Clone, PartialEq)]
pub enum PickerKeyResult {
    Continue,
    Open(Project),
    Cancel,
}

/// Fuzzy project selector state
#[derive(Debug, Default)]
pub struct ProjectPicker {
    all: Vec<Project>,
    filtered: Vec<Project>,
    pub input: TextInput,
    selected: usize,
    pub list_state: ListState,
    filter: FuzzyFilter,
}

impl ProjectPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the project list and clear the query.
    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.all = projects;
        self.input.clear();
        self.refilter();
    }

    pub fn filtered(&self) -> &[Project] {
        &self.filtered
    }

    pub fn selected(&self) -> Option<&Project> {
        self.filtered.get(self.selected)
    }

    fn refilter(&mut self) {
        self.filtered = self
            .filter
            .filter(self.input.value(), &self.all, |p| p.display.as_str());
        self.select(0);
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(self.filtered.len().saturating_sub(1));
        self.list_state.select(if self.filtered.is_empty() {
            None
        } else {
            Some(self.selected)
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerKeyResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => PickerKeyResult::Cancel,
            KeyCode::Enter => match self.selected() {
                Some(project) => PickerKeyResult::Open(project.clone()),
                None => PickerKeyResult::Continue,
            },
            KeyCode::Up => {
                self.select(self.selected.saturating_sub(1));
                PickerKeyResult::Continue
            }
            KeyCode::Char('k') if ctrl => {
                self.select(self.selected.saturating_sub(1));
                PickerKeyResult::Continue
            }
            KeyCode::Down => {
                self.select(self.selected + 1);
                PickerKeyResult::Continue
            }
            KeyCode::Char('j') if ctrl => {
                self.select(self.selected + 1);
                PickerKeyResult::Continue
            }
            _ => {
                if self.input.handle_key(key) == InputKeyResult::Changed {
                    self.refilter();
                }
                PickerKeyResult::Continue
            }
        }
    }
}
