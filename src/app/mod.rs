//! Application state and core data types for muxtree.

mod actions;
mod agents;
mod sessions;
mod windows;
mod worktrees;

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::git::{GitRepoRootResolver, RepoRootResolver};
use crate::palette::PaletteState;
use crate::projects::{ProjectSource, ZoxideProjects};
use crate::recency::RecencyStore;
use crate::tmux::{SessionSource, TmuxClient, WindowSource};
use crate::topology::{build_tree, resolve_repo_roots_incremental, spawn_stats_fetch, StatsUpdate};
use crate::ui::notice::NoticeBoard;
use crate::worktree::{WorktreeDiffSource, WorktreeSource, WtClient};

pub use actions::Action;
pub use agents::{AbPromptState, AgentsView};
pub use sessions::{SessionsMode, SessionsView};
pub use windows::{spawn_windows_load, WindowsUpdate, WindowsView};
pub use worktrees::{WorktreesMode, WorktreesView};

/// How muxtree was started, which decides where Esc leads
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StartMode {
    #[default]
    Sessions,
    /// Palette only, closing it quits
    Palette,
    Worktrees,
    Agents,
    /// Windows of the current session
    Windows,
    /// Project picker only
    Projects,
    /// Run one palette command, then quit
    Run(String),
}

impl StartMode {
    /// Modes that quit instead of falling back to another view
    fn is_one_shot(&self) -> bool {
        matches!(
            self,
            StartMode::Palette | StartMode::Run(_) | StartMode::Projects
        )
    }
}

/// Which view is on screen when the palette is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Sessions,
    Worktrees,
    Agents,
    AbPrompt,
    Windows,
}

/// External systems the app talks to
pub struct Collaborators {
    pub sessions: Box<dyn SessionSource>,
    pub windows: Arc<dyn WindowSource>,
    pub resolver: Box<dyn RepoRootResolver>,
    pub diffs: Arc<dyn WorktreeDiffSource>,
    pub worktrees: Box<dyn WorktreeSource>,
    pub projects: Box<dyn ProjectSource>,
    pub tmux: TmuxClient,
    pub wt: WtClient,
}

impl Collaborators {
    /// The real tmux, git, wt and zoxide binaries
    pub fn system() -> Self {
        Self {
            sessions: Box::new(TmuxClient::new()),
            windows: Arc::new(TmuxClient::new()),
            resolver: Box::new(GitRepoRootResolver),
            diffs: Arc::new(WtClient::new()),
            worktrees: Box::new(WtClient::new()),
            projects: Box::new(ZoxideProjects),
            tmux: TmuxClient::new(),
            wt: WtClient::new(),
        }
    }
}

pub struct App {
    pub config: Config,
    pub mode: StartMode,
    pub view: View,
    pub palette_active: bool,
    /// Return to the palette once the current sub-action finishes
    palette_return: bool,
    pub palette: PaletteState,
    pub sessions: SessionsView,
    pub windows: WindowsView,
    pub worktrees: WorktreesView,
    pub agents: AgentsView,
    pub ab_prompt: AbPromptState,
    pub notices: NoticeBoard,
    pub should_quit: bool,
    cache: CacheStore,
    recency: RecencyStore,
    collab: Collaborators,
    stats_tx: Sender<StatsUpdate>,
    stats_rx: Receiver<StatsUpdate>,
    /// Generation of the tree a stats fetch is running for
    pending_stats: Option<u64>,
    windows_tx: Sender<WindowsUpdate>,
    windows_rx: Receiver<WindowsUpdate>,
}

impl App {
    pub fn new(
        config: Config,
        mode: StartMode,
        cache: CacheStore,
        recency: RecencyStore,
        collab: Collaborators,
    ) -> Self {
        let (stats_tx, stats_rx) = mpsc::channel();
        let (windows_tx, windows_rx) = mpsc::channel();
        Self {
            config,
            mode,
            view: View::Sessions,
            palette_active: false,
            palette_return: false,
            palette: PaletteState::new(),
            sessions: SessionsView::new(),
            windows: WindowsView::new(),
            worktrees: WorktreesView::new(),
            agents: AgentsView::new(),
            ab_prompt: AbPromptState::new(),
            notices: NoticeBoard::new(),
            should_quit: false,
            cache,
            recency,
            collab,
            stats_tx,
            stats_rx,
            pending_stats: None,
            windows_tx,
            windows_rx,
        }
    }

    /// Load whatever the start mode shows first.
    pub fn start(&mut self) {
        tracing::info!(mode = ?self.mode, "starting");
        match self.mode.clone() {
            StartMode::Sessions => self.refresh_sessions(Utc::now()),
            StartMode::Palette => self.open_palette(),
            StartMode::Worktrees => self.show_worktrees(),
            StartMode::Agents => self.show_agents(),
            StartMode::Windows => self.show_current_windows(),
            StartMode::Projects => self.perform(Action::OpenProjectPicker),
            StartMode::Run(id) => {
                if let Some(action) = self.execute_command(&id) {
                    self.perform(action);
                }
            }
        }
    }

    /// True while the active view owns the keyboard for text or a confirmation
    pub fn is_editing(&self) -> bool {
        match self.view {
            View::Sessions => self.sessions.is_editing(),
            View::Worktrees => self.worktrees.is_editing(),
            View::Agents | View::Windows => false,
            View::AbPrompt => true,
        }
    }

    pub(crate) fn palette_return(&self) -> bool {
        self.palette_return
    }

    /// Reload sessions from tmux and rebuild the tree.
    ///
    /// Repository roots are resolved incrementally against the cache. Cached
    /// diff stats are applied at once while still valid; otherwise they are
    /// fetched in the background and applied by [`poll_background`](Self::poll_background).
    pub fn refresh_sessions(&mut self, now: DateTime<Utc>) {
        let sessions = match self.collab.sessions.list_sessions() {
            Ok(sessions) => sessions,
            Err(err) => {
                tracing::warn!(error = %err, "failed to list tmux sessions");
                Vec::new()
            }
        };

        let snapshot = self.cache.load();
        let (repo_roots, refreshed_at) = resolve_repo_roots_incremental(
            &sessions,
            snapshot.as_ref(),
            now,
            self.collab.resolver.as_ref(),
        );

        let generation = self.sessions.install_tree(build_tree(&sessions, &repo_roots));
        tracing::debug!(generation, sessions = sessions.len(), "session tree built");

        match snapshot.filter(|snap| snap.stats_valid(now)) {
            Some(snap) => {
                self.sessions.enrich(generation, &snap.stats);
                self.pending_stats = None;
            }
            None => {
                spawn_stats_fetch(
                    generation,
                    sessions.clone(),
                    repo_roots.clone(),
                    Arc::clone(&self.collab.diffs),
                    self.stats_tx.clone(),
                );
                self.pending_stats = Some(generation);
            }
        }

        let saved = self.cache.update(|snap| {
            snap.sessions = sessions;
            snap.repo_roots = repo_roots;
            snap.repo_roots_refreshed_at = Some(refreshed_at);
        });
        if let Err(err) = saved {
            tracing::warn!(error = %err, "failed to save session cache");
        }
    }

    /// Apply finished background work. Stale stats and window lists are
    /// dropped.
    pub fn poll_background(&mut self, now: DateTime<Utc>) {
        while let Ok(update) = self.stats_rx.try_recv() {
            self.apply_stats_update(update, now);
        }
        while let Ok(update) = self.windows_rx.try_recv() {
            let session = update.session.clone();
            if !self.windows.apply_loaded(update) {
                tracing::debug!(%session, "dropping stale window list");
            }
        }
        self.notices.update();
    }

    fn apply_stats_update(&mut self, update: StatsUpdate, now: DateTime<Utc>) {
        if !self.sessions.enrich(update.generation, &update.stats) {
            tracing::debug!(generation = update.generation, "dropping stale stats");
            return;
        }
        self.pending_stats = None;

        let ttl = now + Duration::seconds(i64::try_from(self.config.stats_ttl_secs).unwrap_or(30));
        let saved = self.cache.update(|snap| {
            snap.stats = update.stats;
            snap.stats_ttl = Some(ttl);
        });
        if let Err(err) = saved {
            tracing::warn!(error = %err, "failed to save worktree stats");
        }
    }

    /// Whether a stats fetch for the current tree is still running
    pub fn stats_pending(&self) -> bool {
        self.pending_stats.is_some()
    }

    pub fn load_worktrees(&mut self) {
        match self.collab.worktrees.list_worktrees(None) {
            Ok(worktrees) => self.worktrees.set_worktrees(worktrees),
            Err(err) => {
                tracing::warn!(error = %err, "failed to list worktrees");
                self.worktrees.set_worktrees(Vec::new());
                self.notices.warn(format!("wt list failed: {err}"));
            }
        }
    }

    pub fn open_palette(&mut self) {
        self.palette_active = true;
        self.palette.reset(&self.recency.load().commands);
    }

    /// Hide the palette, or quit when it is all this run shows.
    pub fn close_palette(&mut self) {
        self.palette_active = false;
        if self.mode == StartMode::Palette {
            self.should_quit = true;
        }
    }

    pub fn show_sessions(&mut self) {
        self.view = View::Sessions;
    }

    pub fn show_worktrees(&mut self) {
        self.view = View::Worktrees;
        self.worktrees.cancel();
        self.load_worktrees();
    }

    /// Drill into the windows of `session`, loading them in the background.
    pub fn show_windows(&mut self, session: &str) {
        self.view = View::Windows;
        if self.windows.load_session(session) {
            spawn_windows_load(
                session.to_string(),
                Arc::clone(&self.collab.windows),
                self.windows_tx.clone(),
            );
        }
    }

    /// Windows of the attached session. Quits outside tmux.
    fn show_current_windows(&mut self) {
        match self.collab.windows.current_session() {
            Ok(name) if !name.is_empty() => self.show_windows(&name),
            Ok(_) => {
                tracing::warn!("no current tmux session");
                self.quit();
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to read current session");
                self.quit();
            }
        }
    }

    /// Whether the windows view is waiting for its list
    pub fn windows_pending(&self) -> bool {
        self.windows.is_loading()
    }

    /// Leave the windows view for the session tree, or the palette when a
    /// command led here.
    pub fn back_to_sessions(&mut self) {
        if self.palette_return {
            self.return_to_palette();
            return;
        }
        self.show_sessions();
        if self.sessions.tree().is_empty() {
            self.refresh_sessions(Utc::now());
        }
    }

    pub fn show_agents(&mut self) {
        self.view = View::Agents;
        self.agents.reset(&self.recency.load().commands);
    }

    pub fn show_ab_prompt(&mut self) {
        self.view = View::AbPrompt;
        self.ab_prompt.reset();
    }

    /// Reopen the palette after a command's sub-action, or quit when the
    /// palette was the whole session.
    pub fn return_to_palette(&mut self) {
        self.palette_return = false;
        if self.mode.is_one_shot() {
            self.should_quit = true;
            return;
        }
        self.open_palette();
    }

    /// Leave the current view: back to the palette when a command opened
    /// it, quit when it is the start view, otherwise back to sessions.
    pub fn go_back(&mut self) {
        if self.palette_return {
            self.return_to_palette();
            return;
        }
        let start_view = match self.mode {
            StartMode::Worktrees => Some(View::Worktrees),
            StartMode::Agents => Some(View::Agents),
            StartMode::Windows => Some(View::Windows),
            StartMode::Sessions => Some(View::Sessions),
            _ => None,
        };
        if self.view == View::Sessions || start_view == Some(self.view) {
            self.should_quit = true;
        } else {
            self.show_sessions();
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
