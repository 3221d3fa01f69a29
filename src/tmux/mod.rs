//! tmux integration.
//!
//! Sessions are read with `tmux list-sessions` and every mutation goes through
//! a single `tmux` invocation. Nothing here keeps state between calls.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Format string for `list-sessions`, one tab-separated record per session.
const LIST_SESSIONS_FORMAT: &str = "#{session_name}\t#{session_windows}\t#{?session_attached,1,0}\t#{session_path}\t#{session_activity}";

/// Format string for `list-windows`. The name goes last since it may hold tabs.
const LIST_WINDOWS_FORMAT: &str = "#{window_index}\t#{?window_active,1,0}\t#{window_name}";

/// A tmux session as reported by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    pub windows: u32,
    pub attached: bool,
    /// Working directory of the session, empty when unknown
    #[serde(default)]
    pub path: String,
    /// Unix timestamp of the last activity
    #[serde(default)]
    pub activity: i64,
}

/// Source of the current session list.
pub trait SessionSource {
    fn list_sessions(&self) -> Result<Vec<Session>>;
}

/// A window of one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Window {
    pub session_name: String,
    pub index: u32,
    pub name: String,
    pub active: bool,
}

impl Window {
    /// `session:index`, as accepted by `switch-client -t`
    pub fn target(&self) -> String {
        format!("{}:{}", self.session_name, self.index)
    }
}

/// Window queries for the windows view. Implementations are shared with the
/// background loader thread.
pub trait WindowSource: Send + Sync {
    /// Session the current client is attached to, empty outside tmux
    fn current_session(&self) -> Result<String>;
    fn list_windows(&self, session: &str) -> Result<Vec<Window>>;
}

/// Parse `list-windows` output produced with [`LIST_WINDOWS_FORMAT`].
pub fn parse_windows(session: &str, output: &str) -> Vec<Window> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parts: Vec<&str> = line.splitn(3, '\t').collect();
            if parts.len() < 3 {
                return None;
            }
            Some(Window {
                session_name: session.to_string(),
                index: parts[0].trim().parse().unwrap_or(0),
                active: parts[1] == "1",
                name: parts[2].to_string(),
            })
        })
        .collect()
}

/// Target matching exactly the session `name` (or `session:window`).
///
/// A bare `-t name` also matches sessions that merely start with `name`.
pub fn exact_target(name: &str) -> String {
    format!("={name}")
}

/// Parse `list-sessions` output produced with [`LIST_SESSIONS_FORMAT`].
///
/// Lines with fewer than three fields are skipped. Unparseable numbers
/// become zero.
pub fn parse_sessions(output: &str) -> Vec<Session> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parts: Vec<&str> = line.splitn(5, '\t').collect();
            if parts.len() < 3 {
                return None;
            }
            Some(Session {
                name: parts[0].to_string(),
                windows: parts[1].trim().parse().unwrap_or(0),
                attached: parts[2] == "1",
                path: parts.get(3).map(ToString::to_string).unwrap_or_default(),
                activity: parts
                    .get(4)
                    .and_then(|a| a.trim().parse().ok())
                    .unwrap_or(0),
            })
        })
        .collect()
}

/// Thin wrapper around the `tmux` binary
#[derive(Debug, Clone, Copy, Default)]
pub struct TmuxClient;

impl TmuxClient {
    pub fn new() -> Self {
        Self
    }

    /// Run a tmux command, failing when it exits non-zero.
    fn run<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.output(args).map(|_| ())
    }

    /// Run a tmux command and capture its stdout.
    fn output<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut command = Command::new("tmux");
        command.args(args);
        let output = command
            .output()
            .context("Failed to run tmux - is it installed?")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("tmux failed: {}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Name of the session the current client is attached to
    pub fn current_session(&self) -> Result<String> {
        let out = self.output(["display-message", "-p", "#{session_name}"])?;
        Ok(out.trim().to_string())
    }

    pub fn has_session(&self, name: &str) -> bool {
        self.run(["has-session", "-t", &exact_target(name)]).is_ok()
    }

    /// Switch to a session, or to `session:index` for a window.
    pub fn switch_client(&self, target: &str) -> Result<()> {
        self.run(["switch-client", "-t", &exact_target(target)])
    }

    pub fn kill_session(&self, name: &str) -> Result<()> {
        self.run(["kill-session", "-t", &exact_target(name)])
    }

    pub fn rename_session(&self, old: &str, new_name: &str) -> Result<()> {
        self.run(["rename-session", "-t", &exact_target(old), new_name])
    }

    /// Create a detached session rooted at `dir`.
    pub fn new_session_in_dir(&self, name: &str, dir: &Path) -> Result<()> {
        let dir = dir.to_string_lossy();
        self.run(["new-session", "-d", "-s", name, "-c", dir.as_ref()])
    }

    /// Type `keys` into `target` followed by Enter.
    pub fn send_keys(&self, target: &str, keys: &str) -> Result<()> {
        self.run(["send-keys", "-t", target, keys, "Enter"])
    }

    /// Split the current window horizontally and run `command` in the new pane.
    pub fn split_window(&self, command: &str, dir: Option<&Path>) -> Result<()> {
        let mut args = vec!["split-window".to_string(), "-h".to_string()];
        if let Some(dir) = dir {
            args.push("-c".to_string());
            args.push(dir.to_string_lossy().into_owned());
        }
        args.push(command.to_string());
        self.run(args)
    }

    /// Open a new window named `name` running `command`.
    pub fn new_window(&self, name: &str, command: &str, dir: Option<&Path>) -> Result<()> {
        let mut args = vec!["new-window".to_string(), "-n".to_string(), name.to_string()];
        if let Some(dir) = dir {
            args.push("-c".to_string());
            args.push(dir.to_string_lossy().into_owned());
        }
        args.push(command.to_string());
        self.run(args)
    }

    /// Run `command` in a popup that closes when the command exits.
    pub fn display_popup(&self, command: &str, width: &str, height: &str) -> Result<()> {
        self.run([
            "display-popup",
            "-d",
            "#{pane_current_path}",
            "-w",
            width,
            "-h",
            height,
            "-E",
            command,
        ])
    }
}

impl SessionSource for TmuxClient {
    fn list_sessions(&self) -> Result<Vec<Session>> {
        let out = self
            .output(["list-sessions", "-F", LIST_SESSIONS_FORMAT])
            .context("Failed to list tmux sessions")?;
        Ok(parse_sessions(&out))
    }
}

impl WindowSource for TmuxClient {
    fn current_session(&self) -> Result<String> {
        TmuxClient::current_session(self)
    }

    fn list_windows(&self, session: &str) -> Result<Vec<Window>> {
        let out = self
            .output([
                "list-windows",
                "-t",
                &exact_target(session),
                "-F",
                LIST_WINDOWS_FORMAT,
            ])
            .with_context(|| format!("Failed to list windows of {session}"))?;
        Ok(parse_windows(session, &out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sessions_reads_all_fields() {
        let out = "api\t3\t1\t/home/u/api\t1700000100\nweb\t1\t0\t/home/u/web\t1700000000\n";
        let sessions = parse_sessions(out);

        assert_eq!(
            sessions,
            vec![
                Session {
                    name: "api".to_string(),
                    windows: 3,
                    attached: true,
                    path: "/home/u/api".to_string(),
                    activity: 1_700_000_100,
                },
                Session {
                    name: "web".to_string(),
                    windows: 1,
                    attached: false,
                    path: "/home/u/web".to_string(),
                    activity: 1_700_000_000,
                },
            ]
        );
    }

    #[test]
    fn parse_sessions_tolerates_missing_trailing_fields() {
        let sessions = parse_sessions("scratch\t2\t0\n");
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].name, "scratch");
        assert_eq!(sessions[0].path, "");
        assert_eq!(sessions[0].activity, 0);
    }

    #[test]
    fn parse_sessions_skips_short_and_blank_lines() {
        let sessions = parse_sessions("\nbroken\n\nok\t1\t0\t/tmp\t5\n");
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].name, "ok");
    }

    #[test]
    fn parse_sessions_keeps_spaces_in_paths() {
        let sessions = parse_sessions("notes\t1\t0\t/home/u/My Notes\t9\n");
        assert_eq!(sessions[0].path, "/home/u/My Notes");
        assert_eq!(sessions[0].activity, 9);
    }

    #[test]
    fn parse_windows_reads_index_name_and_active() {
        let windows = parse_windows("api", "1\t1\teditor\n2\t0\tlogs\nbad\n");
        assert_eq!(
            windows,
            vec![
                Window {
                    session_name: "api".to_string(),
                    index: 1,
                    name: "editor".to_string(),
                    active: true,
                },
                Window {
                    session_name: "api".to_string(),
                    index: 2,
                    name: "logs".to_string(),
                    active: false,
                },
            ]
        );
        assert_eq!(windows[1].target(), "api:2");
    }

    #[test]
    fn window_names_may_contain_tabs() {
        let windows = parse_windows("api", "3\t0\tbuild\twatch\n");
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].name, "build\twatch");
        assert!(!windows[0].active);
    }

    #[test]
    fn targets_match_sessions_exactly() {
        // `shop` must not resolve to an existing `shop-main`.
        assert_eq!(exact_target("shop"), "=shop");
        assert_eq!(exact_target("shop:2"), "=shop:2");
    }
}
