//! muxtree library crate.
//!
//! This library provides the core functionality for muxtree, including:
//! - tmux session grouping by git repository and worktree
//! - a cache of resolved repositories and diff stats
//! - the command palette with recency ranking
//! - the terminal UI

pub mod agents;
pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod event_loop;
pub mod fuzzy;
pub mod git;
pub mod handlers;
pub mod input;
pub mod logging;
pub mod palette;
pub mod projects;
pub mod recency;
pub mod storage;
pub mod tmux;
pub mod topology;
pub mod ui;
pub mod worktree;
