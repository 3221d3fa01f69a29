//! Configuration management for muxtree.
//!
//! Settings are read from `config.toml` in the muxtree config directory.
//! A/B launch settings can be overridden from the environment.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "muxtree";
const CONFIG_FILE: &str = "config.toml";

/// Directory holding muxtree's config, cache and recency files
pub fn app_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not find config directory")?;
    Ok(config_dir.join(APP_DIR))
}

/// Main configuration struct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Modifier required for digit quick-select shortcuts
    #[serde(default)]
    pub quick_select: QuickSelectModifier,

    /// How long fetched worktree diff stats stay valid in the cache
    #[serde(default = "default_stats_ttl_secs")]
    pub stats_ttl_secs: u64,

    /// A/B agent launch settings
    #[serde(default)]
    pub ab: AbConfig,
}

fn default_stats_ttl_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quick_select: QuickSelectModifier::default(),
            stats_ttl_secs: default_stats_ttl_secs(),
            ab: AbConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from disk, or return default if not found.
    /// Environment overrides are applied on top.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from an explicit path without environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate();

        Ok(config)
    }

    /// Apply `MUXTREE_AB_*` overrides. Blank values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = read("MUXTREE_AB_CODEX_TEMPLATE") {
            self.ab.codex_template = v;
        }
        if let Some(v) = read("MUXTREE_AB_CLAUDE_TEMPLATE") {
            self.ab.claude_template = v;
        }
        if let Some(v) = read("MUXTREE_AB_PLAN_PREFIX") {
            self.ab.plan_prefix = v;
        }
        if let Some(v) = read("MUXTREE_AB_BASE_BRANCH") {
            self.ab.base_branch = v;
        }
    }

    /// Clamp the stats lifetime to 1s..=1h
    pub fn validate(&mut self) {
        self.stats_ttl_secs = self.stats_ttl_secs.clamp(1, 3600);
    }

    /// Get the path to the config file
    fn config_path() -> Result<PathBuf> {
        Ok(app_dir()?.join(CONFIG_FILE))
    }
}

/// A/B launch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbConfig {
    /// Command template for Codex, must contain `{prompt}`
    pub codex_template: String,
    /// Command template for Claude, must contain `{prompt}`
    pub claude_template: String,
    /// Prepended to Claude's prompt in plan mode
    pub plan_prefix: String,
    /// Branch the A/B worktrees are cut from
    pub base_branch: String,
}

impl Default for AbConfig {
    fn default() -> Self {
        Self {
            codex_template: "codex {prompt}".to_string(),
            claude_template: "claude {prompt}".to_string(),
            plan_prefix: "/plan ".to_string(),
            base_branch: "main".to_string(),
        }
    }
}

/// Modifier for the 1-9 quick-select shortcuts
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum QuickSelectModifier {
    /// Bare digits select
    #[default]
    None,
    /// Alt+digit selects, bare digits are typed into inputs
    Alt,
}
