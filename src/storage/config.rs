//! Retention policy configuration
//!
//! Policies live in `stash.toml` next to the stored documents, with a
//! per-user fallback at the platform config directory:
//!
//! ```toml
//! [retention.plan]
//! window_days = 90
//!
//! [retention.http]
//! window_days = 14
//! count = 5
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// File name of the per-store config.
pub const CONFIG_FILE: &str = "stash.toml";

/// Retention rules for one document type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicy {
    /// Maximum age in days before a document becomes cleanup-eligible.
    pub window_days: Option<i64>,

    /// How many of the most recent documents to keep regardless of age.
    pub count: Option<usize>,
}

impl RetentionPolicy {
    /// The age limit as a duration, when configured.
    pub fn window(&self) -> Option<chrono::Duration> {
        self.window_days.map(chrono::Duration::days)
    }
}

/// Store-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Retention policy per document type.
    pub retention: BTreeMap<String, RetentionPolicy>,
}

impl Config {
    /// Loads the configuration for a store root: `<root>/stash.toml` when
    /// present, else the per-user config, else defaults.
    pub fn load_for_root(root: &Path) -> Result<Self> {
        let local = root.join(CONFIG_FILE);
        if local.is_file() {
            return Self::load_file(&local);
        }
        if let Some(global) = Self::global_config_path() {
            if global.is_file() {
                return Self::load_file(&global);
            }
        }
        Ok(Self::default())
    }

    /// Returns the per-user config file path.
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "stash", "stash-cli")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }
}
