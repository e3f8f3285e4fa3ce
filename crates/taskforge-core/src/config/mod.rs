//! # Run Configuration
//!
//! Immutable per-manager settings, loadable from a TOML file and
//! overridable by the CLI before the [`Manager`](crate::manager::Manager)
//! is constructed. Nothing here mutates after the manager takes ownership.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Selector deciding which addons skip environment-prefix-based defaults.
///
/// Either a blanket boolean or an explicit set of addon names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnvIgnore {
    All(bool),
    Named(BTreeSet<String>),
}

impl EnvIgnore {
    /// Whether the given addon should ignore environment defaults.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            EnvIgnore::All(all) => *all,
            EnvIgnore::Named(names) => names.contains(name),
        }
    }
}

impl Default for EnvIgnore {
    fn default() -> Self {
        EnvIgnore::All(false)
    }
}

/// Immutable run configuration for a manager.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Stop the current workflow on the first generation-time error.
    pub strict: bool,
    /// Prefix applied to every task name emitted by this manager.
    pub task_prefix: String,
    /// Addon names that must never be instantiated.
    pub disable_addons: BTreeSet<String>,
    /// Which addons skip environment-prefix-based defaults.
    pub ignore_env: EnvIgnore,
    /// Extra arguments passed through to the execution engine unmodified.
    pub extra_args: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            strict: true,
            task_prefix: String::new(),
            disable_addons: BTreeSet::new(),
            ignore_env: EnvIgnore::default(),
            extra_args: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
