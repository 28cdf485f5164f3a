use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    errors::{BudgetError, Result},
    ledger::Currency,
    utils::persistence::write_atomic,
};

pub const HOME_ENV_VAR: &str = "RECURRING_BUDGET_HOME";
const DEFAULT_DIR_NAME: &str = ".recurring_budget";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const SNAPSHOT_DIR: &str = "snapshots";

/// Engine-wide settings persisted as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub default_currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl EngineConfig {
    /// Directory snapshots are written to: the configured one, else
    /// `<base>/snapshots`.
    pub fn resolve_snapshot_dir(&self) -> PathBuf {
        self.snapshot_dir
            .clone()
            .unwrap_or_else(|| base_dir().join(SNAPSHOT_DIR))
    }
}

/// Base directory for engine state. `RECURRING_BUDGET_HOME` overrides the default
/// `~/.recurring_budget`.
pub fn base_dir() -> PathBuf {
    if let Ok(dir) = env::var(HOME_ENV_VAR) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Loads and saves [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Manager for `<base>/config/config.json`, creating the directories.
    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        let config_dir = base.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir).map_err(config_error)?;
        Ok(Self::new(config_dir.join(CONFIG_FILE)))
    }

    pub fn from_default_location() -> Result<Self> {
        Self::with_base_dir(base_dir())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<EngineConfig> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(EngineConfig::default());
        }
        let data = fs::read_to_string(&self.config_path).map_err(config_error)?;
        serde_json::from_str(&data).map_err(config_error)
    }

    pub fn save(&self, config: &EngineConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config).map_err(config_error)?;
        write_atomic(&self.config_path, &json)
            .map_err(|err| BudgetError::ConfigError(err.to_string()))?;
        tracing::debug!(path = %self.config_path.display(), "config saved");
        Ok(())
    }
}

fn config_error(err: impl std::fmt::Display) -> BudgetError {
    BudgetError::ConfigError(err.to_string())
}
