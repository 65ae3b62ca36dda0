//! Layered configuration using figment.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`TASKDECK_*`, `__` separates nested keys,
//!    e.g. `TASKDECK_LIST__PAGE_SIZE=25`)
//! 2. `./taskdeck.toml`
//! 3. `~/.config/taskdeck/config.toml`
//! 4. Built-in defaults

use std::path::PathBuf;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::app::ListState;
use crate::listing::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, SortConfig};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("page size {0} is not one of {PAGE_SIZE_OPTIONS:?}")]
    InvalidPageSize(usize),
}

const fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("taskdeck").join("tasks.json"))
        .unwrap_or_else(|| PathBuf::from("tasks.json"))
}

/// Initial list settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ListConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default)]
    pub sort: SortConfig,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sort: SortConfig::default(),
        }
    }
}

impl ListConfig {
    pub fn initial_state(&self) -> ListState {
        ListState {
            sort: self.sort,
            page_size: self.page_size,
            ..ListState::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaskdeckConfig {
    #[serde(default)]
    pub list: ListConfig,

    /// JSON file the CLI loads the store from and saves it back to.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

impl Default for TaskdeckConfig {
    fn default() -> Self {
        Self {
            list: ListConfig::default(),
            data_file: default_data_file(),
        }
    }
}

impl TaskdeckConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(Box::new)?;
        if !PAGE_SIZE_OPTIONS.contains(&config.list.page_size) {
            return Err(ConfigError::InvalidPageSize(config.list.page_size));
        }
        Ok(config)
    }

    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        figment
            .merge(Toml::file("taskdeck.toml"))
            .merge(Env::prefixed("TASKDECK_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("taskdeck").join("config.toml"))
    }
}
