//! Layered configuration.
//!
//! Priority, highest first: CLI flags, environment variables (through clap's
//! `env`), the TOML file, compiled defaults. A missing default config file is
//! fine; an explicit `--config` path that does not exist is an error.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::models::state::{Sort, SortBy, SortDirection};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    storage: StorageFileConfig,
    logging: LoggingFileConfig,
    view: ViewFileConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StorageFileConfig {
    data_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LoggingFileConfig {
    level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ViewFileConfig {
    sort_by: Option<SortBy>,
    direction: Option<SortDirection>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
    /// Sort every session starts with
    pub initial_sort: Sort,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: String::from("warn"),
            initial_sort: Sort::default(),
        }
    }
}

/// Overrides coming from the command line or the environment.
#[derive(Debug, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let file = match explicit_path {
            Some(path) => read_config_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => read_config_file(&path)?,
                _ => ConfigFile::default(),
            },
        };

        Ok(Self::resolve(file, overrides))
    }

    fn resolve(file: ConfigFile, overrides: Overrides) -> Self {
        let defaults = Self::default();
        let default_sort = defaults.initial_sort;

        Self {
            data_dir: overrides
                .data_dir
                .or(file.storage.data_dir)
                .unwrap_or(defaults.data_dir),
            log_level: overrides
                .log_level
                .or(file.logging.level)
                .unwrap_or(defaults.log_level),
            initial_sort: Sort {
                by: file.view.sort_by.unwrap_or(default_sort.by),
                direction: file.view.direction.unwrap_or(default_sort.direction),
            },
        }
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskflow").join("config.toml"))
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskflow")
}
