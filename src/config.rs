/// Runtime configuration
///
/// Resolved from the environment once at startup. Everything lives under a
/// single data directory in the user's home, the same way the shell tooling
/// keeps its database next to its hooks.

use crate::error::{RegistryError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Storage slot the registry snapshot is written to
pub const DEFAULT_STORAGE_KEY: &str = "antigravity-projects";

/// Directory name created under the home directory
const DATA_DIR_NAME: &str = ".antigravity-projects";

const DATABASE_FILE: &str = "projects.db";

/// Overrides the data directory
pub const HOME_ENV: &str = "ANTIGRAVITY_PROJECTS_HOME";

/// Overrides the storage key
pub const KEY_ENV: &str = "ANTIGRAVITY_PROJECTS_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub storage_key: String,
}

impl Config {
    /// Build a config rooted at an explicit directory
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    /// Read the config from environment variables, falling back to
    /// `~/.antigravity-projects`
    pub fn from_env() -> Result<Self> {
        let data_dir = match env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .ok_or_else(|| {
                    RegistryError::Config("Could not determine home directory".to_string())
                })?
                .join(DATA_DIR_NAME),
        };

        let mut config = Self::new(data_dir);
        if let Some(key) = env::var(KEY_ENV).ok().filter(|key| !key.trim().is_empty()) {
            config.storage_key = key;
        }

        Ok(config)
    }

    /// Location of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}
