//! Configuration for seed generation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// File looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "iseed.toml";

/// Configuration passed to the [`SeedGenerator`](crate::SeedGenerator) at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IseedConfig {
    /// Project root; seed and stub paths are resolved against it.
    pub base_path: PathBuf,

    /// Directory for generated seeders, relative to `base_path`.
    pub seed_path: PathBuf,

    /// Template override. The embedded template is used when unset.
    pub stub_path: Option<PathBuf>,

    /// Composer executable used for `dump-autoload`.
    pub composer: String,

    /// Connection used when a request names none.
    pub default_connection: String,

    /// Named connection URLs.
    pub connections: BTreeMap<String, String>,
}

impl Default for IseedConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            seed_path: PathBuf::from("database/seeders"),
            stub_path: None,
            composer: "composer".to_string(),
            default_connection: "default".to_string(),
            connections: BTreeMap::new(),
        }
    }
}

impl IseedConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads the config from `path`, or from `iseed.toml` if it exists, or the defaults.
    /// `DATABASE_URL` fills the default connection when the file does not define it.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };

        let config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Read { path, source })?;
                Self::from_toml_str(&contents)?
            }
            None => Self::default(),
        };

        Ok(config.with_database_url(std::env::var("DATABASE_URL").ok()))
    }

    /// Registers `url` as the default connection unless one is already configured.
    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.connections
                .entry(self.default_connection.clone())
                .or_insert(url);
        }
        self
    }

    /// Absolute-ish seed directory (`base_path/seed_path`).
    pub fn seed_dir(&self) -> PathBuf {
        self.base_path.join(&self.seed_path)
    }

    pub fn connection_url(&self, name: &str) -> Option<&str> {
        self.connections.get(name).map(String::as_str)
    }
}
