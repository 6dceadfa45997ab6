use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Table {0} was not found.")]
    TableNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Column {column} has type {type_name} which cannot be written to a seed")]
    UnsupportedType { column: String, type_name: String },

    #[error("Invalid hook class name: {0}")]
    InvalidHook(String),

    #[error("Invalid seeder class name: {0}")]
    InvalidClassName(String),

    #[error("Unknown database connection: {0}")]
    UnknownConnection(String),

    #[error("Unsupported database URL: {0}")]
    UnsupportedScheme(String),
}

impl SeedError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
