use std::collections::HashMap;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::IseedConfig;
use crate::errors::SeedError;

/// SQL flavour, used for identifier quoting and schema queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
}

impl Dialect {
    /// Picks the dialect from a connection URL scheme.
    pub fn from_url(url: &str) -> Result<Self, SeedError> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "sqlite" => Ok(Dialect::Sqlite),
            _ => Err(SeedError::UnsupportedScheme(url.to_string())),
        }
    }

    /// Quotes an identifier, doubling any embedded quote character.
    pub fn quote_ident(&self, ident: &str) -> String {
        let quote = match self {
            Dialect::MySql => '`',
            Dialect::Postgres | Dialect::Sqlite => '"',
        };
        let mut quoted = String::with_capacity(ident.len() + 2);
        quoted.push(quote);
        for c in ident.chars() {
            if c == quote {
                quoted.push(quote);
            }
            quoted.push(c);
        }
        quoted.push(quote);
        quoted
    }
}

/// A pool for one of the supported drivers.
#[derive(Debug, Clone)]
pub enum SourcePool {
    Postgres(PgPool),
    MySql(MySqlPool),
    Sqlite(SqlitePool),
}

impl SourcePool {
    /// Connects to `url`, choosing the driver from its scheme.
    pub async fn connect(url: &str) -> Result<Self, SeedError> {
        let pool = match Dialect::from_url(url)? {
            Dialect::Postgres => SourcePool::Postgres(
                PgPoolOptions::new()
                    .max_connections(1)
                    .connect(url)
                    .await?,
            ),
            Dialect::MySql => SourcePool::MySql(
                MySqlPoolOptions::new()
                    .max_connections(1)
                    .connect(url)
                    .await?,
            ),
            Dialect::Sqlite => SourcePool::Sqlite(
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect(url)
                    .await?,
            ),
        };
        Ok(pool)
    }

    pub fn dialect(&self) -> Dialect {
        match self {
            SourcePool::Postgres(_) => Dialect::Postgres,
            SourcePool::MySql(_) => Dialect::MySql,
            SourcePool::Sqlite(_) => Dialect::Sqlite,
        }
    }
}

/// Named connections, opened on first use.
#[derive(Debug, Default)]
pub struct Connections {
    urls: HashMap<String, String>,
    default: String,
    pools: HashMap<String, SourcePool>,
}

impl Connections {
    pub fn from_config(config: &IseedConfig) -> Self {
        Self {
            urls: config
                .connections
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            default: config.default_connection.clone(),
            pools: HashMap::new(),
        }
    }

    /// Registers an already open pool under `name`.
    pub fn with_pool(mut self, name: impl Into<String>, pool: SourcePool) -> Self {
        self.pools.insert(name.into(), pool);
        self
    }

    /// Name used when a request does not pick a connection.
    pub fn default_name(&self) -> &str {
        &self.default
    }

    /// Returns the pool for `name` (or the default), connecting if needed.
    pub async fn get(&mut self, name: Option<&str>) -> Result<&SourcePool, SeedError> {
        let name = name.unwrap_or(&self.default).to_string();

        if !self.pools.contains_key(&name) {
            let url = self
                .urls
                .get(&name)
                .ok_or_else(|| SeedError::UnknownConnection(name.clone()))?;
            info!("Connecting to database connection {name}");
            let pool = SourcePool::connect(url).await?;
            self.pools.insert(name.clone(), pool);
        }

        self.pools
            .get(&name)
            .ok_or(SeedError::UnknownConnection(name))
    }
}
