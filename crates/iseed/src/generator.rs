//! Seed generation: fetch a table snapshot and write it as a seeder class.

use tracing::{debug, info, warn};

use crate::autoload::Composer;
use crate::config::IseedConfig;
use crate::database_seeder::DatabaseSeeder;
use crate::db::{Connections, FetchOptions, RowFetcher};
use crate::errors::SeedError;
use crate::models::SortDirection;
use crate::naming::GeneratedArtifact;
use crate::stub::{self, DEFAULT_CHUNK_SIZE, StubContext};

/// Everything needed to generate one seeder.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub table: String,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    /// Named connection; the configured default when unset.
    pub connection: Option<String>,
    /// Row cap; 0 means unlimited.
    pub max_rows: u64,
    /// Rows per insert statement; 0 falls back to 500.
    pub chunk_size: usize,
    pub exclude: Vec<String>,
    pub prerun_event: Option<String>,
    pub postrun_event: Option<String>,
    pub dump_autoload: bool,
    pub register_seeder: bool,
    pub indexed: bool,
    pub order_by: Option<String>,
    pub direction: SortDirection,
}

impl GenerationRequest {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            prefix: None,
            suffix: None,
            connection: None,
            max_rows: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
            exclude: Vec::new(),
            prerun_event: None,
            postrun_event: None,
            dump_autoload: true,
            register_seeder: true,
            indexed: true,
            order_by: None,
            direction: SortDirection::Asc,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }

    pub fn with_max_rows(mut self, max_rows: u64) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_exclude<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_prerun_event(mut self, hook: impl Into<String>) -> Self {
        self.prerun_event = Some(hook.into());
        self
    }

    pub fn with_postrun_event(mut self, hook: impl Into<String>) -> Self {
        self.postrun_event = Some(hook.into());
        self
    }

    pub fn with_dump_autoload(mut self, enabled: bool) -> Self {
        self.dump_autoload = enabled;
        self
    }

    pub fn with_register_seeder(mut self, enabled: bool) -> Self {
        self.register_seeder = enabled;
        self
    }

    pub fn with_indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    pub fn with_order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some(column.into());
        self.direction = direction;
        self
    }

    fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            exclude: self.exclude.clone(),
            order_by: self.order_by.clone().map(|c| (c, self.direction)),
            limit: self.max_rows,
        }
    }
}

/// Generates seeder files from live tables.
pub struct SeedGenerator {
    config: IseedConfig,
    connections: Connections,
}

impl SeedGenerator {
    /// Creates a generator that opens the configured connections on demand.
    pub fn new(config: IseedConfig) -> Self {
        let connections = Connections::from_config(&config);
        Self::with_connections(config, connections)
    }

    pub fn with_connections(config: IseedConfig, connections: Connections) -> Self {
        Self {
            config,
            connections,
        }
    }

    pub fn config(&self) -> &IseedConfig {
        &self.config
    }

    /// Where the seeder for `request` is written.
    pub fn artifact_for(&self, request: &GenerationRequest) -> Result<GeneratedArtifact, SeedError> {
        GeneratedArtifact::resolve(
            &self.config.seed_dir(),
            &request.table,
            request.prefix.as_deref(),
            request.suffix.as_deref(),
        )
    }

    /// Empties the generated section of `DatabaseSeeder.php`, if the file exists.
    pub fn clean_database_seeder(&self) -> Result<bool, SeedError> {
        let seeder = DatabaseSeeder::new(&self.config.seed_dir());
        if !seeder.exists() {
            return Ok(false);
        }
        seeder.clean()
    }

    /// Writes the seeder for `request.table`, overwriting any existing file.
    ///
    /// Nothing is written when the table is missing, the class name or a hook
    /// name is invalid, or a column cannot be rendered. Once the seeder is
    /// written, failing to register it in `DatabaseSeeder.php` is only logged.
    pub async fn generate_seed(
        &mut self,
        request: &GenerationRequest,
    ) -> Result<GeneratedArtifact, SeedError> {
        let artifact = self.artifact_for(request)?;
        debug!(
            "Seeder for {} resolves to {}",
            request.table,
            artifact.path.display()
        );

        for hook in [&request.prerun_event, &request.postrun_event]
            .into_iter()
            .flatten()
        {
            stub::validate_hook(hook)?;
        }

        let rows = {
            let pool = self.connections.get(request.connection.as_deref()).await?;
            RowFetcher::new(pool)
                .fetch(&request.table, &request.fetch_options())
                .await?
        };
        info!("Read {} rows from {}", rows.len(), request.table);

        let stub_path = self
            .config
            .stub_path
            .as_ref()
            .map(|p| self.config.base_path.join(p));
        let template = stub::load_stub(stub_path.as_deref())?;

        let content = stub::populate_stub(
            &template,
            &StubContext {
                class: &artifact.class_name,
                table: &request.table,
                rows: &rows,
                chunk_size: request.chunk_size,
                prerun_event: request.prerun_event.as_deref(),
                postrun_event: request.postrun_event.as_deref(),
                indexed: request.indexed,
            },
        )?;

        let seed_dir = self.config.seed_dir();
        std::fs::create_dir_all(&seed_dir).map_err(|e| SeedError::io(&seed_dir, e))?;
        std::fs::write(&artifact.path, content).map_err(|e| SeedError::io(&artifact.path, e))?;
        info!(
            "Wrote {} ({} insert statements)",
            artifact.path.display(),
            stub::batch_count(rows.len(), request.chunk_size)
        );

        if request.register_seeder {
            let seeder = DatabaseSeeder::new(&seed_dir);
            if seeder.exists() {
                if let Err(e) = seeder.register(&artifact.class_name) {
                    warn!(
                        "Wrote {} but could not register it in {}: {e}",
                        artifact.path.display(),
                        seeder.path().display()
                    );
                }
            }
        }

        if request.dump_autoload {
            Composer::new(&self.config.composer, &self.config.base_path)
                .dump_autoloads()
                .await;
        }

        Ok(artifact)
    }
}
