//! Generate PHP seeder classes from a snapshot of existing database tables.
//!
//! The [`SeedGenerator`] reads a table through a [`db::RowFetcher`], renders the
//! rows as PHP array literals in batches and writes a seeder class named after
//! the table.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use iseed::prelude::*;
//!
//! let config = IseedConfig::load(None)?;
//! let mut generator = SeedGenerator::new(config);
//!
//! let request = GenerationRequest::new("user_roles")
//!     .with_order_by("id", SortDirection::Asc)
//!     .with_chunk_size(200)
//!     .with_exclude(["updated_at"]);
//!
//! let artifact = generator.generate_seed(&request).await?;
//! assert_eq!(artifact.class_name, "UserRolesTableSeeder");
//! ```

pub mod autoload;
pub mod cli;
pub mod config;
pub mod database_seeder;
pub mod db;
pub mod errors;
pub mod export;
pub mod generator;
pub mod models;
pub mod naming;
pub mod stub;

pub use config::IseedConfig;
pub use errors::{ConfigError, SeedError};
pub use generator::{GenerationRequest, SeedGenerator};
pub use naming::GeneratedArtifact;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::IseedConfig;
    pub use crate::db::{Connections, FetchOptions, RowFetcher, SourcePool};
    pub use crate::errors::SeedError;
    pub use crate::generator::{GenerationRequest, SeedGenerator};
    pub use crate::models::{SeedValue, SortDirection, TableRow};
    pub use crate::naming::{GeneratedArtifact, class_name};
}
