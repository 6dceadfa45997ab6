//! Command-line interface: one seeder per table, processed in order.

use std::io::Write;
use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use tracing::{error, warn};

use crate::generator::{GenerationRequest, SeedGenerator};
use crate::models::SortDirection;

#[derive(Debug, Parser)]
#[command(name = "iseed")]
#[command(about = "Generate seed file from table")]
pub struct IseedArgs {
    /// Comma separated table names
    #[arg(value_delimiter = ',', required = true)]
    pub tables: Vec<String>,

    /// Clean the generated section of DatabaseSeeder.php first
    #[arg(long)]
    pub clean: bool,

    /// Overwrite existing seed classes
    #[arg(long)]
    pub force: bool,

    /// Database connection name from the config
    #[arg(long)]
    pub database: Option<String>,

    /// Max number of rows; values below 1 mean unlimited
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub max: i64,

    /// Rows per insert statement; values below 1 mean 500
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub chunksize: i64,

    /// Comma separated columns to leave out
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Comma separated prerun event classes, one per table
    #[arg(long, value_delimiter = ',')]
    pub prerun: Vec<String>,

    /// Comma separated postrun event classes, one per table
    #[arg(long, value_delimiter = ',')]
    pub postrun: Vec<String>,

    /// Run composer dump-autoload after writing
    #[arg(
        long,
        default_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub dumpauto: bool,

    /// Leave positional keys out of the row arrays
    #[arg(long)]
    pub noindex: bool,

    /// Column to order rows by
    #[arg(long)]
    pub orderby: Option<String>,

    /// Order direction (defaults to asc)
    #[arg(long, value_enum, ignore_case = true)]
    pub direction: Option<SortDirection>,

    /// Prefix for class and file name
    #[arg(long)]
    pub classnameprefix: Option<String>,

    /// Suffix for class and file name
    #[arg(long)]
    pub classnamesuffix: Option<String>,

    /// Config file (defaults to ./iseed.toml when present)
    #[arg(long, env = "ISEED_CONFIG")]
    pub config: Option<PathBuf>,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl IseedArgs {
    /// Table names, trimmed, in the order given.
    pub fn table_names(&self) -> Vec<String> {
        self.tables
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Builds the request for the table at `position`. Hooks are matched to
    /// tables by position.
    pub fn request_for(&self, table: &str, position: usize) -> GenerationRequest {
        let mut request = GenerationRequest::new(table)
            .with_max_rows(u64::try_from(self.max).unwrap_or(0))
            .with_chunk_size(usize::try_from(self.chunksize).unwrap_or(0))
            .with_exclude(
                self.exclude
                    .iter()
                    .map(|c| c.trim())
                    .filter(|c| !c.is_empty()),
            )
            .with_dump_autoload(self.dumpauto)
            .with_indexed(!self.noindex);

        request.prefix = self.classnameprefix.clone();
        request.suffix = self.classnamesuffix.clone();
        request.connection = self.database.clone();
        request.prerun_event = non_empty(self.prerun.get(position));
        request.postrun_event = non_empty(self.postrun.get(position));

        if let Some(column) = &self.orderby {
            request = request.with_order_by(column, self.direction.unwrap_or_default());
        }

        request
    }
}

/// Outcome of a CLI run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Generates a seeder for every table, writing one result line per table to `out`.
/// A failing table is reported and the remaining tables are still processed.
pub async fn run(
    args: &IseedArgs,
    generator: &mut SeedGenerator,
    out: &mut impl Write,
) -> anyhow::Result<BatchReport> {
    if args.clean {
        generator.clean_database_seeder()?;
    }

    let mut report = BatchReport::default();

    for (position, table) in args.table_names().into_iter().enumerate() {
        let request = args.request_for(&table, position);

        let artifact = match generator.artifact_for(&request) {
            Ok(artifact) => artifact,
            Err(e) => {
                error!("Seeding {table} failed: {e}");
                writeln!(out, "Could not create seed file from table {table}")?;
                report.failed.push(table);
                continue;
            }
        };
        if artifact.exists() && !args.force {
            warn!(
                "{} already exists, skipping table {table} (use --force to overwrite)",
                artifact.path.display()
            );
            report.skipped.push(table);
            continue;
        }

        match generator.generate_seed(&request).await {
            Ok(_) => {
                writeln!(out, "Created a seed file from table {table}")?;
                report.created.push(table);
            }
            Err(e) => {
                error!("Seeding {table} failed: {e}");
                writeln!(out, "Could not create seed file from table {table}")?;
                report.failed.push(table);
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = IseedArgs::try_parse_from(["iseed", "users, roles"]).unwrap();
        assert_eq!(args.table_names(), vec!["users", "roles"]);
        assert!(args.dumpauto);
        assert!(!args.noindex);
        assert!(!args.force);

        let request = args.request_for("users", 0);
        assert_eq!(request.max_rows, 0);
        assert_eq!(request.chunk_size, 0);
        assert!(request.indexed);
        assert!(request.order_by.is_none());
        assert!(request.prerun_event.is_none());
    }

    #[test]
    fn test_parse_full() {
        let args = IseedArgs::try_parse_from([
            "iseed",
            "users,posts",
            "--max",
            "10",
            "--chunksize",
            "-5",
            "--exclude",
            "password, remember_token",
            "--prerun",
            "BeforeUsers",
            "--postrun",
            ",AfterPosts",
            "--dumpauto",
            "0",
            "--noindex",
            "--orderby",
            "id",
            "--direction",
            "DESC",
            "--classnameprefix",
            "Old",
            "--database",
            "legacy",
        ])
        .unwrap();

        let users = args.request_for("users", 0);
        assert_eq!(users.max_rows, 10);
        assert_eq!(users.chunk_size, 0);
        assert_eq!(users.exclude, vec!["password", "remember_token"]);
        assert_eq!(users.prerun_event.as_deref(), Some("BeforeUsers"));
        assert_eq!(users.postrun_event, None);
        assert!(!users.dump_autoload);
        assert!(!users.indexed);
        assert_eq!(users.order_by.as_deref(), Some("id"));
        assert_eq!(users.direction, SortDirection::Desc);
        assert_eq!(users.prefix.as_deref(), Some("Old"));
        assert_eq!(users.connection.as_deref(), Some("legacy"));

        let posts = args.request_for("posts", 1);
        assert_eq!(posts.prerun_event, None);
        assert_eq!(posts.postrun_event.as_deref(), Some("AfterPosts"));
    }

    #[test]
    fn test_order_direction_defaults_to_asc() {
        let args = IseedArgs::try_parse_from(["iseed", "users", "--orderby", "id"]).unwrap();
        assert_eq!(args.request_for("users", 0).direction, SortDirection::Asc);
    }

    #[test]
    fn test_tables_required() {
        assert!(IseedArgs::try_parse_from(["iseed"]).is_err());
    }
}
