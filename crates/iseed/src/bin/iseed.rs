//! Generate seed files from tables
//!
//! Run with:
//! ```
//! cargo run -p iseed -- users,roles --orderby id
//! ```

use clap::Parser;
use iseed::cli::{self, IseedArgs};
use iseed::{IseedConfig, SeedGenerator};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = IseedArgs::parse();
    let config = IseedConfig::load(args.config.as_deref())?;

    tracing::debug!("Writing seeders to {}", config.seed_dir().display());

    let mut generator = SeedGenerator::new(config);
    let report = cli::run(&args, &mut generator, &mut std::io::stdout()).await?;

    if !report.is_success() {
        anyhow::bail!("{} table(s) could not be seeded", report.failed.len());
    }

    Ok(())
}
