pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod inspect;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod source;
mod utils;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use config::IngestConfig;
use db::Database;
use pipeline::IngestionPipeline;

pub use error::IngestError;
pub use features::{extract_health_indicators, HealthIndicators};

#[derive(Parser, Debug)]
#[command(
    name = "battery-health",
    about = "Extract per-cycle battery health indicators into SQLite"
)]
struct Cli {
    /// JSON configuration file; defaults apply when it does not exist.
    #[arg(
        long,
        global = true,
        env = "BATTERY_HEALTH_CONFIG",
        default_value = "battery-health.json"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Drop and recreate the store, then ingest every configured battery
    Build,
    /// Replace only the configured batteries' rows in the existing store
    Ingest,
    /// Drop and recreate the store without ingesting
    Reset,
    /// Print row counts and a preview of each relation
    Inspect,
}

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let config = IngestConfig::load(&cli.config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(dispatch(cli.command.unwrap_or(Command::Build), config))
}

async fn dispatch(command: Command, config: IngestConfig) -> Result<()> {
    let database = Database::new(config.database_path.clone())?;

    match command {
        Command::Reset => {
            database.reset().await?;
        }
        Command::Inspect => {
            let overview = inspect::render_overview(&database, config.preview_limit).await?;
            println!("{overview}");
        }
        Command::Build | Command::Ingest => {
            let pipeline = IngestionPipeline::new(config, database.clone());
            let report = if command == Command::Build {
                pipeline.build().await?
            } else {
                pipeline.ingest().await?
            };

            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_clean() {
                bail!(
                    "{} of {} batteries failed",
                    report.failures.len(),
                    report.failures.len() + report.batteries.len()
                );
            }
            log::info!("Database {} built successfully", database.path().display());
        }
    }

    Ok(())
}
