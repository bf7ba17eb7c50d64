//! Alumnet Ingest - alumni registry import tool

use std::path::PathBuf;

use alumnet_common::logging::{init_logging, LogConfig, LogLevel};
use alumnet_ingest::backfill::BackfillPipeline;
use alumnet_ingest::config::{self, ImportConfig, DEFAULT_PAGE_SIZE};
use alumnet_ingest::pipeline::IngestionPipeline;
use alumnet_ingest::store::PgAlumniStore;
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "alumnet-ingest")]
#[command(author, version, about = "Alumnet registry import and backfill tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a tab-delimited registry export
    Import {
        /// Which school profile to import under
        #[arg(long, value_enum)]
        school: School,

        /// Path to the export file
        #[arg(short, long)]
        file: PathBuf,

        /// Store identifier of the owning institution
        #[arg(long)]
        institution_id: i64,

        /// Override the profile's cohort year
        #[arg(long)]
        cohort_year: Option<i32>,

        /// Override the profile's level code
        #[arg(long)]
        level_code: Option<String>,

        /// Records per bulk-insert call
        #[arg(long)]
        batch_size: Option<usize>,

        /// Write the run report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Backfill the derived graduation year on stored records
    Backfill {
        /// Records per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: i64,

        /// Write the run report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum School {
    Spaco,
    Stpatricks,
}

impl School {
    fn profile(self, institution_id: i64) -> ImportConfig {
        match self {
            School::Spaco => ImportConfig::spaco(institution_id),
            School::Stpatricks => ImportConfig::st_patricks(institution_id),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let mut log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("alumnet-ingest".to_string())
        .build();

    // Environment variables take precedence over the CLI defaults
    log_config.apply_env()?;

    init_logging(&log_config)?;

    // One store client per process run, released after the run.
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&config::database_url()?)
        .await?;
    let store = PgAlumniStore::new(pool.clone());

    let result = run(cli.command, store).await;
    pool.close().await;
    result
}

async fn run(command: Command, store: PgAlumniStore) -> Result<()> {
    match command {
        Command::Import {
            school,
            file,
            institution_id,
            cohort_year,
            level_code,
            batch_size,
            report,
        } => {
            let mut config = school.profile(institution_id);
            if let Some(year) = cohort_year {
                config = config.with_cohort_year(year);
            }
            if let Some(level) = level_code {
                config = config.with_level_code(level);
            }
            if let Some(size) = batch_size {
                config = config.with_batch_size(size);
            }

            info!(school = ?school, file = %file.display(), "importing registry export");
            let summary = IngestionPipeline::new(store, config).run(&file).await?;
            info!("{summary}");
            write_report(report.as_deref(), &summary)?;
        }
        Command::Backfill { page_size, report } => {
            info!(page_size, "backfilling graduation years");
            let summary = BackfillPipeline::new(store, page_size).run().await?;
            info!("{summary}");
            write_report(report.as_deref(), &summary)?;
        }
    }

    info!("run complete");
    Ok(())
}

fn write_report<T: serde::Serialize>(path: Option<&std::path::Path>, report: &T) -> Result<()> {
    if let Some(path) = path {
        std::fs::write(path, serde_json::to_string_pretty(report)?)?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}
