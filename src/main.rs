//! firn: dataset provisioning and checkpoint relay for streaming BigQuery
//! targets.
//!
//! Reads pipeline messages on standard input, guarantees the destination
//! dataset exists before anything flows, hands records to the loader, and
//! acknowledges state checkpoints on standard output.

use clap::Parser;
use snafu::prelude::*;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use firn::config::Config;
use firn::error::{ConfigSnafu, ConnectSnafu, ProvisionSnafu, TargetError};
use firn::loader::NullLoader;
use firn::{BigQueryWarehouse, StateEmitter, ensure_dataset, run_pipeline};

/// Streaming pipeline target for BigQuery.
#[derive(Parser, Debug)]
#[command(name = "firn")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Dry run - validate configuration without contacting BigQuery.
    #[arg(long)]
    dry_run: bool,
}

#[snafu::report]
#[tokio::main]
async fn main() -> Result<(), TargetError> {
    let args = Args::parse();

    // Standard output is the acknowledgement channel; every diagnostic goes
    // to stderr.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    info!("firn starting");

    let config = Config::from_file(&args.config).context(ConfigSnafu)?;

    if args.dry_run {
        info!("Dry run mode - validating configuration");
        info!("Project: {}", config.target.project_id);
        info!("Dataset: {}", config.target.dataset_id);
        info!(
            "Location: {}",
            config.target.location.as_deref().unwrap_or("(provider default)")
        );
        info!(
            "Credentials: {}",
            if config.target.service_credentials.is_some() {
                "inline service account key"
            } else {
                "application default"
            }
        );
        match &config.state.file {
            Some(path) => info!("State file: {}", path.display()),
            None => info!("State file: disabled"),
        }
        info!("Configuration is valid");
        return Ok(());
    }

    let warehouse = BigQueryWarehouse::connect(&config.target)
        .await
        .context(ConnectSnafu)?;
    let dataset = ensure_dataset(&warehouse, &config.target.dataset_ref())
        .await
        .context(ProvisionSnafu)?;
    info!(
        "Dataset {}.{} ready ({})",
        dataset.project_id,
        dataset.dataset_id,
        dataset.location.as_deref().unwrap_or("provider default location")
    );

    let mut emitter = StateEmitter::stdout(config.state.file.clone());
    let mut loader = NullLoader::default();
    warn!("No record loader configured; records are counted and discarded");

    let stdin = std::io::stdin();
    let stats = run_pipeline(stdin.lock(), &mut loader, &mut emitter).await?;

    info!("Pipeline completed");
    info!("  Records seen: {}", stats.records);
    info!("  Schemas seen: {}", stats.schemas);
    info!("  Checkpoints acknowledged: {}", stats.checkpoints_emitted);
    info!("  Loader commits: {}", stats.commits);

    Ok(())
}
