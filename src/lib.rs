//! firn: dataset provisioning and checkpoint relay for streaming BigQuery
//! targets.
//!
//! This library provides the pieces a stdin-driven pipeline target needs
//! around an external record loader: idempotent provisioning of the
//! destination BigQuery dataset, and durable acknowledgement of state
//! checkpoints on standard output (optionally mirrored to an append-only
//! local file).
//!
//! # Example
//!
//! ```ignore
//! use firn::{BigQueryWarehouse, Config, StateEmitter, ensure_dataset, run_pipeline};
//! use firn::error::{ConnectSnafu, TargetError};
//! use firn::loader::NullLoader;
//! use snafu::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), TargetError> {
//!     let config = Config::from_file("config.yaml")?;
//!     let warehouse = BigQueryWarehouse::connect(&config.target)
//!         .await
//!         .context(ConnectSnafu)?;
//!     let dataset = ensure_dataset(&warehouse, &config.target.dataset_ref()).await?;
//!     println!("dataset {} ready", dataset.dataset_id);
//!
//!     let mut emitter = StateEmitter::stdout(config.state.file.clone());
//!     let mut loader = NullLoader::default();
//!     let stdin = std::io::stdin();
//!     run_pipeline(stdin.lock(), &mut loader, &mut emitter).await?;
//!     Ok(())
//! }
//! ```

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod incoming;
pub mod loader;
pub mod pipeline;
pub mod provision;
pub mod warehouse;

// Re-export main types
pub use checkpoint::StateEmitter;
pub use config::Config;
pub use pipeline::{PipelineStats, run_pipeline};
pub use provision::ensure_dataset;
pub use warehouse::{BigQueryWarehouse, DatasetHandle, DatasetRef, Warehouse};
