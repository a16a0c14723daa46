//! Error types for firn using snafu.
//!
//! This module defines structured error types with context selectors for
//! all error conditions in the codebase.

use snafu::prelude::*;
use std::path::PathBuf;

// ============ Config Errors ============

/// Errors that can occur during configuration parsing and validation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// Project id is empty.
    #[snafu(display("target.project_id cannot be empty"))]
    EmptyProjectId,

    /// Dataset id is empty.
    #[snafu(display("target.dataset_id cannot be empty"))]
    EmptyDatasetId,

    /// Environment variable interpolation failed.
    #[snafu(display("Environment variable interpolation failed:\n{message}"))]
    EnvInterpolation { message: String },

    /// Failed to parse YAML configuration.
    #[snafu(display("Failed to parse YAML configuration"))]
    YamlParse { source: serde_yaml::Error },

    /// Failed to read configuration file.
    #[snafu(display("Failed to read configuration file"))]
    ReadFile { source: std::io::Error },
}

// ============ Checkpoint Errors ============

/// Errors that can occur while acknowledging state checkpoints.
///
/// Every variant is a hard failure. A dropped acknowledgement means a
/// resumed run would replay work the orchestrator believes is committed.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CheckpointError {
    /// State could not be serialized to a single JSON line.
    #[snafu(display("Failed to encode state as JSON"))]
    Encode { source: serde_json::Error },

    /// Writing the acknowledgement line failed.
    #[snafu(display("Failed to write state acknowledgement"))]
    AckWrite { source: std::io::Error },

    /// Appending to the local state file failed.
    #[snafu(display("Failed to append state to {}", path.display()))]
    StateFileAppend {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ============ Warehouse Errors ============

/// Errors surfaced by the warehouse control plane.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum WarehouseError {
    /// The dataset does not exist. Expected during provisioning; it triggers
    /// creation rather than failing the run.
    #[snafu(display("Dataset {project_id}.{dataset_id} not found"))]
    DatasetNotFound {
        project_id: String,
        dataset_id: String,
    },

    /// The service rejected the request (quota, permissions, creation
    /// conflict).
    #[snafu(display("BigQuery rejected the request ({code}): {message}"))]
    Rejected { code: i64, message: String },

    /// Transport or client-side failure below the API layer.
    #[snafu(display("BigQuery API call failed"))]
    Api {
        source: gcp_bigquery_client::error::BQError,
    },

    /// Could not construct an authenticated client.
    #[snafu(display("Failed to construct authenticated BigQuery client"))]
    Auth {
        source: gcp_bigquery_client::error::BQError,
    },
}

impl WarehouseError {
    /// Check if this error represents a "not found" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WarehouseError::DatasetNotFound { .. })
    }
}

// ============ Provision Errors ============

/// Errors that can occur while ensuring the destination dataset exists.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProvisionError {
    /// The existence check failed with something other than not-found.
    /// Masking this as absence would trigger a create against a dataset the
    /// caller may merely lack permission to see.
    #[snafu(display("Failed to look up dataset {dataset_id} in project {project_id}"))]
    Lookup {
        project_id: String,
        dataset_id: String,
        source: WarehouseError,
    },

    /// Creating the dataset failed after a not-found result. Fatal and not
    /// retryable; re-running the whole pipeline is the recovery path.
    #[snafu(display("Unable to create dataset {dataset_id} in project {project_id}"))]
    ProvisioningFailed {
        project_id: String,
        dataset_id: String,
        source: WarehouseError,
    },
}

// ============ Loader Errors ============

/// Errors surfaced by a record loader implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum LoaderError {
    /// The loader rejected a schema or record.
    #[snafu(display("Loader rejected input for stream {stream}: {message}"))]
    Load { stream: String, message: String },

    /// The loader failed to durably commit accepted records.
    #[snafu(display("Loader commit failed: {message}"))]
    Commit { message: String },
}

// ============ Target Error (top-level) ============

/// Top-level errors that aggregate all error types.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TargetError {
    /// Configuration error.
    #[snafu(display("Configuration error"))]
    Config { source: ConfigError },

    /// Client construction failed.
    #[snafu(display("Failed to connect to BigQuery"))]
    Connect { source: WarehouseError },

    /// Dataset provisioning failed.
    #[snafu(display("Dataset provisioning failed"))]
    Provision { source: ProvisionError },

    /// Checkpoint acknowledgement failed.
    #[snafu(display("Checkpoint error"))]
    Checkpoint { source: CheckpointError },

    /// The loader rejected input or failed to commit.
    #[snafu(display("Loader error"))]
    Loader { source: LoaderError },

    /// A line on standard input was not a valid message envelope.
    #[snafu(display("Malformed message on line {line}"))]
    MalformedMessage {
        line: usize,
        source: serde_json::Error,
    },

    /// Reading standard input failed.
    #[snafu(display("Failed to read input"))]
    ReadLine { source: std::io::Error },
}

impl From<ConfigError> for TargetError {
    fn from(source: ConfigError) -> Self {
        TargetError::Config { source }
    }
}

impl From<ProvisionError> for TargetError {
    fn from(source: ProvisionError) -> Self {
        TargetError::Provision { source }
    }
}

impl From<CheckpointError> for TargetError {
    fn from(source: CheckpointError) -> Self {
        TargetError::Checkpoint { source }
    }
}

impl From<LoaderError> for TargetError {
    fn from(source: LoaderError) -> Self {
        TargetError::Loader { source }
    }
}
