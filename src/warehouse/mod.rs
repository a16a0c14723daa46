//! Warehouse control-plane abstraction.
//!
//! Defines the `Warehouse` trait consumed by provisioning, along with the
//! dataset reference and handle types shared across the crate. The
//! production implementation backed by the BigQuery client lives in
//! [`bigquery`].

pub mod bigquery;

pub use bigquery::BigQueryWarehouse;

use async_trait::async_trait;

use crate::error::WarehouseError;

/// Identifies a destination dataset by project, id, and location.
///
/// Immutable; built from configuration at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    pub project_id: String,
    pub dataset_id: String,
    /// Dataset location. `None` defers to the provider default.
    pub location: Option<String>,
}

impl DatasetRef {
    pub fn new(project_id: impl Into<String>, dataset_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset_id: dataset_id.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl std::fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.project_id, self.dataset_id)
    }
}

/// A dataset confirmed to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetHandle {
    pub project_id: String,
    pub dataset_id: String,
    pub location: Option<String>,
}

impl DatasetHandle {
    /// Handle for a dataset known only through its reference.
    pub(crate) fn from_ref(dataset: &DatasetRef) -> Self {
        Self {
            project_id: dataset.project_id.clone(),
            dataset_id: dataset.dataset_id.clone(),
            location: dataset.location.clone(),
        }
    }
}

/// Control-plane operations needed to provision a destination dataset.
///
/// The data plane (batch loads, streaming inserts) is intentionally absent;
/// only existence checks and creation are consumed here.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Fetch an existing dataset.
    ///
    /// Absence is reported as [`WarehouseError::DatasetNotFound`], distinct
    /// from every other failure.
    async fn get_dataset(&self, dataset: &DatasetRef) -> Result<DatasetHandle, WarehouseError>;

    /// Create the dataset.
    ///
    /// Callers should treat a failure here as fatal: the service enforces
    /// creation atomicity, so a lost race with a concurrent creator also
    /// lands here, as a conflict rejection.
    async fn create_dataset(&self, dataset: &DatasetRef) -> Result<DatasetHandle, WarehouseError>;
}
