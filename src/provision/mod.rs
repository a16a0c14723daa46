//! Idempotent dataset provisioning.
//!
//! Ensures the destination dataset exists before any data flows, creating it
//! on first use. Multiple pipeline runs may race here; the service's atomic
//! create is the only synchronization point, and a lost race surfaces
//! through the creation-failure branch rather than a crash.

use snafu::prelude::*;
use tracing::{error, info};

use crate::error::{LookupSnafu, ProvisionError, ProvisioningFailedSnafu};
use crate::warehouse::{DatasetHandle, DatasetRef, Warehouse};

/// Ensure the dataset exists, creating it if absent.
///
/// The common path is a single existence check and zero creation calls.
/// A fetch failure other than not-found propagates untouched rather than
/// being treated as absence.
///
/// Creation failures are fatal and non-retryable. Every one of them,
/// including a lost race with a concurrent creator, lands in
/// [`ProvisionError::ProvisioningFailed`] with the dataset identifiers
/// attached.
pub async fn ensure_dataset<W: Warehouse + ?Sized>(
    warehouse: &W,
    dataset: &DatasetRef,
) -> Result<DatasetHandle, ProvisionError> {
    match warehouse.get_dataset(dataset).await {
        Ok(handle) => {
            info!(dataset = %dataset, "Dataset exists");
            Ok(handle)
        }
        Err(e) if e.is_not_found() => {
            info!(dataset = %dataset, location = ?dataset.location, "Dataset not found, creating");
            match warehouse.create_dataset(dataset).await {
                Ok(handle) => {
                    info!(dataset = %dataset, "Created dataset");
                    Ok(handle)
                }
                Err(cause) => {
                    error!(
                        project_id = %dataset.project_id,
                        dataset_id = %dataset.dataset_id,
                        error = %cause,
                        "Unable to create dataset"
                    );
                    Err(cause).context(ProvisioningFailedSnafu {
                        project_id: dataset.project_id.as_str(),
                        dataset_id: dataset.dataset_id.as_str(),
                    })
                }
            }
        }
        Err(e) => Err(e).context(LookupSnafu {
            project_id: dataset.project_id.as_str(),
            dataset_id: dataset.dataset_id.as_str(),
        }),
    }
}
