//! BigQuery-backed warehouse implementation.

use async_trait::async_trait;
use gcp_bigquery_client::Client;
use gcp_bigquery_client::error::BQError;
use gcp_bigquery_client::model::dataset::Dataset;
use snafu::prelude::*;
use tracing::debug;

use crate::config::TargetConfig;
use crate::error::{AuthSnafu, WarehouseError};

use super::{DatasetHandle, DatasetRef, Warehouse};

/// Warehouse backed by the BigQuery REST API.
pub struct BigQueryWarehouse {
    client: Client,
}

impl BigQueryWarehouse {
    /// Construct an authenticated client.
    ///
    /// Exactly one credential path is attempted: the inline service account
    /// key when configured, otherwise application-default credentials.
    /// There is no fallback from one to the other.
    pub async fn connect(target: &TargetConfig) -> Result<Self, WarehouseError> {
        let client = match &target.service_credentials {
            Some(key) => {
                debug!("Constructing BigQuery client from inline service account key");
                Client::from_service_account_key(key.clone(), false)
                    .await
                    .context(AuthSnafu)?
            }
            None => {
                debug!("Constructing BigQuery client from application-default credentials");
                Client::from_application_default_credentials()
                    .await
                    .context(AuthSnafu)?
            }
        };

        Ok(Self { client })
    }
}

#[async_trait]
impl Warehouse for BigQueryWarehouse {
    async fn get_dataset(&self, dataset: &DatasetRef) -> Result<DatasetHandle, WarehouseError> {
        match self
            .client
            .dataset()
            .get(&dataset.project_id, &dataset.dataset_id)
            .await
        {
            Ok(found) => Ok(DatasetHandle {
                project_id: dataset.project_id.clone(),
                dataset_id: dataset.dataset_id.clone(),
                location: found.location.or_else(|| dataset.location.clone()),
            }),
            Err(e) => Err(classify(dataset, e)),
        }
    }

    async fn create_dataset(&self, dataset: &DatasetRef) -> Result<DatasetHandle, WarehouseError> {
        let mut request = Dataset::new(dataset.project_id.as_str(), dataset.dataset_id.as_str());
        if let Some(location) = &dataset.location {
            request = request.location(location.as_str());
        }

        self.client
            .dataset()
            .create(request)
            .await
            .map_err(|e| classify(dataset, e))?;

        Ok(DatasetHandle::from_ref(dataset))
    }
}

/// Map a client library error onto the warehouse error taxonomy.
///
/// A 404 on the dataset resource is the distinguished not-found signal.
/// Every other structured response becomes [`WarehouseError::Rejected`]
/// with the service's code and message; transport-level failures are
/// wrapped as [`WarehouseError::Api`].
fn classify(dataset: &DatasetRef, error: BQError) -> WarehouseError {
    match error {
        BQError::ResponseError { error } if error.error.code == 404 => {
            WarehouseError::DatasetNotFound {
                project_id: dataset.project_id.clone(),
                dataset_id: dataset.dataset_id.clone(),
            }
        }
        BQError::ResponseError { error } => WarehouseError::Rejected {
            code: error.error.code,
            message: error.error.message,
        },
        other => WarehouseError::Api { source: other },
    }
}
