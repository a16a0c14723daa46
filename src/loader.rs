//! Record loading seam.
//!
//! Batch accumulation and upload into warehouse tables happen behind the
//! [`RecordLoader`] trait. The driver guarantees ordering only: every record
//! and schema reaches the loader before the state checkpoint that follows
//! them is acknowledged.

use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;

use crate::error::LoaderError;

/// Consumer for record and schema messages.
#[async_trait]
pub trait RecordLoader: Send {
    /// Register or update the schema for a stream.
    async fn apply_schema(&mut self, stream: &str, schema: Value) -> Result<(), LoaderError>;

    /// Accept a record for a stream. Implementations buffer and upload at
    /// their own cadence.
    async fn load(&mut self, stream: &str, record: Value) -> Result<(), LoaderError>;

    /// Durably commit everything accepted so far.
    async fn commit(&mut self) -> Result<(), LoaderError>;
}

/// Loader that counts and discards.
///
/// Used when no real loader is wired in; the process then acts purely as a
/// provisioning and checkpoint relay.
#[derive(Debug, Default)]
pub struct NullLoader {
    pub records: u64,
    pub schemas: u64,
}

#[async_trait]
impl RecordLoader for NullLoader {
    async fn apply_schema(&mut self, stream: &str, _schema: Value) -> Result<(), LoaderError> {
        self.schemas += 1;
        trace!(stream, "Discarding schema");
        Ok(())
    }

    async fn load(&mut self, stream: &str, _record: Value) -> Result<(), LoaderError> {
        self.records += 1;
        trace!(stream, "Discarding record");
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), LoaderError> {
        Ok(())
    }
}
