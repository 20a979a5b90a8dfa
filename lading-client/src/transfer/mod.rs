//! Job submission and tracking
//!
//! Transfers run as asynchronous jobs inside the warehouse. This module
//! submits them ([`JobSubmitter`]) and observes them until they reach a
//! terminal state ([`JobPoller`]). Both talk to the service through the
//! [`JobService`] trait so they can be exercised without a network.

mod poller;
mod submitter;

#[cfg(test)]
mod fake;

pub use poller::{JobPoller, PollOutcome};
pub use submitter::JobSubmitter;

use async_trait::async_trait;
use lading_core::domain::job::{Job, JobId};
use lading_core::domain::transfer::{SourceLocator, TransferRequest};
use lading_core::dto::job::JobResource;
use tracing::debug;

use crate::WarehouseClient;
use crate::error::{ClientError, Result};

/// Remote operations the job protocol relies on
#[async_trait]
pub trait JobService: Send + Sync {
    /// Create a job extracting a table into a storage object
    ///
    /// # Arguments
    /// * `job_id` - Identifier to create the job under
    /// * `request` - A validated export request
    async fn create_export_job(&self, job_id: &JobId, request: &TransferRequest) -> Result<Job>;

    /// Create a job loading a local file or storage object into a table
    async fn create_import_job(&self, job_id: &JobId, request: &TransferRequest) -> Result<Job>;

    /// Read one snapshot of a job
    ///
    /// Fails with [`ClientError::NotFound`] when the service has no record of it.
    async fn get_job_status(&self, job_id: &JobId) -> Result<Job>;
}

#[async_trait]
impl JobService for WarehouseClient {
    async fn create_export_job(&self, job_id: &JobId, request: &TransferRequest) -> Result<Job> {
        let body = JobResource::for_transfer(self.project_id(), job_id, request);
        let ack = self.insert_job(&body).await?;
        ack.into_job()
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }

    async fn create_import_job(&self, job_id: &JobId, request: &TransferRequest) -> Result<Job> {
        let body = JobResource::for_transfer(self.project_id(), job_id, request);

        let ack = match &request.source {
            SourceLocator::LocalFile(path) => {
                let data = tokio::fs::read(path).await.map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        ClientError::NotFound(format!("local file {}", path.display()))
                    } else {
                        ClientError::Submission(format!("cannot read {}: {}", path.display(), e))
                    }
                })?;
                debug!("Read {} byte(s) from {}", data.len(), path.display());
                self.insert_job_with_upload(&body, data).await?
            }
            SourceLocator::Object(object) => {
                if !self.object_exists(object).await? {
                    return Err(ClientError::NotFound(format!("storage object {}", object)));
                }
                self.insert_job(&body).await?
            }
            SourceLocator::Table(table) => {
                return Err(ClientError::Submission(format!(
                    "cannot import from table {}",
                    table
                )));
            }
        };

        ack.into_job()
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }

    async fn get_job_status(&self, job_id: &JobId) -> Result<Job> {
        self.fetch_job(job_id).await
    }
}
