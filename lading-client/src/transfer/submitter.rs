//! Job submitter
//!
//! Turns a [`TransferRequest`] into exactly one remote job.

use lading_core::domain::job::{Job, JobId, JobKind, JobStatus};
use lading_core::domain::transfer::TransferRequest;
use std::sync::Arc;
use tracing::{debug, info};

use super::JobService;
use crate::error::{ClientError, Result};

/// Submits transfer jobs
pub struct JobSubmitter {
    service: Arc<dyn JobService>,
}

impl JobSubmitter {
    pub fn new(service: Arc<dyn JobService>) -> Self {
        Self { service }
    }

    /// Validate and submit a transfer
    ///
    /// The returned job is always `Pending` or `Running`: an acknowledgement
    /// that is already `DONE` is reported as `Running`, so that completion is
    /// only ever observed through [`super::JobPoller`].
    ///
    /// # Errors
    /// - [`ClientError::Submission`] if the request is malformed, the service
    ///   rejects it, or the acknowledgement already carries an error
    /// - [`ClientError::NotFound`] if the import source does not exist
    /// - [`ClientError::Transport`] if the service cannot be reached
    pub async fn submit(&self, request: &TransferRequest) -> Result<Job> {
        let kind = request
            .validate()
            .map_err(|e| ClientError::Submission(e.to_string()))?;
        let job_id = JobId::generate();

        info!(
            "Submitting {} job {}: {} -> {}",
            kind, job_id, request.source, request.destination
        );

        let ack = match kind {
            JobKind::Export => self.service.create_export_job(&job_id, request).await,
            JobKind::Import => self.service.create_import_job(&job_id, request).await,
        }
        .map_err(ClientError::into_submission)?;

        let job = acknowledge(job_id, kind, ack)?;
        info!("Submitted job {} ({})", job.id, job.status);

        Ok(job)
    }
}

/// Normalize the service's acknowledgement into a non-terminal job
fn acknowledge(job_id: JobId, kind: JobKind, ack: Job) -> Result<Job> {
    if ack.id.is_empty() {
        return Err(ClientError::ParseError(
            "job acknowledgement carries no job ID".to_string(),
        ));
    }
    if ack.id != job_id {
        debug!("Service renamed job {} to {}", job_id, ack.id);
    }

    let status = match ack.status {
        JobStatus::Error => {
            let message = ack
                .error
                .map(|failure| failure.to_string())
                .unwrap_or_else(|| "job rejected at submission".to_string());
            return Err(ClientError::Submission(message));
        }
        JobStatus::Done => {
            debug!("Job {} finished before it was acknowledged", ack.id);
            JobStatus::Running
        }
        other => other,
    };

    Ok(Job {
        id: ack.id,
        kind: Some(kind),
        status,
        metadata: None,
        error: None,
    })
}
