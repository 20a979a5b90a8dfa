//! Job poller
//!
//! Observes a remote job through point-in-time status reads. A single
//! [`JobPoller::check`] never blocks; [`JobPoller::wait`] repeats checks on a
//! fixed interval until the job is terminal or the [`WaitPolicy`] runs out.

use lading_core::domain::job::{Job, JobFailure, JobId, JobStatus};
use std::sync::Arc;
use tokio::time;
use tracing::{debug, info, warn};

use super::JobService;
use crate::config::WaitPolicy;
use crate::error::{ClientError, Result};

/// Classification of a single job snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The job is pending or running
    InProgress(Job),
    /// The job finished; metadata is attached
    Done(Job),
    /// The job reached its terminal error state
    Failed(Job),
}

impl PollOutcome {
    fn classify(job: Job) -> Self {
        match job.status {
            JobStatus::Pending | JobStatus::Running => PollOutcome::InProgress(job),
            JobStatus::Done => PollOutcome::Done(job),
            JobStatus::Error => PollOutcome::Failed(job),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollOutcome::InProgress(_))
    }

    pub fn job(&self) -> &Job {
        match self {
            PollOutcome::InProgress(job) | PollOutcome::Done(job) | PollOutcome::Failed(job) => job,
        }
    }

    /// Turn a terminal error state into [`ClientError::RemoteJob`]
    ///
    /// In-progress and done snapshots are returned unchanged.
    pub fn into_result(self) -> Result<Job> {
        match self {
            PollOutcome::Failed(job) => Err(remote_failure(job)),
            PollOutcome::InProgress(job) | PollOutcome::Done(job) => Ok(job),
        }
    }
}

fn remote_failure(job: Job) -> ClientError {
    let failure = job.error.unwrap_or_else(|| JobFailure {
        reason: None,
        message: "job failed without an error message".to_string(),
        location: None,
        details: vec![],
    });
    ClientError::RemoteJob {
        job_id: job.id,
        failure,
    }
}

/// A blank ID can never name a job, so it is unknown without asking the service
fn ensure_named(job_id: &JobId) -> Result<()> {
    if job_id.is_empty() {
        return Err(ClientError::NotFound("job with a blank ID".to_string()));
    }
    Ok(())
}

/// Keeps the most advanced snapshot seen so far
///
/// The service never moves a job backwards; a snapshot that would is treated
/// as stale and dropped.
struct Tracker {
    latest: Option<Job>,
}

impl Tracker {
    fn new() -> Self {
        Self { latest: None }
    }

    fn observe(&mut self, job: Job) -> Job {
        if let Some(prev) = &self.latest
            && !prev.status.can_transition_to(job.status)
        {
            warn!(
                "Ignoring stale snapshot of job {}: {} after {}",
                job.id, job.status, prev.status
            );
            return prev.clone();
        }
        self.latest = Some(job.clone());
        job
    }
}

/// Reads job status snapshots
pub struct JobPoller {
    service: Arc<dyn JobService>,
}

impl JobPoller {
    pub fn new(service: Arc<dyn JobService>) -> Self {
        Self { service }
    }

    /// Fetch one snapshot and classify it
    ///
    /// A job that is still pending or running is a successful, non-terminal
    /// outcome. Only failures to read the status are errors.
    pub async fn check(&self, job_id: &JobId) -> Result<PollOutcome> {
        ensure_named(job_id)?;
        let job = self.service.get_job_status(job_id).await?;
        debug!("Job {} status: {}", job_id, job.status);
        Ok(PollOutcome::classify(job))
    }

    /// Poll until the job is terminal
    ///
    /// # Returns
    /// The finished job, with its result metadata
    ///
    /// # Errors
    /// - [`ClientError::RemoteJob`] if the job ends in error (not retried)
    /// - [`ClientError::NotFound`] if the service has no record of the job (not retried)
    /// - [`ClientError::Transport`] after more than `max_transport_retries`
    ///   consecutive transport failures
    /// - [`ClientError::Timeout`] if `max_attempts` reads did not see a terminal state
    pub async fn wait(&self, job_id: &JobId, policy: &WaitPolicy) -> Result<Job> {
        policy.validate()?;
        ensure_named(job_id)?;

        info!(
            "Waiting for job {} (interval: {:?}, max attempts: {})",
            job_id, policy.interval, policy.max_attempts
        );

        let mut tracker = Tracker::new();
        let mut consecutive_failures = 0u32;

        for attempt in 1..=policy.max_attempts {
            if attempt > 1 {
                time::sleep(policy.interval).await;
            }

            let job = match self.service.get_job_status(job_id).await {
                Ok(job) => {
                    consecutive_failures = 0;
                    job
                }
                Err(e) if e.is_retryable() => {
                    consecutive_failures += 1;
                    if consecutive_failures > policy.max_transport_retries {
                        warn!(
                            "Giving up on job {} after {} consecutive transport failure(s)",
                            job_id, consecutive_failures
                        );
                        return Err(e);
                    }
                    warn!(
                        "Failed to read job {} (attempt {}/{}): {}",
                        job_id, attempt, policy.max_attempts, e
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };

            let current = tracker.observe(job);
            debug!(
                "Job {} status: {} (attempt {}/{})",
                job_id, current.status, attempt, policy.max_attempts
            );

            match PollOutcome::classify(current) {
                PollOutcome::InProgress(_) => continue,
                PollOutcome::Done(job) => {
                    info!("Job {} completed after {} poll(s)", job_id, attempt);
                    return Ok(job);
                }
                PollOutcome::Failed(job) => {
                    info!("Job {} failed after {} poll(s)", job_id, attempt);
                    return Err(remote_failure(job));
                }
            }
        }

        Err(ClientError::Timeout {
            job_id: job_id.clone(),
            attempts: policy.max_attempts,
        })
    }
}
