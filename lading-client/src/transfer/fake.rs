//! In-memory [`JobService`] used by the submitter and poller tests

use async_trait::async_trait;
use lading_core::domain::job::{Job, JobFailure, JobId, JobKind, JobMetadata, JobStatus};
use lading_core::domain::transfer::{DestinationLocator, TransferRequest};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use super::JobService;
use crate::error::{ClientError, Result};

/// What the fake service answers on the next status read of a job
pub(crate) enum Step {
    /// The job moved to this status
    Status(JobStatus),
    /// The job failed with this message
    Fail(&'static str),
    /// The status read itself failed
    Error(ClientError),
}

struct FakeJob {
    kind: Option<JobKind>,
    status: JobStatus,
    failure: Option<JobFailure>,
    destination: Option<String>,
    script: VecDeque<Step>,
    reads: usize,
}

#[derive(Default)]
struct State {
    jobs: HashMap<JobId, FakeJob>,
    created: Vec<(JobId, JobKind)>,
    submission_error: Option<ClientError>,
}

#[derive(Default)]
pub(crate) struct FakeJobService {
    state: Mutex<State>,
}

impl FakeJobService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job the service already knows, with the answers to its next status reads
    ///
    /// Once the script runs out the job keeps its last status.
    pub fn insert(&self, job_id: &str, kind: JobKind, script: Vec<Step>) {
        let mut state = self.state.lock().unwrap();
        state.jobs.insert(
            JobId::new(job_id),
            FakeJob {
                kind: Some(kind),
                status: JobStatus::Pending,
                failure: None,
                destination: None,
                script: script.into(),
                reads: 0,
            },
        );
    }

    pub fn reject_next_submission(&self, error: ClientError) {
        self.state.lock().unwrap().submission_error = Some(error);
    }

    pub fn created(&self) -> Vec<(JobId, JobKind)> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn reads(&self, job_id: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .jobs
            .get(&JobId::new(job_id))
            .map(|job| job.reads)
            .unwrap_or(0)
    }

    fn create(&self, job_id: &JobId, kind: JobKind, request: &TransferRequest) -> Result<Job> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.submission_error.take() {
            return Err(error);
        }

        let destination = match &request.destination {
            DestinationLocator::Object(object) => Some(object.uri()),
            DestinationLocator::Table(_) => None,
        };
        state.created.push((job_id.clone(), kind));
        state.jobs.insert(
            job_id.clone(),
            FakeJob {
                kind: Some(kind),
                status: JobStatus::Pending,
                failure: None,
                destination,
                script: VecDeque::new(),
                reads: 0,
            },
        );

        Ok(snapshot(job_id, &state.jobs[job_id]))
    }
}

fn snapshot(job_id: &JobId, job: &FakeJob) -> Job {
    let metadata = (job.status == JobStatus::Done).then(|| JobMetadata {
        destination_uris: job.destination.iter().cloned().collect(),
        ..Default::default()
    });

    Job {
        id: job_id.clone(),
        kind: job.kind,
        status: job.status,
        metadata,
        error: job.failure.clone(),
    }
}

#[async_trait]
impl JobService for FakeJobService {
    async fn create_export_job(&self, job_id: &JobId, request: &TransferRequest) -> Result<Job> {
        self.create(job_id, JobKind::Export, request)
    }

    async fn create_import_job(&self, job_id: &JobId, request: &TransferRequest) -> Result<Job> {
        self.create(job_id, JobKind::Import, request)
    }

    async fn get_job_status(&self, job_id: &JobId) -> Result<Job> {
        let mut state = self.state.lock().unwrap();
        let Some(job) = state.jobs.get_mut(job_id) else {
            return Err(ClientError::NotFound(format!("Job proj:{}", job_id)));
        };

        job.reads += 1;
        match job.script.pop_front() {
            Some(Step::Status(status)) => job.status = status,
            Some(Step::Fail(message)) => {
                job.status = JobStatus::Error;
                job.failure = Some(JobFailure {
                    reason: Some("invalid".to_string()),
                    message: message.to_string(),
                    location: None,
                    details: vec![],
                });
            }
            Some(Step::Error(error)) => return Err(error),
            None => {}
        }

        Ok(snapshot(job_id, job))
    }
}
