//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::TableRef;

/// Opaque identifier of a remote job
///
/// Identifiers generated by this crate look like `job_<32 hex chars>`, but any
/// non-empty string handed out by the service is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Prefix of client-generated job identifiers
    pub const PREFIX: &'static str = "job_";

    /// Generate a fresh, unique job identifier
    pub fn generate() -> Self {
        Self(format!("{}{}", Self::PREFIX, Uuid::new_v4().simple()))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Kind of data movement a job performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobKind {
    /// Load a local file or storage object into a table
    Import,
    /// Extract a table into a storage object
    Export,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobKind::Import => write!(f, "IMPORT"),
            JobKind::Export => write!(f, "EXPORT"),
        }
    }
}

/// Job execution status
///
/// Status only moves forward: `Pending -> Running -> {Done, Error}`.
/// Both terminal states are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Pending,
    Running,
    Done,
    Error,
}

impl JobStatus {
    /// Whether no further transitions can happen
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }

    fn rank(self) -> u8 {
        match self {
            JobStatus::Pending => 0,
            JobStatus::Running => 1,
            JobStatus::Done | JobStatus::Error => 2,
        }
    }

    /// Check whether moving from `self` to `next` respects the job lifecycle
    ///
    /// Staying in the same state is always allowed.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        if self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        next.rank() > self.rank()
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "PENDING"),
            JobStatus::Running => write!(f, "RUNNING"),
            JobStatus::Done => write!(f, "DONE"),
            JobStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result metadata of a job that finished successfully
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobMetadata {
    pub created_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Storage URIs written by an export
    pub destination_uris: Vec<String>,
    /// Files written per destination URI, in the same order
    pub destination_file_counts: Vec<u64>,
    /// Table written by an import
    pub destination_table: Option<TableRef>,
    pub input_files: Option<u64>,
    pub output_rows: Option<u64>,
    pub output_bytes: Option<u64>,
}

impl JobMetadata {
    /// Wall-clock time between start and end, when both are known
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => Some(end.signed_duration_since(start)),
            _ => None,
        }
    }
}

/// Failure reported by the service for a job in [`JobStatus::Error`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFailure {
    /// Short machine-readable reason (e.g. `invalid`, `notFound`)
    pub reason: Option<String>,
    /// Human-readable message, passed through verbatim
    pub message: String,
    pub location: Option<String>,
    /// Additional error messages reported alongside the main one
    pub details: Vec<String>,
}

impl std::fmt::Display for JobFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{} ({})", self.message, reason),
            None => f.write_str(&self.message),
        }
    }
}

/// Point-in-time view of a remote job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    /// `None` for jobs not created as a transfer (queries, copies, ...)
    pub kind: Option<JobKind>,
    pub status: JobStatus,
    /// Present only when `status` is [`JobStatus::Done`]
    pub metadata: Option<JobMetadata>,
    /// Present only when `status` is [`JobStatus::Error`]
    pub error: Option<JobFailure>,
}

impl Job {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
