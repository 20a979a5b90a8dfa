//! Error types for the Lading client

use lading_core::domain::job::{JobFailure, JobId};
use serde::Deserialize;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the warehouse, storage or resource APIs
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request was malformed or rejected synchronously by the service
    #[error("Submission rejected: {0}")]
    Submission(String),

    /// Job, dataset, table or object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The service could not be reached, refused our credentials or is overloaded
    #[error("Transport error: {message}")]
    Transport {
        /// HTTP status code, when a response was received at all
        status: Option<u16>,
        message: String,
    },

    /// The job reached its terminal error state
    #[error("Job {job_id} failed: {failure}")]
    RemoteJob { job_id: JobId, failure: JobFailure },

    /// A wait loop ran out of attempts before the job finished
    #[error("Job {job_id} did not finish after {attempts} poll(s)")]
    Timeout { job_id: JobId, attempts: u32 },

    /// API returned an error status code not covered by the other variants
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => Self::NotFound(message),
            401 | 403 | 408 | 429 | 500..=599 => Self::Transport {
                status: Some(status),
                message,
            },
            _ => Self::ApiError { status, message },
        }
    }

    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if (400..500).contains(status))
    }

    /// Reclassify a 4xx rejection of a job insert as a submission error
    pub(crate) fn into_submission(self) -> Self {
        match self {
            Self::ApiError { status, message } if (400..500).contains(&status) => {
                Self::Submission(message)
            }
            other => other,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Error envelope used by the Google-style JSON APIs
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Pull the service's own message out of an error body, or keep the body as-is
pub(crate) fn extract_error_message(body: &str) -> String {
    if body.trim().is_empty() {
        return "Unknown error".to_string();
    }
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(ClientError::from_status(404, "gone").is_not_found());
        assert!(ClientError::from_status(503, "busy").is_retryable());
        assert!(ClientError::from_status(401, "who?").is_retryable());
        assert!(ClientError::from_status(429, "slow down").is_retryable());
        assert!(ClientError::from_status(400, "bad").is_client_error());
        assert!(!ClientError::from_status(400, "bad").is_retryable());
    }

    #[test]
    fn test_not_found_is_never_retryable() {
        let err = ClientError::from_status(404, "Not found: Job p:job_12345ABCDE");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_into_submission() {
        let err = ClientError::api_error(400, "Invalid destination format").into_submission();
        assert!(matches!(err, ClientError::Submission(ref m) if m == "Invalid destination format"));

        let err = ClientError::from_status(500, "boom").into_submission();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error": {"code": 404, "message": "Not found: Job p:job_1", "status": "NOT_FOUND"}}"#;
        assert_eq!(extract_error_message(body), "Not found: Job p:job_1");
        assert_eq!(extract_error_message("plain text"), "plain text");
        assert_eq!(extract_error_message(""), "Unknown error");
    }

    #[test]
    fn test_remote_job_message_is_verbatim() {
        let err = ClientError::RemoteJob {
            job_id: JobId::new("job_1"),
            failure: JobFailure {
                reason: None,
                message: "Access Denied: BigQuery BigQuery: Permission denied".to_string(),
                location: None,
                details: vec![],
            },
        };
        assert_eq!(
            err.to_string(),
            "Job job_1 failed: Access Denied: BigQuery BigQuery: Permission denied"
        );
    }
}
