//! Job DTOs
//!
//! The warehouse only knows three job states (`PENDING`, `RUNNING`, `DONE`).
//! A `DONE` job that carries an `errorResult` is what the domain calls
//! [`JobStatus::Error`].

use serde::{Deserialize, Serialize};

use super::table::TableReference;
use super::{ConversionError, parse_millis, parse_u64};
use crate::domain::job::{Job, JobFailure, JobId, JobKind, JobMetadata, JobStatus};
use crate::domain::transfer::{DestinationLocator, SourceLocator, TransferRequest};

/// A job resource, as sent to `jobs.insert` and returned by `jobs.get`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResource {
    pub job_reference: JobReference,
    #[serde(default)]
    pub configuration: JobConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatusResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<JobStatistics>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    pub project_id: String,
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<ExtractConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractConfiguration {
    pub source_table: TableReference,
    pub destination_uris: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadConfiguration {
    pub destination_table: TableReference,
    /// Empty when the data is uploaded together with the job
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_uris: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResource {
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_result: Option<ErrorProto>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorProto>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorProto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatistics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<ExtractStatistics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadStatistics>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractStatistics {
    #[serde(default)]
    pub destination_uri_file_counts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStatistics {
    #[serde(default)]
    pub input_files: Option<String>,
    #[serde(default)]
    pub output_rows: Option<String>,
    #[serde(default)]
    pub output_bytes: Option<String>,
}

impl JobResource {
    /// Build the `jobs.insert` body for a validated transfer
    ///
    /// `project_id` is the project the job is billed to and runs in.
    pub fn for_transfer(project_id: &str, job_id: &JobId, request: &TransferRequest) -> Self {
        let mut configuration = JobConfiguration::default();

        match (&request.source, &request.destination) {
            (SourceLocator::Table(table), DestinationLocator::Object(object)) => {
                configuration.extract = Some(ExtractConfiguration {
                    source_table: TableReference::from(table),
                    destination_uris: vec![object.uri()],
                    destination_format: Some(request.format.wire_name().to_string()),
                    compression: Some(request.compression.wire_name().to_string()),
                });
            }
            (source, DestinationLocator::Table(table)) => {
                let source_uris = match source {
                    SourceLocator::Object(object) => vec![object.uri()],
                    _ => Vec::new(),
                };
                configuration.load = Some(LoadConfiguration {
                    destination_table: TableReference::from(table),
                    source_uris,
                    source_format: Some(request.format.wire_name().to_string()),
                });
            }
            // Rejected by `TransferRequest::validate`
            _ => {}
        }

        Self {
            job_reference: JobReference {
                project_id: project_id.to_string(),
                job_id: job_id.as_str().to_string(),
                location: None,
            },
            configuration,
            status: None,
            statistics: None,
        }
    }

    /// The domain kind of this job, if it is a transfer
    pub fn kind(&self) -> Option<JobKind> {
        if self.configuration.extract.is_some() {
            Some(JobKind::Export)
        } else if self.configuration.load.is_some() {
            Some(JobKind::Import)
        } else {
            None
        }
    }

    /// Map the wire state onto [`JobStatus`]
    pub fn job_status(&self) -> Result<JobStatus, ConversionError> {
        let Some(status) = &self.status else {
            // Freshly inserted jobs may come back without a status block
            return Ok(JobStatus::Pending);
        };

        match status.state.as_str() {
            "PENDING" => Ok(JobStatus::Pending),
            "RUNNING" => Ok(JobStatus::Running),
            "DONE" if status.error_result.is_some() => Ok(JobStatus::Error),
            "DONE" => Ok(JobStatus::Done),
            other => Err(ConversionError(format!(
                "unknown state `{}` for job {}",
                other, self.job_reference.job_id
            ))),
        }
    }

    /// Convert into a domain [`Job`] snapshot
    pub fn into_job(self) -> Result<Job, ConversionError> {
        let status = self.job_status()?;
        let kind = self.kind();
        let id = JobId::new(self.job_reference.job_id.clone());

        let error = match status {
            JobStatus::Error => self.status.as_ref().map(failure_from_status),
            _ => None,
        };
        let metadata = match status {
            JobStatus::Done => Some(self.metadata()),
            _ => None,
        };

        Ok(Job {
            id,
            kind,
            status,
            metadata,
            error,
        })
    }

    fn metadata(&self) -> JobMetadata {
        let stats = self.statistics.clone().unwrap_or_default();
        let mut metadata = JobMetadata {
            created_at: parse_millis(stats.creation_time.as_deref()),
            started_at: parse_millis(stats.start_time.as_deref()),
            ended_at: parse_millis(stats.end_time.as_deref()),
            ..Default::default()
        };

        if let Some(extract) = &self.configuration.extract {
            metadata.destination_uris = extract.destination_uris.clone();
        }
        if let Some(extract) = &stats.extract {
            metadata.destination_file_counts = extract
                .destination_uri_file_counts
                .iter()
                .filter_map(|count| count.parse().ok())
                .collect();
        }

        if let Some(load) = &self.configuration.load {
            metadata.destination_table = Some(load.destination_table.clone().into());
        }
        if let Some(load) = &stats.load {
            metadata.input_files = parse_u64(load.input_files.as_deref());
            metadata.output_rows = parse_u64(load.output_rows.as_deref());
            metadata.output_bytes = parse_u64(load.output_bytes.as_deref());
        }

        metadata
    }
}

fn failure_from_status(status: &JobStatusResource) -> JobFailure {
    let main = status.error_result.clone().unwrap_or_default();
    let details = status
        .errors
        .iter()
        .filter(|e| **e != main)
        .filter_map(|e| e.message.clone())
        .collect();

    JobFailure {
        reason: main.reason,
        message: main
            .message
            .unwrap_or_else(|| "job failed without an error message".to_string()),
        location: main.location,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::TableRef;
    use crate::domain::storage::ObjectRef;
    use crate::domain::transfer::{Compression, DataFormat};

    fn resource(json: serde_json::Value) -> JobResource {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_export_body() {
        let job_id = JobId::new("job_abc");
        let request = TransferRequest::export(
            TableRef::new("proj", "github_samples", "natality"),
            ObjectRef::new("sample-bigquery-export", "data.json"),
        )
        .with_format(DataFormat::Json)
        .with_compression(Compression::Gzip);

        let body = serde_json::to_value(JobResource::for_transfer("proj", &job_id, &request)).unwrap();

        assert_eq!(body["jobReference"]["jobId"], "job_abc");
        let extract = &body["configuration"]["extract"];
        assert_eq!(extract["sourceTable"]["tableId"], "natality");
        assert_eq!(extract["destinationUris"][0], "gs://sample-bigquery-export/data.json");
        assert_eq!(extract["destinationFormat"], "NEWLINE_DELIMITED_JSON");
        assert_eq!(extract["compression"], "GZIP");
        assert!(body["configuration"].get("load").is_none());
        assert!(body.get("status").is_none());
    }

    #[test]
    fn test_local_import_body_has_no_source_uris() {
        let request = TransferRequest::import(
            SourceLocator::for_import("./data.csv", None),
            TableRef::new("proj", "my_dataset", "my_table"),
        );
        let body =
            serde_json::to_value(JobResource::for_transfer("proj", &JobId::new("job_1"), &request))
                .unwrap();

        let load = &body["configuration"]["load"];
        assert_eq!(load["destinationTable"]["datasetId"], "my_dataset");
        assert_eq!(load["sourceFormat"], "CSV");
        assert!(load.get("sourceUris").is_none());
    }

    #[test]
    fn test_storage_import_body_has_source_uri() {
        let request = TransferRequest::import(
            SourceLocator::for_import("data.csv", Some("my-bucket")),
            TableRef::new("proj", "my_dataset", "my_table"),
        );
        let body =
            serde_json::to_value(JobResource::for_transfer("proj", &JobId::new("job_1"), &request))
                .unwrap();
        assert_eq!(body["configuration"]["load"]["sourceUris"][0], "gs://my-bucket/data.csv");
    }

    #[test]
    fn test_running_job_has_no_metadata() {
        let job = resource(serde_json::json!({
            "jobReference": {"projectId": "p", "jobId": "job_1"},
            "configuration": {"extract": {
                "sourceTable": {"projectId": "p", "datasetId": "d", "tableId": "t"},
                "destinationUris": ["gs://b/o"]
            }},
            "status": {"state": "RUNNING"}
        }))
        .into_job()
        .unwrap();

        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.kind, Some(JobKind::Export));
        assert!(job.metadata.is_none());
        assert!(job.error.is_none());
    }

    #[test]
    fn test_done_export_metadata() {
        let job = resource(serde_json::json!({
            "jobReference": {"projectId": "p", "jobId": "job_1"},
            "configuration": {"extract": {
                "sourceTable": {"projectId": "p", "datasetId": "d", "tableId": "t"},
                "destinationUris": ["gs://sample-bigquery-export/data.json"]
            }},
            "status": {"state": "DONE"},
            "statistics": {
                "creationTime": "1469566455000",
                "startTime": "1469566456000",
                "endTime": "1469566460000",
                "extract": {"destinationUriFileCounts": ["1"]}
            }
        }))
        .into_job()
        .unwrap();

        assert_eq!(job.status, JobStatus::Done);
        let metadata = job.metadata.unwrap();
        assert_eq!(metadata.destination_uris, vec!["gs://sample-bigquery-export/data.json"]);
        assert_eq!(metadata.destination_file_counts, vec![1]);
        assert_eq!(metadata.duration().unwrap().num_seconds(), 4);
    }

    #[test]
    fn test_done_with_error_result_is_error() {
        let job = resource(serde_json::json!({
            "jobReference": {"projectId": "p", "jobId": "job_1"},
            "configuration": {"load": {
                "destinationTable": {"projectId": "p", "datasetId": "d", "tableId": "t"}
            }},
            "status": {
                "state": "DONE",
                "errorResult": {"reason": "invalid", "message": "Too many errors encountered."},
                "errors": [
                    {"reason": "invalid", "message": "Too many errors encountered."},
                    {"reason": "invalid", "location": "file-00000000", "message": "Could not parse 'abc' as INT64"}
                ]
            }
        }))
        .into_job()
        .unwrap();

        assert_eq!(job.status, JobStatus::Error);
        assert!(job.metadata.is_none());
        let failure = job.error.unwrap();
        assert_eq!(failure.message, "Too many errors encountered.");
        assert_eq!(failure.reason.as_deref(), Some("invalid"));
        assert_eq!(failure.details, vec!["Could not parse 'abc' as INT64"]);
    }

    #[test]
    fn test_missing_status_is_pending() {
        let job = resource(serde_json::json!({
            "jobReference": {"projectId": "p", "jobId": "job_1"}
        }))
        .into_job()
        .unwrap();
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.kind, None);
    }

    #[test]
    fn test_unknown_state_rejected() {
        let res = resource(serde_json::json!({
            "jobReference": {"projectId": "p", "jobId": "job_1"},
            "status": {"state": "PAUSED"}
        }));
        assert!(res.into_job().is_err());
    }
}
