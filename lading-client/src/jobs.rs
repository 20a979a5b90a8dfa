//! Job-related API endpoints

use lading_core::domain::job::{Job, JobId};
use lading_core::dto::job::JobResource;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Url};
use tracing::debug;
use uuid::Uuid;

use crate::WarehouseClient;
use crate::error::{ClientError, Result};

impl WarehouseClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Insert a job whose inputs already live in the warehouse or in storage
    ///
    /// # Arguments
    /// * `body` - The job resource, with a client-chosen job ID
    ///
    /// # Returns
    /// The service's acknowledgement of the job
    pub async fn insert_job(&self, body: &JobResource) -> Result<JobResource> {
        let url = format!(
            "{}/projects/{}/jobs",
            self.config.warehouse_url, body.job_reference.project_id
        );
        let response = self.request(Method::POST, &url).json(body).send().await?;

        self.handle_response(response).await
    }

    /// Insert a load job together with the data it loads
    ///
    /// The job resource and the file contents are sent as one
    /// `multipart/related` upload.
    pub async fn insert_job_with_upload(&self, body: &JobResource, data: Vec<u8>) -> Result<JobResource> {
        let url = format!(
            "{}/projects/{}/jobs",
            self.config.upload_url, body.job_reference.project_id
        );
        let metadata = serde_json::to_vec(body)
            .map_err(|e| ClientError::Submission(format!("cannot encode job: {}", e)))?;
        let boundary = format!("lading_{}", Uuid::new_v4().simple());

        debug!(
            "Uploading {} byte(s) with job {}",
            data.len(),
            body.job_reference.job_id
        );

        let response = self
            .request(Method::POST, &url)
            .query(&[("uploadType", "multipart")])
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(multipart_related(&metadata, &data, &boundary))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Read the current snapshot of a job
    ///
    /// # Arguments
    /// * `job_id` - The job identifier
    ///
    /// # Returns
    /// The job, with metadata when done or the failure when errored
    ///
    /// # Errors
    /// [`ClientError::NotFound`] for a blank ID, without contacting the service
    pub async fn fetch_job(&self, job_id: &JobId) -> Result<Job> {
        if job_id.is_empty() {
            return Err(ClientError::NotFound("job with a blank ID".to_string()));
        }

        let url = self.job_url(job_id)?;
        let response = self.request(Method::GET, url.as_str()).send().await?;

        let resource: JobResource = self.handle_response(response).await?;
        resource
            .into_job()
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }

    /// `{warehouse}/projects/{project}/jobs/{job_id}`, the ID encoded as one path segment
    fn job_url(&self, job_id: &JobId) -> Result<Url> {
        let mut url = Url::parse(&self.config.warehouse_url)
            .map_err(|e| ClientError::Config(format!("invalid warehouse_url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Config("warehouse_url cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend([
                "projects",
                self.config.project_id.as_str(),
                "jobs",
                job_id.as_str(),
            ]);
        Ok(url)
    }
}

/// Assemble a two-part `multipart/related` body: JSON metadata, then raw data
fn multipart_related(metadata: &[u8], data: &[u8], boundary: &str) -> Vec<u8> {
    let mut body = Vec::with_capacity(metadata.len() + data.len() + 4 * boundary.len() + 128);

    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata);
    body.extend_from_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;

    #[test]
    fn test_job_url_encodes_id_as_one_segment() {
        let client =
            WarehouseClient::new(ClientConfig::new("proj").with_root_url("http://localhost:9050"))
                .unwrap();

        let url = client.job_url(&JobId::new("job_a#b/c?d")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9050/bigquery/v2/projects/proj/jobs/job_a%23b%2Fc%3Fd"
        );
        assert!(url.fragment().is_none());
        assert!(url.query().is_none());
    }

    #[test]
    fn test_multipart_related_layout() {
        let body = multipart_related(br#"{"a":1}"#, b"x,y\n1,2\n", "XYZ");
        let text = String::from_utf8(body).unwrap();

        assert_eq!(
            text,
            "--XYZ\r\n\
             Content-Type: application/json; charset=UTF-8\r\n\r\n\
             {\"a\":1}\r\n\
             --XYZ\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             x,y\n1,2\n\r\n\
             --XYZ--\r\n"
        );
    }
}
