//! Lading HTTP Client
//!
//! A small, type-safe client for the warehouse REST API and the object storage
//! and resource manager APIs it works with, plus the job submission and
//! polling protocol built on top of them.
//!
//! # Example
//!
//! ```no_run
//! use lading_client::{ClientConfig, JobPoller, JobSubmitter, WaitPolicy, WarehouseClient};
//! use lading_core::domain::catalog::TableRef;
//! use lading_core::domain::storage::ObjectRef;
//! use lading_core::domain::transfer::{DataFormat, TransferRequest};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Arc::new(WarehouseClient::new(ClientConfig::new("my-project"))?);
//!
//!     let request = TransferRequest::export(
//!         TableRef::new("my-project", "github_samples", "natality"),
//!         ObjectRef::new("sample-bigquery-export", "data.json"),
//!     )
//!     .with_format(DataFormat::Json);
//!
//!     let job = JobSubmitter::new(client.clone()).submit(&request).await?;
//!     let done = JobPoller::new(client).wait(&job.id, &WaitPolicy::default()).await?;
//!
//!     println!("Exported to {:?}", done.metadata.map(|m| m.destination_uris));
//!     Ok(())
//! }
//! ```

pub mod config;
mod datasets;
pub mod error;
mod jobs;
mod projects;
mod storage;
mod tables;
pub mod transfer;

// Re-export commonly used types
pub use config::{ClientConfig, WaitPolicy};
pub use error::{ClientError, Result};
pub use transfer::{JobPoller, JobService, JobSubmitter, PollOutcome};

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::extract_error_message;

/// HTTP client for the warehouse and its companion services
///
/// Methods are organized into logical groups:
/// - Dataset management (create, list, get, delete)
/// - Table management (create, list, get, delete)
/// - Job insertion and status reads
/// - Storage object metadata
/// - Project listing
#[derive(Debug, Clone)]
pub struct WarehouseClient {
    config: ClientConfig,
    /// HTTP client instance
    client: Client,
}

impl WarehouseClient {
    /// Create a new client from a validated configuration
    ///
    /// # Example
    /// ```
    /// use lading_client::{ClientConfig, WarehouseClient};
    ///
    /// let client = WarehouseClient::new(ClientConfig::new("my-project")).unwrap();
    /// assert_eq!(client.project_id(), "my-project");
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_client(config, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use lading_client::{ClientConfig, WarehouseClient};
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = WarehouseClient::with_client(ClientConfig::new("my-project"), http_client);
    /// assert!(client.is_ok());
    /// ```
    pub fn with_client(mut config: ClientConfig, client: Client) -> Result<Self> {
        config.validate()?;
        for url in [
            &mut config.warehouse_url,
            &mut config.upload_url,
            &mut config.storage_url,
            &mut config.resource_url,
        ] {
            *url = url.trim_end_matches('/').to_string();
        }
        Ok(Self { config, client })
    }

    /// Project jobs are created in
    pub fn project_id(&self) -> &str {
        &self.config.project_id
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start a request, attaching the bearer token when one is configured
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.config.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(
                status.as_u16(),
                extract_error_message(&body),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content (e.g., DELETE operations)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(
                status.as_u16(),
                extract_error_message(&body),
            ));
        }

        Ok(())
    }
}
