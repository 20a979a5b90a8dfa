//! Client configuration
//!
//! Endpoints, project scope and polling bounds are injected explicitly at
//! construction time. Nothing here reads process-wide state.

use std::time::Duration;

use crate::error::{ClientError, Result};

pub const DEFAULT_WAREHOUSE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";
pub const DEFAULT_UPLOAD_URL: &str = "https://bigquery.googleapis.com/upload/bigquery/v2";
pub const DEFAULT_STORAGE_URL: &str = "https://storage.googleapis.com/storage/v1";
pub const DEFAULT_RESOURCE_URL: &str = "https://cloudresourcemanager.googleapis.com/v1";

/// Connection settings for the remote services
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Project jobs run in and catalog operations default to
    pub project_id: String,

    /// Warehouse REST base URL
    pub warehouse_url: String,

    /// Warehouse media upload base URL (local file imports)
    pub upload_url: String,

    /// Object storage JSON API base URL
    pub storage_url: String,

    /// Resource manager base URL (project listing)
    pub resource_url: String,

    /// Pre-obtained OAuth bearer token, sent as-is
    pub access_token: Option<String>,
}

impl ClientConfig {
    /// Creates a configuration pointing at the public endpoints
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            warehouse_url: DEFAULT_WAREHOUSE_URL.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            storage_url: DEFAULT_STORAGE_URL.to_string(),
            resource_url: DEFAULT_RESOURCE_URL.to_string(),
            access_token: None,
        }
    }

    /// Point every service at one root URL, keeping the public path layout
    ///
    /// Useful for emulators and test servers.
    pub fn with_root_url(mut self, root: &str) -> Self {
        let root = root.trim_end_matches('/');
        self.warehouse_url = format!("{}/bigquery/v2", root);
        self.upload_url = format!("{}/upload/bigquery/v2", root);
        self.storage_url = format!("{}/storage/v1", root);
        self.resource_url = format!("{}/v1", root);
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(ClientError::Config("project_id cannot be empty".to_string()));
        }

        for (name, url) in [
            ("warehouse_url", &self.warehouse_url),
            ("upload_url", &self.upload_url),
            ("storage_url", &self.storage_url),
            ("resource_url", &self.resource_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ClientError::Config(format!(
                    "{} must start with http:// or https://",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// Bounds for waiting on a job to reach a terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Delay between two status reads
    pub interval: Duration,

    /// Maximum number of status reads, failed ones included
    pub max_attempts: u32,

    /// Maximum consecutive transport failures tolerated before giving up
    pub max_transport_retries: u32,
}

impl WaitPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
            ..Self::default()
        }
    }

    pub fn with_transport_retries(mut self, retries: u32) -> Self {
        self.max_transport_retries = retries;
        self
    }

    /// Validates the policy
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(ClientError::Config("max_attempts must be greater than 0".to_string()));
        }
        Ok(())
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 60,
            max_transport_retries: 3,
        }
    }
}
