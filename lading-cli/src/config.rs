//! Configuration module
//!
//! Handles CLI configuration: project scope, service endpoints, credentials
//! and the bounds used when waiting on jobs.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use lading_client::config::{
    DEFAULT_RESOURCE_URL, DEFAULT_STORAGE_URL, DEFAULT_UPLOAD_URL, DEFAULT_WAREHOUSE_URL,
};
use lading_client::{ClientConfig, WaitPolicy, WarehouseClient};
use lading_core::domain::catalog::{DatasetRef, TableRef};

/// Service endpoints and credentials
#[derive(Debug, Clone, Args)]
pub struct EndpointArgs {
    /// Warehouse REST base URL
    #[arg(long, env = "LADING_WAREHOUSE_URL", default_value = DEFAULT_WAREHOUSE_URL, hide_default_value = true)]
    pub warehouse_url: String,

    /// Warehouse upload base URL
    #[arg(long, env = "LADING_UPLOAD_URL", default_value = DEFAULT_UPLOAD_URL, hide_default_value = true)]
    pub upload_url: String,

    /// Object storage base URL
    #[arg(long, env = "LADING_STORAGE_URL", default_value = DEFAULT_STORAGE_URL, hide_default_value = true)]
    pub storage_url: String,

    /// Resource manager base URL
    #[arg(long, env = "LADING_RESOURCE_URL", default_value = DEFAULT_RESOURCE_URL, hide_default_value = true)]
    pub resource_url: String,

    /// OAuth bearer token sent with every request
    #[arg(long, env = "LADING_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

/// Bounds for commands that wait on a job
#[derive(Debug, Clone, Copy, Args)]
pub struct WaitArgs {
    /// Seconds between two status checks
    #[arg(long, env = "LADING_POLL_INTERVAL", default_value_t = 5)]
    pub interval: u64,

    /// Maximum number of status checks before giving up
    #[arg(long, env = "LADING_MAX_ATTEMPTS", default_value_t = 60)]
    pub max_attempts: u32,
}

impl WaitArgs {
    pub fn policy(&self) -> WaitPolicy {
        WaitPolicy::new(Duration::from_secs(self.interval), self.max_attempts)
    }
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Project jobs run in and catalog commands operate on
    pub project_id: String,

    pub endpoints: EndpointArgs,
}

impl Config {
    pub fn new(project_id: String, endpoints: EndpointArgs) -> Self {
        Self {
            project_id,
            endpoints,
        }
    }

    /// Client settings for this invocation
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(self.project_id.clone());
        config.warehouse_url = self.endpoints.warehouse_url.clone();
        config.upload_url = self.endpoints.upload_url.clone();
        config.storage_url = self.endpoints.storage_url.clone();
        config.resource_url = self.endpoints.resource_url.clone();
        config.access_token = self.endpoints.access_token.clone();
        config
    }

    pub fn client(&self) -> Result<Arc<WarehouseClient>> {
        let client = WarehouseClient::new(self.client_config())
            .context("Failed to configure warehouse client")?;
        Ok(Arc::new(client))
    }

    pub fn dataset(&self, dataset_id: &str) -> DatasetRef {
        DatasetRef::new(self.project_id.clone(), dataset_id)
    }

    pub fn table(&self, dataset_id: &str, table_id: &str) -> TableRef {
        TableRef::new(self.project_id.clone(), dataset_id, table_id)
    }
}
