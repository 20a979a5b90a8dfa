//! Dataset API endpoints

use lading_core::domain::catalog::{Dataset, DatasetRef};
use lading_core::dto::dataset::{DatasetList, DatasetResource};
use reqwest::Method;
use tracing::debug;

use crate::WarehouseClient;
use crate::error::Result;

impl WarehouseClient {
    // =============================================================================
    // Dataset Management
    // =============================================================================

    /// Create a new, empty dataset
    ///
    /// # Arguments
    /// * `dataset` - Reference of the dataset to create
    ///
    /// # Returns
    /// The created dataset as reported by the service
    pub async fn create_dataset(&self, dataset: &DatasetRef) -> Result<Dataset> {
        let url = format!(
            "{}/projects/{}/datasets",
            self.config.warehouse_url, dataset.project_id
        );
        let body = DatasetResource::create(dataset, None);
        let response = self.request(Method::POST, &url).json(&body).send().await?;

        let created: DatasetResource = self.handle_response(response).await?;
        Ok(created.into())
    }

    /// Get a dataset by reference
    pub async fn get_dataset(&self, dataset: &DatasetRef) -> Result<Dataset> {
        let url = format!(
            "{}/projects/{}/datasets/{}",
            self.config.warehouse_url, dataset.project_id, dataset.dataset_id
        );
        let response = self.request(Method::GET, &url).send().await?;

        let resource: DatasetResource = self.handle_response(response).await?;
        Ok(resource.into())
    }

    /// List all datasets of a project
    ///
    /// Follows page tokens until the listing is exhausted.
    pub async fn list_datasets(&self, project_id: &str) -> Result<Vec<Dataset>> {
        let url = format!("{}/projects/{}/datasets", self.config.warehouse_url, project_id);
        let mut datasets = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.request(Method::GET, &url);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: DatasetList = self.handle_response(request.send().await?).await?;
            debug!("Fetched {} dataset(s) from {}", page.datasets.len(), project_id);
            datasets.extend(page.datasets.into_iter().map(Dataset::from));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(datasets)
    }

    /// Delete a dataset
    ///
    /// # Arguments
    /// * `dataset` - The dataset to delete
    /// * `delete_contents` - Also delete the tables it contains; without it the
    ///   service refuses to delete a non-empty dataset
    pub async fn delete_dataset(&self, dataset: &DatasetRef, delete_contents: bool) -> Result<()> {
        let url = format!(
            "{}/projects/{}/datasets/{}",
            self.config.warehouse_url, dataset.project_id, dataset.dataset_id
        );
        let mut request = self.request(Method::DELETE, &url);
        if delete_contents {
            request = request.query(&[("deleteContents", "true")]);
        }

        self.handle_empty_response(request.send().await?).await
    }

    /// Total logical size of a dataset in bytes
    ///
    /// Listing does not report sizes, so every table is fetched individually.
    pub async fn dataset_size(&self, dataset: &DatasetRef) -> Result<u64> {
        let tables = self.list_tables(dataset).await?;
        let mut total = 0u64;

        for table in tables {
            let table = self.get_table(&table.reference).await?;
            total += table.num_bytes.unwrap_or(0);
        }

        Ok(total)
    }
}
