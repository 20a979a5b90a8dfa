//! Table API endpoints

use lading_core::domain::catalog::{DatasetRef, Table, TableRef};
use lading_core::dto::table::{CreateTable, TableList, TableResource};
use reqwest::Method;
use tracing::debug;

use crate::WarehouseClient;
use crate::error::Result;

impl WarehouseClient {
    // =============================================================================
    // Table Management
    // =============================================================================

    /// Create a new table, optionally with a schema
    ///
    /// # Arguments
    /// * `req` - The table creation request
    ///
    /// # Returns
    /// The created table
    pub async fn create_table(&self, req: &CreateTable) -> Result<Table> {
        let url = format!(
            "{}/projects/{}/datasets/{}/tables",
            self.config.warehouse_url, req.table.project_id, req.table.dataset_id
        );
        let body = TableResource::from(req);
        let response = self.request(Method::POST, &url).json(&body).send().await?;

        let created: TableResource = self.handle_response(response).await?;
        Ok(created.into())
    }

    /// Get a table, including its schema and size
    pub async fn get_table(&self, table: &TableRef) -> Result<Table> {
        let url = format!(
            "{}/projects/{}/datasets/{}/tables/{}",
            self.config.warehouse_url, table.project_id, table.dataset_id, table.table_id
        );
        let response = self.request(Method::GET, &url).send().await?;

        let resource: TableResource = self.handle_response(response).await?;
        Ok(resource.into())
    }

    /// List all tables in a dataset
    ///
    /// Listed tables carry no schema or size; use [`WarehouseClient::get_table`]
    /// for those.
    pub async fn list_tables(&self, dataset: &DatasetRef) -> Result<Vec<Table>> {
        let url = format!(
            "{}/projects/{}/datasets/{}/tables",
            self.config.warehouse_url, dataset.project_id, dataset.dataset_id
        );
        let mut tables = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.request(Method::GET, &url);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: TableList = self.handle_response(request.send().await?).await?;
            debug!("Fetched {} table(s) from {}", page.tables.len(), dataset);
            tables.extend(page.tables.into_iter().map(Table::from));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(tables)
    }

    /// Delete a table
    pub async fn delete_table(&self, table: &TableRef) -> Result<()> {
        let url = format!(
            "{}/projects/{}/datasets/{}/tables/{}",
            self.config.warehouse_url, table.project_id, table.dataset_id, table.table_id
        );
        let response = self.request(Method::DELETE, &url).send().await?;

        self.handle_empty_response(response).await
    }
}
