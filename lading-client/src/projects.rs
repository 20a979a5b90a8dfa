//! Resource manager endpoints

use lading_core::domain::project::Project;
use lading_core::dto::project::ProjectList;
use reqwest::Method;

use crate::WarehouseClient;
use crate::error::Result;

impl WarehouseClient {
    /// List every project the caller can see
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let url = format!("{}/projects", self.config.resource_url);
        let mut projects = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.request(Method::GET, &url);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: ProjectList = self.handle_response(request.send().await?).await?;
            projects.extend(page.projects.into_iter().map(Project::from));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(projects)
    }
}
