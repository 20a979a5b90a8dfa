//! Resource manager project DTOs

use serde::{Deserialize, Serialize};

use crate::domain::project::Project;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResource {
    pub project_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub project_number: Option<String>,
    #[serde(default)]
    pub lifecycle_state: Option<String>,
}

impl From<ProjectResource> for Project {
    fn from(res: ProjectResource) -> Self {
        Project {
            id: res.project_id,
            name: res.name,
            number: res.project_number,
            state: res.lifecycle_state,
        }
    }
}

/// One page of `projects.list`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectList {
    #[serde(default)]
    pub projects: Vec<ProjectResource>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}
