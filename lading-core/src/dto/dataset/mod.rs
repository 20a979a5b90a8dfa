//! Dataset DTOs

use serde::{Deserialize, Serialize};

use super::parse_millis;
use crate::domain::catalog::{Dataset, DatasetRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetReference {
    pub project_id: String,
    pub dataset_id: String,
}

impl From<&DatasetRef> for DatasetReference {
    fn from(dataset: &DatasetRef) -> Self {
        Self {
            project_id: dataset.project_id.clone(),
            dataset_id: dataset.dataset_id.clone(),
        }
    }
}

impl From<DatasetReference> for DatasetRef {
    fn from(dataset: DatasetReference) -> Self {
        DatasetRef::new(dataset.project_id, dataset.dataset_id)
    }
}

/// A dataset resource, as returned by `datasets.insert`/`datasets.get`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetResource {
    pub dataset_reference: DatasetReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
}

impl DatasetResource {
    /// Minimal body for creating a dataset
    pub fn create(dataset: &DatasetRef, location: Option<String>) -> Self {
        Self {
            dataset_reference: DatasetReference::from(dataset),
            friendly_name: None,
            location,
            creation_time: None,
        }
    }
}

impl From<DatasetResource> for Dataset {
    fn from(res: DatasetResource) -> Self {
        Dataset {
            reference: res.dataset_reference.into(),
            friendly_name: res.friendly_name,
            location: res.location,
            created_at: parse_millis(res.creation_time.as_deref()),
        }
    }
}

/// One page of `datasets.list`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetList {
    #[serde(default)]
    pub datasets: Vec<DatasetListItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetListItem {
    pub dataset_reference: DatasetReference,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl From<DatasetListItem> for Dataset {
    fn from(item: DatasetListItem) -> Self {
        Dataset {
            reference: item.dataset_reference.into(),
            friendly_name: item.friendly_name,
            location: item.location,
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset_list_page() {
        // The service omits `datasets` entirely when a project has none
        let page: DatasetList = serde_json::from_str(r#"{"kind": "bigquery#datasetList"}"#).unwrap();
        assert!(page.datasets.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_create_body() {
        let body = DatasetResource::create(&DatasetRef::new("p", "my_dataset"), None);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["datasetReference"]["datasetId"], "my_dataset");
        assert!(json.get("location").is_none());
    }
}
