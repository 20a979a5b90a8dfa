//! Object storage endpoints
//!
//! Only object metadata is needed: the warehouse reads and writes the object
//! contents itself, given a `gs://` locator.

use lading_core::domain::storage::{ObjectInfo, ObjectRef};
use lading_core::dto::object::ObjectResource;
use reqwest::{Method, Url};

use crate::WarehouseClient;
use crate::error::{ClientError, Result};

impl WarehouseClient {
    /// Fetch the metadata of a storage object
    ///
    /// Object names may contain `/`; they are percent-encoded as a single path segment.
    pub async fn get_object(&self, object: &ObjectRef) -> Result<ObjectInfo> {
        let mut url = Url::parse(&self.config.storage_url)
            .map_err(|e| ClientError::Config(format!("invalid storage_url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Config("storage_url cannot be a base URL".to_string()))?
            .extend(["b", object.bucket.as_str(), "o", object.name.as_str()]);

        let response = self.request(Method::GET, url.as_str()).send().await?;

        let resource: ObjectResource = self.handle_response(response).await?;
        Ok(resource.into())
    }

    /// Check whether a storage object exists
    pub async fn object_exists(&self, object: &ObjectRef) -> Result<bool> {
        match self.get_object(object).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
