//! Storage object DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::parse_u64;
use crate::domain::storage::{ObjectInfo, ObjectRef};

/// Object metadata returned by the storage JSON API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectResource {
    pub bucket: String,
    pub name: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    /// RFC 3339 timestamp
    #[serde(default)]
    pub updated: Option<String>,
}

impl From<ObjectResource> for ObjectInfo {
    fn from(res: ObjectResource) -> Self {
        ObjectInfo {
            size: parse_u64(res.size.as_deref()),
            content_type: res.content_type,
            updated_at: res
                .updated
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            reference: ObjectRef::new(res.bucket, res.name),
        }
    }
}
