//! Object storage domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// URI scheme used by the warehouse to address storage objects
pub const STORAGE_SCHEME: &str = "gs://";

/// Reference to an object inside a storage bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub bucket: String,
    pub name: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
        }
    }

    /// Render as a `gs://bucket/object` URI
    pub fn uri(&self) -> String {
        format!("{}{}/{}", STORAGE_SCHEME, self.bucket, self.name)
    }

    /// Parse a `gs://bucket/object` URI
    ///
    /// Returns `None` if the scheme is missing or either part is empty.
    pub fn parse_uri(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix(STORAGE_SCHEME)?;
        let (bucket, name) = rest.split_once('/')?;
        if bucket.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(bucket, name))
    }

    pub fn has_blank_component(&self) -> bool {
        self.bucket.trim().is_empty() || self.name.trim().is_empty()
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri())
    }
}

/// Metadata of an existing storage object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub reference: ObjectRef,
    pub size: Option<u64>,
    pub content_type: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
