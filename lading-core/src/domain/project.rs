//! Project domain model

use serde::{Deserialize, Serialize};

/// A cloud project visible to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: Option<String>,
    pub number: Option<String>,
    /// Lifecycle state as reported by the resource manager (e.g. `ACTIVE`)
    pub state: Option<String>,
}
