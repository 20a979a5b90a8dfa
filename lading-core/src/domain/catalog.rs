//! Catalog domain types
//!
//! Datasets and tables as seen by the warehouse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fully qualified reference to a dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetRef {
    pub project_id: String,
    pub dataset_id: String,
}

impl DatasetRef {
    pub fn new(project_id: impl Into<String>, dataset_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset_id: dataset_id.into(),
        }
    }

    /// Reference a table inside this dataset
    pub fn table(&self, table_id: impl Into<String>) -> TableRef {
        TableRef {
            project_id: self.project_id.clone(),
            dataset_id: self.dataset_id.clone(),
            table_id: table_id.into(),
        }
    }
}

impl std::fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.project_id, self.dataset_id)
    }
}

/// Fully qualified reference to a table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

impl TableRef {
    pub fn new(
        project_id: impl Into<String>,
        dataset_id: impl Into<String>,
        table_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            dataset_id: dataset_id.into(),
            table_id: table_id.into(),
        }
    }

    /// The dataset containing this table
    pub fn dataset(&self) -> DatasetRef {
        DatasetRef::new(&self.project_id, &self.dataset_id)
    }

    /// Whether any of the three components is blank
    pub fn has_blank_component(&self) -> bool {
        [&self.project_id, &self.dataset_id, &self.table_id]
            .iter()
            .any(|s| s.trim().is_empty())
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}.{}", self.project_id, self.dataset_id, self.table_id)
    }
}

/// A dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub reference: DatasetRef,
    pub friendly_name: Option<String>,
    pub location: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub reference: TableRef,
    pub schema: Vec<FieldSchema>,
    /// Only populated when the table was fetched individually
    pub num_bytes: Option<u64>,
    pub num_rows: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A single column of a table schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    /// Column type, upper-cased (`STRING`, `INTEGER`, ...)
    pub field_type: String,
    pub mode: Option<String>,
}

/// Error returned when a schema string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaParseError(pub String);

impl std::fmt::Display for SchemaParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid schema: {}", self.0)
    }
}

impl std::error::Error for SchemaParseError {}

/// Parse a compact schema description such as `Name:string, Age:integer`
///
/// Fields without a type default to `STRING`. Types are upper-cased.
pub fn parse_schema(input: &str) -> Result<Vec<FieldSchema>, SchemaParseError> {
    let mut fields = Vec::new();

    for raw in input.split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SchemaParseError(format!("empty field in `{}`", input)));
        }

        let (name, field_type) = match raw.split_once(':') {
            Some((name, ty)) => (name.trim(), ty.trim()),
            None => (raw, "STRING"),
        };

        if name.is_empty() {
            return Err(SchemaParseError(format!("missing field name in `{}`", raw)));
        }
        if field_type.is_empty() {
            return Err(SchemaParseError(format!("missing type for field `{}`", name)));
        }
        if fields.iter().any(|f: &FieldSchema| f.name == name) {
            return Err(SchemaParseError(format!("duplicate field `{}`", name)));
        }

        fields.push(FieldSchema {
            name: name.to_string(),
            field_type: field_type.to_uppercase(),
            mode: None,
        });
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_ref_display() {
        let table = TableRef::new("proj", "github_samples", "natality");
        assert_eq!(table.to_string(), "proj:github_samples.natality");
        assert_eq!(table.dataset().to_string(), "proj:github_samples");
    }

    #[test]
    fn test_dataset_table_builder() {
        let dataset = DatasetRef::new("proj", "my_dataset");
        assert_eq!(dataset.table("my_table"), TableRef::new("proj", "my_dataset", "my_table"));
    }

    #[test]
    fn test_blank_component_detection() {
        assert!(TableRef::new("proj", "", "t").has_blank_component());
        assert!(TableRef::new("proj", "d", "  ").has_blank_component());
        assert!(!TableRef::new("proj", "d", "t").has_blank_component());
    }

    #[test]
    fn test_parse_schema() {
        let fields = parse_schema("Name:string, Age:integer, Weight").unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name, "Name");
        assert_eq!(fields[0].field_type, "STRING");
        assert_eq!(fields[1].field_type, "INTEGER");
        assert_eq!(fields[2].field_type, "STRING");
    }

    #[test]
    fn test_parse_schema_rejects_bad_input() {
        assert!(parse_schema("").is_err());
        assert!(parse_schema("a:string,,b").is_err());
        assert!(parse_schema(":integer").is_err());
        assert!(parse_schema("a:").is_err());
        assert!(parse_schema("a:string,a:integer").is_err());
    }
}
