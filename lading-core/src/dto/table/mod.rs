//! Table DTOs

use serde::{Deserialize, Serialize};

use super::{parse_millis, parse_u64};
use crate::domain::catalog::{FieldSchema, Table, TableRef};

/// Wire form of [`TableRef`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReference {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

impl From<&TableRef> for TableReference {
    fn from(table: &TableRef) -> Self {
        Self {
            project_id: table.project_id.clone(),
            dataset_id: table.dataset_id.clone(),
            table_id: table.table_id.clone(),
        }
    }
}

impl From<TableReference> for TableRef {
    fn from(table: TableReference) -> Self {
        TableRef::new(table.project_id, table.dataset_id, table.table_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub fields: Vec<TableFieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl From<&FieldSchema> for TableFieldSchema {
    fn from(field: &FieldSchema) -> Self {
        Self {
            name: field.name.clone(),
            field_type: field.field_type.clone(),
            mode: field.mode.clone(),
        }
    }
}

impl From<TableFieldSchema> for FieldSchema {
    fn from(field: TableFieldSchema) -> Self {
        Self {
            name: field.name,
            field_type: field.field_type,
            mode: field.mode,
        }
    }
}

/// A table resource, as returned by `tables.get` and accepted by `tables.insert`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResource {
    pub table_reference: TableReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<TableSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_bytes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_rows: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
}

/// Request body for creating a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    pub table: TableRef,
    pub schema: Vec<FieldSchema>,
}

impl From<&CreateTable> for TableResource {
    fn from(req: &CreateTable) -> Self {
        Self {
            table_reference: TableReference::from(&req.table),
            schema: if req.schema.is_empty() {
                None
            } else {
                Some(TableSchema {
                    fields: req.schema.iter().map(TableFieldSchema::from).collect(),
                })
            },
            num_bytes: None,
            num_rows: None,
            creation_time: None,
        }
    }
}

impl From<TableResource> for Table {
    fn from(res: TableResource) -> Self {
        Table {
            reference: res.table_reference.into(),
            schema: res
                .schema
                .map(|s| s.fields.into_iter().map(FieldSchema::from).collect())
                .unwrap_or_default(),
            num_bytes: parse_u64(res.num_bytes.as_deref()),
            num_rows: parse_u64(res.num_rows.as_deref()),
            created_at: parse_millis(res.creation_time.as_deref()),
        }
    }
}

/// One page of `tables.list`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableList {
    #[serde(default)]
    pub tables: Vec<TableListItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableListItem {
    pub table_reference: TableReference,
    #[serde(default)]
    pub creation_time: Option<String>,
}

impl From<TableListItem> for Table {
    fn from(item: TableListItem) -> Self {
        Table {
            reference: item.table_reference.into(),
            schema: Vec::new(),
            num_bytes: None,
            num_rows: None,
            created_at: parse_millis(item.creation_time.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_resource_to_domain() {
        let res: TableResource = serde_json::from_value(serde_json::json!({
            "tableReference": {"projectId": "p", "datasetId": "d", "tableId": "t"},
            "schema": {"fields": [{"name": "Name", "type": "STRING", "mode": "REQUIRED"}]},
            "numBytes": "1000000",
            "numRows": "42"
        }))
        .unwrap();

        let table = Table::from(res);
        assert_eq!(table.reference, TableRef::new("p", "d", "t"));
        assert_eq!(table.num_bytes, Some(1_000_000));
        assert_eq!(table.num_rows, Some(42));
        assert_eq!(table.schema[0].mode.as_deref(), Some("REQUIRED"));
    }

    #[test]
    fn test_create_table_without_schema_omits_field() {
        let req = CreateTable {
            table: TableRef::new("p", "d", "t"),
            schema: vec![],
        };
        let body = serde_json::to_value(TableResource::from(&req)).unwrap();
        assert!(body.get("schema").is_none());
        assert_eq!(body["tableReference"]["tableId"], "t");
    }
}
