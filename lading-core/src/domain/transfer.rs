//! Transfer request types
//!
//! A [`TransferRequest`] describes one data movement between a table and a
//! file or storage object. It is validated before anything is sent to the
//! warehouse.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::catalog::TableRef;
use crate::domain::job::JobKind;
use crate::domain::storage::ObjectRef;

/// File format of exported or imported data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataFormat {
    #[default]
    Csv,
    Json,
    Avro,
}

impl DataFormat {
    /// Name of the format as understood by the warehouse API
    pub fn wire_name(self) -> &'static str {
        match self {
            DataFormat::Csv => "CSV",
            DataFormat::Json => "NEWLINE_DELIMITED_JSON",
            DataFormat::Avro => "AVRO",
        }
    }

    /// Guess the format from a file extension, ignoring case
    ///
    /// Returns `None` for missing or unrecognised extensions.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(DataFormat::Csv),
            "json" | "ndjson" | "jsonl" => Some(DataFormat::Json),
            "avro" => Some(DataFormat::Avro),
            _ => None,
        }
    }
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataFormat::Csv => write!(f, "CSV"),
            DataFormat::Json => write!(f, "JSON"),
            DataFormat::Avro => write!(f, "AVRO"),
        }
    }
}

impl FromStr for DataFormat {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CSV" => Ok(DataFormat::Csv),
            "JSON" | "NEWLINE_DELIMITED_JSON" => Ok(DataFormat::Json),
            "AVRO" => Ok(DataFormat::Avro),
            other => Err(RequestError::new(format!(
                "unsupported format `{}` (expected one of CSV, JSON, AVRO)",
                other
            ))),
        }
    }
}

/// Compression applied to exported files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Compression {
    #[default]
    None,
    Gzip,
}

impl Compression {
    pub fn from_gzip_flag(gzip: bool) -> Self {
        if gzip { Compression::Gzip } else { Compression::None }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            Compression::None => "NONE",
            Compression::Gzip => "GZIP",
        }
    }
}

/// Where the data of a transfer comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceLocator {
    /// A file on the local filesystem, uploaded with the job
    LocalFile(PathBuf),
    /// An object already in storage
    Object(ObjectRef),
    /// A warehouse table
    Table(TableRef),
}

impl SourceLocator {
    /// Resolve an import source from a file argument and an optional bucket
    ///
    /// Without a bucket the file is taken as a local path, verbatim.
    pub fn for_import(file: &str, bucket: Option<&str>) -> Self {
        match bucket {
            Some(bucket) => SourceLocator::Object(ObjectRef::new(bucket, file)),
            None => SourceLocator::LocalFile(PathBuf::from(file)),
        }
    }
}

impl std::fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceLocator::LocalFile(path) => write!(f, "{}", path.display()),
            SourceLocator::Object(obj) => write!(f, "{}", obj),
            SourceLocator::Table(table) => write!(f, "{}", table),
        }
    }
}

/// Where the data of a transfer goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestinationLocator {
    Table(TableRef),
    Object(ObjectRef),
}

impl std::fmt::Display for DestinationLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DestinationLocator::Table(table) => write!(f, "{}", table),
            DestinationLocator::Object(obj) => write!(f, "{}", obj),
        }
    }
}

/// A single data movement between a table and a file or storage object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub source: SourceLocator,
    pub destination: DestinationLocator,
    pub format: DataFormat,
    pub compression: Compression,
}

impl TransferRequest {
    /// Export a table into a storage object
    pub fn export(table: TableRef, object: ObjectRef) -> Self {
        Self {
            source: SourceLocator::Table(table),
            destination: DestinationLocator::Object(object),
            format: DataFormat::default(),
            compression: Compression::default(),
        }
    }

    /// Import a local file or storage object into a table
    pub fn import(source: SourceLocator, table: TableRef) -> Self {
        Self {
            source,
            destination: DestinationLocator::Table(table),
            format: DataFormat::default(),
            compression: Compression::default(),
        }
    }

    pub fn with_format(mut self, format: DataFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Check the request is complete and consistent
    ///
    /// Returns the kind of job the request will create.
    pub fn validate(&self) -> Result<JobKind, RequestError> {
        let kind = match (&self.source, &self.destination) {
            (SourceLocator::Table(_), DestinationLocator::Object(_)) => JobKind::Export,
            (SourceLocator::LocalFile(_), DestinationLocator::Table(_))
            | (SourceLocator::Object(_), DestinationLocator::Table(_)) => JobKind::Import,
            (source, destination) => {
                return Err(RequestError::new(format!(
                    "cannot transfer from {} to {}",
                    source, destination
                )));
            }
        };

        match &self.source {
            SourceLocator::LocalFile(path) if path.as_os_str().is_empty() => {
                return Err(RequestError::new("source file path is empty"));
            }
            SourceLocator::Object(obj) if obj.has_blank_component() => {
                return Err(RequestError::new("source bucket and object name are required"));
            }
            SourceLocator::Table(table) if table.has_blank_component() => {
                return Err(RequestError::new("source project, dataset and table are required"));
            }
            _ => {}
        }

        match &self.destination {
            DestinationLocator::Object(obj) if obj.has_blank_component() => {
                return Err(RequestError::new(
                    "destination bucket and object name are required",
                ));
            }
            DestinationLocator::Table(table) if table.has_blank_component() => {
                return Err(RequestError::new(
                    "destination project, dataset and table are required",
                ));
            }
            _ => {}
        }

        if self.compression == Compression::Gzip {
            if kind == JobKind::Import {
                return Err(RequestError::new("compression only applies to exports"));
            }
            if self.format == DataFormat::Avro {
                return Err(RequestError::new("GZIP compression is not supported for AVRO"));
            }
        }

        Ok(kind)
    }
}

/// A transfer request that is malformed or internally inconsistent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError(String);

impl RequestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for RequestError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DataFormat::from_path(Path::new("data.json")), Some(DataFormat::Json));
        assert_eq!(DataFormat::from_path(Path::new("dir/rows.AVRO")), Some(DataFormat::Avro));
        assert_eq!(DataFormat::from_path(Path::new("/tmp/export.csv")), Some(DataFormat::Csv));
        assert_eq!(DataFormat::from_path(Path::new("data.csv.gz")), None);
        assert_eq!(DataFormat::from_path(Path::new("README")), None);
    }

    fn natality() -> TableRef {
        TableRef::new("proj", "github_samples", "natality")
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<DataFormat>().unwrap(), DataFormat::Json);
        assert_eq!("csv".parse::<DataFormat>().unwrap(), DataFormat::Csv);
        assert_eq!("Avro".parse::<DataFormat>().unwrap(), DataFormat::Avro);
        assert!("PARQUET".parse::<DataFormat>().is_err());
    }

    #[test]
    fn test_json_wire_name() {
        assert_eq!(DataFormat::Json.wire_name(), "NEWLINE_DELIMITED_JSON");
        assert_eq!(DataFormat::Json.to_string(), "JSON");
    }

    #[test]
    fn test_import_without_bucket_is_local_path_verbatim() {
        let source = SourceLocator::for_import("./data.csv", None);
        assert_eq!(source, SourceLocator::LocalFile(PathBuf::from("./data.csv")));
        assert_eq!(source.to_string(), "./data.csv");
    }

    #[test]
    fn test_import_with_bucket_is_object() {
        let source = SourceLocator::for_import("data.csv", Some("my-bucket"));
        assert_eq!(source, SourceLocator::Object(ObjectRef::new("my-bucket", "data.csv")));
    }

    #[test]
    fn test_export_validates_as_export() {
        let req = TransferRequest::export(
            natality(),
            ObjectRef::new("sample-bigquery-export", "data.json"),
        )
        .with_format(DataFormat::Json);
        assert_eq!(req.validate().unwrap(), JobKind::Export);
    }

    #[test]
    fn test_import_validates_as_import() {
        let req = TransferRequest::import(
            SourceLocator::for_import("./data.csv", None),
            TableRef::new("proj", "my_dataset", "my_table"),
        );
        assert_eq!(req.validate().unwrap(), JobKind::Import);
    }

    #[test]
    fn test_missing_locator_fields_rejected() {
        let req = TransferRequest::export(natality(), ObjectRef::new("", "data.json"));
        assert!(req.validate().is_err());

        let req = TransferRequest::export(TableRef::new("proj", "", "t"), ObjectRef::new("b", "o"));
        assert!(req.validate().is_err());

        let req = TransferRequest::import(
            SourceLocator::LocalFile(PathBuf::new()),
            TableRef::new("proj", "d", "t"),
        );
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_unsupported_direction_rejected() {
        let req = TransferRequest {
            source: SourceLocator::LocalFile(PathBuf::from("a.csv")),
            destination: DestinationLocator::Object(ObjectRef::new("b", "o")),
            format: DataFormat::Csv,
            compression: Compression::None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_gzip_rules() {
        let export = TransferRequest::export(natality(), ObjectRef::new("b", "o.avro"))
            .with_format(DataFormat::Avro)
            .with_compression(Compression::Gzip);
        assert!(export.validate().is_err());

        let export = TransferRequest::export(natality(), ObjectRef::new("b", "o.csv.gz"))
            .with_compression(Compression::from_gzip_flag(true));
        assert!(export.validate().is_ok());

        let import = TransferRequest::import(
            SourceLocator::for_import("data.csv", Some("b")),
            natality(),
        )
        .with_compression(Compression::Gzip);
        assert!(import.validate().is_err());
    }
}
