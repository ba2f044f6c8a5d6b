//! Collection file format and schema migration

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use th_core::error::{Result, ThreadHubError};
use th_core::store::Document;
use th_core::types::ProtocolVersion;

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// On-disk contents of one collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionFile {
    /// Schema version for migration
    pub schema_version: String,
    /// Records in insertion order
    #[serde(default)]
    pub records: Vec<Document>,
    /// Extra fields for forward compatibility
    #[serde(flatten, default)]
    pub extra: HashMap<String, Value>,
}

impl CollectionFile {
    /// Create a file with the current schema version
    pub fn new(records: Vec<Document>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            records,
            extra: HashMap::new(),
        }
    }

    /// Parse raw file contents
    ///
    /// A bare JSON array of records (files written before versioning) is
    /// read as an unversioned file and migrated.
    pub fn parse(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => {
                let records = items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(map) => Ok(map),
                        other => Err(ThreadHubError::Store(format!(
                            "collection entry is not an object: {}",
                            other
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self {
                    schema_version: "0.0".to_string(),
                    records,
                    extra: HashMap::new(),
                })
            }
            other => Ok(serde_json::from_value(other)?),
        }
    }

    /// Parse schema version
    pub fn parse_version(&self) -> Option<ProtocolVersion> {
        ProtocolVersion::parse(&self.schema_version)
    }
}

/// Collection schema migrator
pub struct CollectionMigrator;

impl CollectionMigrator {
    /// Migrate a collection file to the current schema version
    pub fn migrate(mut file: CollectionFile) -> Result<CollectionFile> {
        let version = file.parse_version().ok_or_else(|| {
            ThreadHubError::UnsupportedSchemaVersion(file.schema_version.clone())
        })?;

        if version.major == 0 {
            file = migrate_unversioned(file);
            return Ok(file);
        }

        let current = ProtocolVersion::V1_0;
        if !version.is_compatible(&current) {
            return Err(ThreadHubError::UnsupportedSchemaVersion(format!(
                "{} (expected {}.x)",
                file.schema_version, current.major
            )));
        }

        Ok(file)
    }

    /// Check if a file needs migration
    pub fn needs_migration(file: &CollectionFile) -> bool {
        file.schema_version != CURRENT_SCHEMA_VERSION
    }

    /// Get the current schema version
    pub fn current_version() -> &'static str {
        CURRENT_SCHEMA_VERSION
    }
}

/// Unversioned files may lack the flags added with 1.0
fn migrate_unversioned(mut file: CollectionFile) -> CollectionFile {
    for record in &mut file.records {
        record.entry("deleted").or_insert(Value::Bool(false));
    }
    file.schema_version = CURRENT_SCHEMA_VERSION.to_string();
    file
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_current_file_needs_no_migration() {
        let file = CollectionFile::new(Vec::new());
        assert!(!CollectionMigrator::needs_migration(&file));
        assert_eq!(CollectionMigrator::current_version(), "1.0");
    }

    #[test]
    fn test_bare_array_is_migrated() {
        let file =
            CollectionFile::parse(json!([{"id": "a"}, {"id": "b", "deleted": true}])).unwrap();
        assert!(CollectionMigrator::needs_migration(&file));

        let migrated = CollectionMigrator::migrate(file).unwrap();
        assert_eq!(migrated.schema_version, "1.0");
        assert_eq!(migrated.records[0]["deleted"], json!(false));
        assert_eq!(migrated.records[1]["deleted"], json!(true));
    }

    #[test]
    fn test_minor_versions_are_compatible() {
        let file = CollectionFile::parse(json!({"schema_version": "1.3", "records": []})).unwrap();
        assert!(CollectionMigrator::migrate(file).is_ok());
    }

    #[test]
    fn test_future_major_version_rejected() {
        let file = CollectionFile::parse(json!({"schema_version": "2.0", "records": []})).unwrap();
        assert!(matches!(
            CollectionMigrator::migrate(file),
            Err(ThreadHubError::UnsupportedSchemaVersion(_))
        ));

        let garbage =
            CollectionFile::parse(json!({"schema_version": "v1", "records": []})).unwrap();
        assert!(CollectionMigrator::migrate(garbage).is_err());
    }

    #[test]
    fn test_extra_fields_survive() {
        let file = CollectionFile::parse(json!({
            "schema_version": "1.0",
            "records": [],
            "written_by": "threadhub 0.2"
        }))
        .unwrap();
        let out = serde_json::to_value(&file).unwrap();
        assert_eq!(out["written_by"], json!("threadhub 0.2"));
    }
}
