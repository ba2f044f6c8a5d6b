//! Typed access on top of the document store

use super::{Collection, Document, Query, RecordStore};
use crate::error::{Result, ThreadHubError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// An entity persisted in one collection
pub trait Record: Serialize + DeserializeOwned {
    /// Collection the entity lives in
    const COLLECTION: Collection;

    /// Value of the `id` field
    fn record_id(&self) -> String;

    /// Encode as a store document
    fn to_document(&self) -> Result<Document> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(ThreadHubError::Store(format!(
                "{} record did not serialize to an object: {}",
                Self::COLLECTION,
                other
            ))),
        }
    }

    /// Decode from a store document
    fn from_document(record: Document) -> Result<Self> {
        Ok(serde_json::from_value(serde_json::Value::Object(record))?)
    }
}

/// Typed helpers available on every [`RecordStore`]
pub trait RecordStoreExt: RecordStore {
    /// List and decode records; undecodable documents are skipped with a warning
    fn fetch<T: Record>(&self, query: &Query) -> Result<Vec<T>> {
        let records = self.list(T::COLLECTION, query)?;
        let mut out = Vec::with_capacity(records.len());
        for record in records {
            let id = record
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or("<no id>")
                .to_string();
            match T::from_document(record) {
                Ok(value) => out.push(value),
                Err(e) => warn!("Skipping corrupt {} record {}: {}", T::COLLECTION, id, e),
            }
        }
        Ok(out)
    }

    /// Look a record up by id
    fn find<T: Record>(&self, id: &str) -> Result<Option<T>> {
        let query = Query::new().eq("id", id).limit(1);
        Ok(self.fetch::<T>(&query)?.into_iter().next())
    }

    /// Insert a new record
    fn insert<T: Record>(&self, record: &T) -> Result<T> {
        let created = self.create(T::COLLECTION, record.to_document()?)?;
        T::from_document(created)
    }

    /// Apply a partial update and return the stored result
    fn patch<T: Record>(&self, id: &str, patch: Document) -> Result<T> {
        let updated = self.update(T::COLLECTION, id, patch)?;
        T::from_document(updated)
    }

    /// Remove a record by id
    fn remove<T: Record>(&self, id: &str) -> Result<()> {
        self.delete(T::COLLECTION, id)
    }
}

impl<S: RecordStore + ?Sized> RecordStoreExt for S {}
