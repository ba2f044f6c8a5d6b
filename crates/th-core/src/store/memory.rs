//! In-memory record store

use super::{document_id, merge_patch, upload_key, Collection, Document, Query, RecordStore};
use crate::error::{Result, ThreadHubError};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// In-memory record store, used by tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
    uploads: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in a collection
    pub fn len(&self, collection: Collection) -> usize {
        self.read()
            .map(|c| c.get(&collection).map(Vec::len).unwrap_or(0))
            .unwrap_or(0)
    }

    /// Bytes of an uploaded file by object key
    pub fn uploaded(&self, key: &str) -> Option<Vec<u8>> {
        self.uploads.read().ok()?.get(key).cloned()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Collection, Vec<Document>>>> {
        self.collections
            .read()
            .map_err(|_| ThreadHubError::Store("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Collection, Vec<Document>>>> {
        self.collections
            .write()
            .map_err(|_| ThreadHubError::Store("memory store lock poisoned".to_string()))
    }
}

impl RecordStore for MemoryStore {
    fn list(&self, collection: Collection, query: &Query) -> Result<Vec<Document>> {
        let collections = self.read()?;
        Ok(collections
            .get(&collection)
            .map(|records| query.apply(records))
            .unwrap_or_default())
    }

    fn create(&self, collection: Collection, record: Document) -> Result<Document> {
        let id = document_id(&record)?.to_string();
        let mut collections = self.write()?;
        let records = collections.entry(collection).or_default();

        if records.iter().any(|r| r.get("id").and_then(|v| v.as_str()) == Some(id.as_str())) {
            return Err(ThreadHubError::DuplicateRecord {
                collection: collection.to_string(),
                id,
            });
        }

        records.push(record.clone());
        debug!("Created {} record {}", collection, id);
        Ok(record)
    }

    fn update(&self, collection: Collection, id: &str, patch: Document) -> Result<Document> {
        let mut collections = self.write()?;
        let record = collections
            .get_mut(&collection)
            .and_then(|records| {
                records
                    .iter_mut()
                    .find(|r| r.get("id").and_then(|v| v.as_str()) == Some(id))
            })
            .ok_or_else(|| ThreadHubError::RecordNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        merge_patch(record, patch)?;
        debug!("Updated {} record {}", collection, id);
        Ok(record.clone())
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let mut collections = self.write()?;
        let records = collections.entry(collection).or_default();
        let before = records.len();
        records.retain(|r| r.get("id").and_then(|v| v.as_str()) != Some(id));

        if records.len() == before {
            return Err(ThreadHubError::RecordNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        debug!("Deleted {} record {}", collection, id);
        Ok(())
    }

    fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        let key = upload_key(file_name, bytes);
        self.uploads
            .write()
            .map_err(|_| ThreadHubError::Store("memory store lock poisoned".to_string()))?
            .insert(key.clone(), bytes.to_vec());
        Ok(format!("memory://uploads/{}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_create_and_list() {
        let store = MemoryStore::new();
        store.create(Collection::Comments, doc(json!({"id": "c1", "post_id": "p"}))).unwrap();
        store.create(Collection::Comments, doc(json!({"id": "c2", "post_id": "q"}))).unwrap();

        let all = store.list(Collection::Comments, &Query::new()).unwrap();
        assert_eq!(all.len(), 2);

        let only_p = store
            .list(Collection::Comments, &Query::new().eq("post_id", "p"))
            .unwrap();
        assert_eq!(only_p.len(), 1);
        assert!(store.list(Collection::Votes, &Query::new()).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_create_fails() {
        let store = MemoryStore::new();
        store.create(Collection::Posts, doc(json!({"id": "p1"}))).unwrap();
        let err = store.create(Collection::Posts, doc(json!({"id": "p1"}))).unwrap_err();
        assert!(matches!(err, ThreadHubError::DuplicateRecord { .. }));
    }

    #[test]
    fn test_create_requires_id() {
        let store = MemoryStore::new();
        assert!(store.create(Collection::Posts, doc(json!({"title": "x"}))).is_err());
    }

    #[test]
    fn test_update_merges() {
        let store = MemoryStore::new();
        store
            .create(Collection::Posts, doc(json!({"id": "p1", "comment_count": 0, "title": "t"})))
            .unwrap();
        let updated = store
            .update(Collection::Posts, "p1", doc(json!({"comment_count": 1})))
            .unwrap();
        assert_eq!(updated["comment_count"], json!(1));
        assert_eq!(updated["title"], json!("t"));
    }

    #[test]
    fn test_update_and_delete_missing() {
        let store = MemoryStore::new();
        assert!(store
            .update(Collection::Posts, "nope", Document::new())
            .unwrap_err()
            .is_not_found());
        assert!(store.delete(Collection::Posts, "nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        store.create(Collection::Votes, doc(json!({"id": "v1"}))).unwrap();
        assert_eq!(store.len(Collection::Votes), 1);
        store.delete(Collection::Votes, "v1").unwrap();
        assert_eq!(store.len(Collection::Votes), 0);
    }

    #[test]
    fn test_upload() {
        let store = MemoryStore::new();
        let url = store.upload("pic.png", b"png-bytes").unwrap();
        assert!(url.starts_with("memory://uploads/"));
        let key = url.trim_start_matches("memory://uploads/");
        assert_eq!(store.uploaded(key), Some(b"png-bytes".to_vec()));
    }
}
