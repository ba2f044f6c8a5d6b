//! Record store abstraction
//!
//! All persistence goes through a generic collection API: list with
//! where/order/limit, create, update, delete, plus file upload. Filters are
//! evaluated client-side by [`Query::apply`], so every backend only has to
//! hand over the full collection.
//!
//! # Example
//!
//! ```ignore
//! use th_core::store::{MemoryStore, Query, RecordStoreExt};
//! use th_core::comment::Comment;
//!
//! let store = MemoryStore::new();
//! let comments: Vec<Comment> = store.fetch(&Query::new().eq("post_id", post_id))?;
//! ```

mod auth;
mod memory;
mod query;
mod record;

pub use auth::{AuthState, StaticAuth};
pub use memory::MemoryStore;
pub use query::{Filter, FilterOp, OrderBy, OrderDirection, Query};
pub use record::{Record, RecordStoreExt};

use crate::error::{Result, ThreadHubError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored record: a flat JSON object with a string `id` field
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Entity collections known to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Posts,
    Comments,
    Votes,
}

impl Collection {
    /// All collections
    pub const ALL: [Collection; 3] = [Collection::Posts, Collection::Comments, Collection::Votes];

    /// Collection name as used on disk
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Posts => "posts",
            Collection::Comments => "comments",
            Collection::Votes => "votes",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for record store implementations
pub trait RecordStore: Send + Sync {
    /// List the records of a collection matching the query
    fn list(&self, collection: Collection, query: &Query) -> Result<Vec<Document>>;

    /// Insert a new record; its `id` must be unique within the collection
    fn create(&self, collection: Collection, record: Document) -> Result<Document>;

    /// Shallow-merge `patch` into the record with the given id
    fn update(&self, collection: Collection, id: &str, patch: Document) -> Result<Document>;

    /// Remove a record
    fn delete(&self, collection: Collection, id: &str) -> Result<()>;

    /// Store a file and return its public URL
    fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<String>;
}

/// Extract the `id` field of a document
pub fn document_id(record: &Document) -> Result<&str> {
    record
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ThreadHubError::Validation("Record is missing a string id".to_string()))
}

/// Apply a patch onto a record in place, refusing to change its id
pub fn merge_patch(record: &mut Document, patch: Document) -> Result<()> {
    if let Some(new_id) = patch.get("id") {
        if record.get("id") != Some(new_id) {
            return Err(ThreadHubError::Validation(
                "Record id cannot be changed by an update".to_string(),
            ));
        }
    }
    for (key, value) in patch {
        record.insert(key, value);
    }
    Ok(())
}

/// Content-addressed object key for an uploaded file
///
/// Format: `<16 hex chars of blake3(bytes)>-<sanitized file name>`
pub fn upload_key(file_name: &str, bytes: &[u8]) -> String {
    let hash = blake3::hash(bytes);
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_start_matches('.');
    let name = if sanitized.is_empty() { "upload" } else { sanitized };
    format!("{}-{}", &hash.to_hex()[..16], name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_document_id() {
        assert_eq!(document_id(&doc(json!({"id": "a1"}))).unwrap(), "a1");
        assert!(document_id(&doc(json!({"id": 5}))).is_err());
        assert!(document_id(&doc(json!({}))).is_err());
    }

    #[test]
    fn test_merge_patch() {
        let mut record = doc(json!({"id": "a1", "upvotes": 1, "deleted": false}));
        merge_patch(&mut record, doc(json!({"upvotes": 2, "deleted": true}))).unwrap();
        assert_eq!(record["upvotes"], json!(2));
        assert_eq!(record["deleted"], json!(true));

        assert!(merge_patch(&mut record, doc(json!({"id": "b2"}))).is_err());
        assert!(merge_patch(&mut record, doc(json!({"id": "a1"}))).is_ok());
    }

    #[test]
    fn test_upload_key_is_content_addressed() {
        let k1 = upload_key("cat.png", b"meow");
        let k2 = upload_key("other/dir/cat.png", b"meow");
        let k3 = upload_key("cat.png", b"woof");
        assert_eq!(k1, k2);
        assert_ne!(k1, k3);
        assert!(k1.ends_with("-cat.png"));
        assert_eq!(k1.len(), 16 + 1 + "cat.png".len());
    }

    #[test]
    fn test_upload_key_sanitizes_names() {
        assert!(upload_key("my photo (1).jpg", b"x").ends_with("-my_photo__1_.jpg"));
        assert!(upload_key("..", b"x").ends_with("-upload"));
        assert!(upload_key("", b"x").ends_with("-upload"));
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::Posts.to_string(), "posts");
        assert_eq!(Collection::ALL.len(), 3);
    }
}
