//! File system record store

use crate::collection_file::{CollectionFile, CollectionMigrator, CURRENT_SCHEMA_VERSION};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use th_core::config::default_data_dir;
use th_core::error::{Result, ThreadHubError};
use th_core::store::{
    document_id, merge_patch, upload_key, Collection, Document, Query, RecordStore,
};
use tracing::{debug, info, warn};

/// File system based record store
///
/// Layout under the base directory:
/// `collections/<name>.json` holds a [`CollectionFile`] per collection and
/// `uploads/<key>` holds uploaded files. Writes go through a temp file and
/// a rename. A process-wide lock serializes read-modify-write cycles.
pub struct FileSystemStore {
    /// Base directory for storage
    base_dir: PathBuf,
    /// Collections subdirectory
    collections_dir: PathBuf,
    /// Uploads subdirectory
    uploads_dir: PathBuf,
    /// Prefix of returned upload URLs
    public_url_base: Option<String>,
    lock: RwLock<()>,
}

impl FileSystemStore {
    /// Create a new store rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let store = Self {
            collections_dir: base_dir.join("collections"),
            uploads_dir: base_dir.join("uploads"),
            base_dir,
            public_url_base: None,
            lock: RwLock::new(()),
        };

        store.ensure_dirs()?;
        Ok(store)
    }

    /// Create a store in the platform data directory
    pub fn default_location() -> Result<Self> {
        Self::new(default_data_dir())
    }

    /// Set the prefix used for upload URLs
    pub fn with_public_url_base(mut self, base: impl Into<String>) -> Self {
        self.public_url_base = Some(base.into());
        self
    }

    /// Ensure required directories exist
    fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.collections_dir, &self.uploads_dir] {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    ThreadHubError::Io(std::io::Error::new(
                        e.kind(),
                        format!("Failed to create directory {:?}: {}", dir, e),
                    ))
                })?;
                debug!("Created directory: {:?}", dir);
            }
        }
        Ok(())
    }

    /// Get the path of a collection file
    pub fn collection_path(&self, collection: Collection) -> PathBuf {
        self.collections_dir.join(format!("{}.json", collection.name()))
    }

    fn temp_path(&self, collection: Collection) -> PathBuf {
        self.collections_dir
            .join(format!(".{}.json.tmp", collection.name()))
    }

    /// Read all records of a collection; a missing file is an empty collection
    fn read_collection(&self, collection: Collection) -> Result<Vec<Document>> {
        let path = self.collection_path(collection);
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ThreadHubError::Io(e)),
        };

        let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| ThreadHubError::from(e).with_context(format!("reading {:?}", path)))?;
        let parsed = CollectionFile::parse(value)?;

        let file = if CollectionMigrator::needs_migration(&parsed) {
            info!(
                "Migrating {} from version {} to {}",
                collection, parsed.schema_version, CURRENT_SCHEMA_VERSION
            );
            CollectionMigrator::migrate(parsed)?
        } else {
            parsed
        };

        Ok(file.records)
    }

    /// Write a collection atomically (write to temp, then rename)
    fn write_collection(&self, collection: Collection, records: Vec<Document>) -> Result<()> {
        let temp_path = self.temp_path(collection);
        let final_path = self.collection_path(collection);
        let file = CollectionFile::new(records);

        let temp_file = fs::File::create(&temp_path).map_err(|e| {
            ThreadHubError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        let mut writer = BufWriter::new(temp_file);
        serde_json::to_writer_pretty(&mut writer, &file)?;
        writer.flush()?;
        drop(writer);

        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            ThreadHubError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!("Wrote {} records of {} to {:?}", file.records.len(), collection, final_path);
        Ok(())
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, ()>> {
        self.lock
            .read()
            .map_err(|_| ThreadHubError::Store("file store lock poisoned".to_string()))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, ()>> {
        self.lock
            .write()
            .map_err(|_| ThreadHubError::Store("file store lock poisoned".to_string()))
    }

    fn upload_url(&self, key: &str) -> String {
        match &self.public_url_base {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => format!("file://{}", self.uploads_dir.join(key).display()),
        }
    }

    /// Get base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get uploads directory
    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }
}

fn has_id(record: &Document, id: &str) -> bool {
    record.get("id").and_then(|v| v.as_str()) == Some(id)
}

impl RecordStore for FileSystemStore {
    fn list(&self, collection: Collection, query: &Query) -> Result<Vec<Document>> {
        let _guard = self.read_guard()?;
        let records = self.read_collection(collection)?;
        Ok(query.apply(&records))
    }

    fn create(&self, collection: Collection, record: Document) -> Result<Document> {
        let id = document_id(&record)?.to_string();
        let _guard = self.write_guard()?;
        let mut records = self.read_collection(collection)?;

        if records.iter().any(|r| has_id(r, &id)) {
            return Err(ThreadHubError::DuplicateRecord {
                collection: collection.to_string(),
                id,
            });
        }

        records.push(record.clone());
        self.write_collection(collection, records)?;
        debug!("Created {} record {}", collection, id);
        Ok(record)
    }

    fn update(&self, collection: Collection, id: &str, patch: Document) -> Result<Document> {
        let _guard = self.write_guard()?;
        let mut records = self.read_collection(collection)?;

        let record = records
            .iter_mut()
            .find(|r| has_id(r, id))
            .ok_or_else(|| ThreadHubError::RecordNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        merge_patch(record, patch)?;
        let updated = record.clone();

        self.write_collection(collection, records)?;
        debug!("Updated {} record {}", collection, id);
        Ok(updated)
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let _guard = self.write_guard()?;
        let mut records = self.read_collection(collection)?;
        let before = records.len();
        records.retain(|r| !has_id(r, id));

        if records.len() == before {
            return Err(ThreadHubError::RecordNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        self.write_collection(collection, records)?;
        debug!("Deleted {} record {}", collection, id);
        Ok(())
    }

    fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        let key = upload_key(file_name, bytes);
        let path = self.uploads_dir.join(&key);

        if path.exists() {
            debug!("Upload {} already stored", key);
        } else {
            let temp_path = self.uploads_dir.join(format!(".{}.tmp", key));
            fs::write(&temp_path, bytes)?;
            fs::rename(&temp_path, &path).inspect_err(|e| {
                warn!("Failed to store upload {}: {}", key, e);
                let _ = fs::remove_file(&temp_path);
            })?;
            debug!("Stored upload {} ({} bytes)", key, bytes.len());
        }

        Ok(self.upload_url(&key))
    }
}
