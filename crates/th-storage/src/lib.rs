//! th-storage - Storage library for threadhub
//!
//! This crate provides the file system implementation of the
//! [`RecordStore`](th_core::store::RecordStore) trait: one versioned JSON
//! file per collection plus a directory of uploaded files.

mod collection_file;
mod fs_store;

pub use collection_file::{CollectionFile, CollectionMigrator, CURRENT_SCHEMA_VERSION};
pub use fs_store::FileSystemStore;
