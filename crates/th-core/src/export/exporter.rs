//! Exporter trait and manager

use crate::error::{Result, ThreadHubError};
use crate::forum::Thread;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Trait for thread exporters
pub trait Exporter: Send + Sync {
    /// Export a thread to string
    fn export(&self, thread: &Thread) -> Result<String>;

    /// Get the format name
    fn format_name(&self) -> &str;

    /// Get the file extension
    fn file_extension(&self) -> &str;
}

/// Registry of export formats
pub struct ExportManager {
    exporters: HashMap<String, Box<dyn Exporter>>,
}

impl ExportManager {
    /// Create a new export manager with the built-in exporters
    pub fn new() -> Self {
        let mut manager = Self {
            exporters: HashMap::new(),
        };

        manager.register(Box::new(super::json::JsonExporter::pretty()));
        manager.register(Box::new(super::json::JsonExporter::compact()));
        manager.register(Box::new(super::markdown::MarkdownExporter::new()));

        manager
    }

    /// Register a new exporter
    pub fn register(&mut self, exporter: Box<dyn Exporter>) {
        self.exporters
            .insert(exporter.format_name().to_string(), exporter);
    }

    fn exporter(&self, format: &str) -> Result<&dyn Exporter> {
        self.get(format).ok_or_else(|| {
            ThreadHubError::Validation(format!(
                "Unknown export format: {} (available: {})",
                format,
                self.available_formats().join(", ")
            ))
        })
    }

    /// Export a thread to the specified format
    pub fn export(&self, thread: &Thread, format: &str) -> Result<String> {
        self.exporter(format)?.export(thread)
    }

    /// Export a thread to a file, adding the format's extension when the path has none
    ///
    /// Returns the path actually written.
    pub fn export_to_file(&self, thread: &Thread, format: &str, path: &Path) -> Result<PathBuf> {
        let exporter = self.exporter(format)?;
        let content = exporter.export(thread)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let final_path = if path.extension().is_some() {
            path.to_path_buf()
        } else {
            path.with_extension(exporter.file_extension())
        };

        let temp_path = final_path.with_extension("tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.flush()?;
        }
        fs::rename(&temp_path, &final_path)?;

        Ok(final_path)
    }

    /// Get list of available format names
    pub fn available_formats(&self) -> Vec<String> {
        let mut formats: Vec<_> = self.exporters.keys().cloned().collect();
        formats.sort();
        formats
    }

    /// Check if a format is available
    pub fn has_format(&self, format: &str) -> bool {
        self.exporters.contains_key(format)
    }

    /// Get an exporter by format name
    pub fn get(&self, format: &str) -> Option<&dyn Exporter> {
        self.exporters.get(format).map(|e| e.as_ref())
    }
}

impl Default for ExportManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::comment::{build_tree, CommentBuilder};
    use crate::post::NewPost;
    use crate::types::UserId;
    use tempfile::TempDir;

    /// "Hello" with A[B], and a deleted root C
    pub(crate) fn sample_thread() -> Thread {
        let alice = UserId::from_string("alice").unwrap();
        let bob = UserId::from_string("bob").unwrap();
        let mut post = NewPost {
            title: "Hello".to_string(),
            body: "First post".to_string(),
            community: Some("rust".to_string()),
            image_url: None,
        }
        .into_post(alice.clone())
        .unwrap();
        post.upvotes = 3;
        post.comment_count = 3;

        let mut a = CommentBuilder::top_level(post.id.clone(), bob.clone())
            .content("Nice")
            .build()
            .unwrap();
        a.upvotes = 2;
        let b = CommentBuilder::reply_to(&a, alice)
            .content("Thanks\nsecond line")
            .build()
            .unwrap();
        let mut c = CommentBuilder::top_level(post.id.clone(), bob)
            .content("oops")
            .build()
            .unwrap();
        c.deleted = true;

        Thread {
            post,
            comments: build_tree(vec![a, b, c]),
        }
    }

    struct TestExporter;

    impl Exporter for TestExporter {
        fn export(&self, _thread: &Thread) -> Result<String> {
            Ok("test export".to_string())
        }

        fn format_name(&self) -> &str {
            "test"
        }

        fn file_extension(&self) -> &str {
            "txt"
        }
    }

    #[test]
    fn test_export_manager_creation() {
        let manager = ExportManager::new();
        assert_eq!(
            manager.available_formats(),
            vec!["json", "json-compact", "markdown"]
        );
    }

    #[test]
    fn test_register_exporter() {
        let mut manager = ExportManager::new();
        manager.register(Box::new(TestExporter));
        assert!(manager.has_format("test"));
        assert_eq!(manager.export(&sample_thread(), "test").unwrap(), "test export");
    }

    #[test]
    fn test_export_unknown_format() {
        let manager = ExportManager::new();
        let err = manager.export(&sample_thread(), "pdf").unwrap_err();
        assert!(err.to_string().contains("pdf"));
    }

    #[test]
    fn test_export_to_file_adds_extension() {
        let temp = TempDir::new().unwrap();
        let manager = ExportManager::new();

        let written = manager
            .export_to_file(&sample_thread(), "markdown", &temp.path().join("out").join("hello"))
            .unwrap();
        assert_eq!(written.extension().unwrap(), "md");
        let content = fs::read_to_string(&written).unwrap();
        assert!(content.starts_with("# Hello"));
        assert!(!written.with_extension("tmp").exists());
    }
}
