//! Export functionality for threads
//!
//! This module provides exporters for converting a loaded thread (post plus
//! comment tree) to JSON and Markdown.
//!
//! # Example
//!
//! ```ignore
//! use th_core::export::ExportManager;
//!
//! let manager = ExportManager::new();
//! let json = manager.export(&thread, "json")?;
//! let md = manager.export(&thread, "markdown")?;
//! ```

mod exporter;
mod json;
mod markdown;

pub use exporter::{ExportManager, Exporter};
pub use json::{ExportComment, ExportData, ExportPost, ExportStats, JsonExporter};
pub use markdown::MarkdownExporter;
