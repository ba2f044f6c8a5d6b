//! JSON exporter for threads

use super::exporter::Exporter;
use crate::comment::CommentNode;
use crate::error::Result;
use crate::forum::Thread;
use crate::types::ProtocolVersion;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// JSON exporter, pretty-printed or compact
pub struct JsonExporter {
    pretty: bool,
    name: String,
}

impl JsonExporter {
    /// Create a pretty-printed JSON exporter
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            name: "json".to_string(),
        }
    }

    /// Create a single-line JSON exporter
    pub fn compact() -> Self {
        Self {
            pretty: false,
            name: "json-compact".to_string(),
        }
    }
}

impl Exporter for JsonExporter {
    fn export(&self, thread: &Thread) -> Result<String> {
        let data = ExportData::from_thread(thread);

        let json = if self.pretty {
            serde_json::to_string_pretty(&data)?
        } else {
            serde_json::to_string(&data)?
        };

        Ok(json)
    }

    fn format_name(&self) -> &str {
        &self.name
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

/// Exported document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportData {
    /// Format version
    pub version: String,
    /// Unix timestamp of the export
    pub exported_at: i64,
    pub post: ExportPost,
    pub stats: ExportStats,
    /// Root comments with nested replies
    pub comments: Vec<ExportComment>,
}

impl ExportData {
    /// Create from a loaded thread
    pub fn from_thread(thread: &Thread) -> Self {
        let comments: Vec<ExportComment> = thread
            .comments
            .iter()
            .map(|node| ExportComment::from_node(node, 0))
            .collect();

        Self {
            version: ProtocolVersion::V1_0.to_string(),
            exported_at: Utc::now().timestamp(),
            post: ExportPost::from_thread(thread),
            stats: ExportStats::from_thread(thread),
            comments,
        }
    }
}

/// Exported post header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportPost {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: String,
    pub community: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub score: i64,
    pub deleted: bool,
    /// Unix timestamp
    pub created_at: i64,
}

impl ExportPost {
    fn from_thread(thread: &Thread) -> Self {
        let post = &thread.post;
        Self {
            id: post.id.to_string(),
            title: post.title.clone(),
            body: post.body.clone(),
            author: post.author.to_string(),
            community: post.community.clone(),
            image_url: post.image_url.clone(),
            score: post.score(),
            deleted: post.deleted,
            created_at: post.created_at.timestamp(),
        }
    }
}

/// Export statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportStats {
    /// Comments in the tree
    pub comments: usize,
    /// Soft-deleted comments in the tree
    pub deleted: usize,
    /// Deepest tree level (0 when there are no replies)
    pub max_depth: u32,
}

impl ExportStats {
    fn from_thread(thread: &Thread) -> Self {
        let mut deleted = 0;
        let mut max_depth = 0;
        crate::comment::walk(&thread.comments, &mut |node, level| {
            if node.comment.deleted {
                deleted += 1;
            }
            max_depth = max_depth.max(level);
        });

        Self {
            comments: thread.comment_count(),
            deleted,
            max_depth,
        }
    }
}

/// Exported comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportComment {
    pub id: String,
    pub author: String,
    /// Displayed text ("[deleted]" for soft-deleted comments)
    pub body: String,
    pub score: i64,
    pub upvotes: u32,
    pub downvotes: u32,
    /// Position in the tree
    pub level: u32,
    /// Unix timestamp
    pub created_at: i64,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub replies: Vec<ExportComment>,
}

impl ExportComment {
    /// Create from a tree node at the given level
    pub fn from_node(node: &CommentNode, level: u32) -> Self {
        let comment = &node.comment;
        Self {
            id: comment.id.to_string(),
            author: comment.author.to_string(),
            body: comment.display_content().to_string(),
            score: comment.score(),
            upvotes: comment.upvotes,
            downvotes: comment.downvotes,
            level,
            created_at: comment.created_at.timestamp(),
            replies: node
                .replies
                .iter()
                .map(|r| ExportComment::from_node(r, level + 1))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::exporter::tests::sample_thread;

    #[test]
    fn test_json_export_nests_replies() {
        let thread = sample_thread();
        let json = JsonExporter::pretty().export(&thread).unwrap();
        let data: ExportData = serde_json::from_str(&json).unwrap();

        assert_eq!(data.version, "1.0");
        assert_eq!(data.post.title, "Hello");
        assert_eq!(data.post.score, 3);
        assert_eq!(data.comments.len(), 2);
        assert_eq!(data.comments[0].replies.len(), 1);
        assert_eq!(data.comments[0].replies[0].level, 1);
        assert_eq!(data.stats.comments, 3);
        assert_eq!(data.stats.deleted, 1);
        assert_eq!(data.stats.max_depth, 1);
    }

    #[test]
    fn test_deleted_content_not_exported() {
        let json = JsonExporter::compact().export(&sample_thread()).unwrap();
        assert!(!json.contains("oops"));
        assert!(json.contains("[deleted]"));
        assert!(!json.contains('\n'));
    }
}
