//! Comment builder for fluent API

use super::model::Comment;
use crate::config::MAX_REPLY_DEPTH;
use crate::error::{Result, ThreadHubError};
use crate::types::{CommentId, PostId, UserId};
use chrono::Utc;

/// Builder for new top-level comments and replies
pub struct CommentBuilder {
    post_id: PostId,
    author: UserId,
    parent: Option<ParentRef>,
    content: Option<String>,
    max_depth: u32,
}

struct ParentRef {
    id: CommentId,
    depth: u32,
    deleted: bool,
}

impl CommentBuilder {
    /// Start a comment posted directly on a post
    pub fn top_level(post_id: PostId, author: UserId) -> Self {
        Self {
            post_id,
            author,
            parent: None,
            content: None,
            max_depth: MAX_REPLY_DEPTH,
        }
    }

    /// Start a reply to an existing comment
    pub fn reply_to(parent: &Comment, author: UserId) -> Self {
        Self {
            post_id: parent.post_id.clone(),
            author,
            parent: Some(ParentRef {
                id: parent.id.clone(),
                depth: parent.depth,
                deleted: parent.deleted,
            }),
            content: None,
            max_depth: MAX_REPLY_DEPTH,
        }
    }

    /// Set the comment content
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Override the depth cap (never above the global maximum)
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth.min(MAX_REPLY_DEPTH);
        self
    }

    /// Build the comment
    pub fn build(self) -> Result<Comment> {
        let content = self.content.ok_or_else(|| {
            ThreadHubError::Validation("Comment content is required".to_string())
        })?;

        if content.trim().is_empty() {
            return Err(ThreadHubError::Validation(
                "Comment content cannot be empty".to_string(),
            ));
        }

        if let Some(parent) = &self.parent {
            if parent.deleted {
                return Err(ThreadHubError::Validation(format!(
                    "Cannot reply to deleted comment {}",
                    parent.id
                )));
            }
        }

        let depth = self
            .parent
            .as_ref()
            .map(|p| p.depth.saturating_add(1).min(self.max_depth))
            .unwrap_or(0);

        Ok(Comment {
            id: CommentId::new(),
            post_id: self.post_id,
            author: self.author,
            content,
            parent_id: self.parent.map(|p| p.id),
            upvotes: 0,
            downvotes: 0,
            depth,
            deleted: false,
            created_at: Utc::now(),
        })
    }
}
