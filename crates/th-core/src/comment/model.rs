//! Comment data models

use crate::store::{Collection, Record};
use crate::types::{timestamp, CommentId, PostId, UserId};
use crate::vote::Tally;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Text shown in place of a soft-deleted comment
pub const DELETED_PLACEHOLDER: &str = "[deleted]";

/// A comment on a post, stored flat with a parent pointer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment identifier
    pub id: CommentId,
    /// Post this comment belongs to
    pub post_id: PostId,
    /// Author of the comment
    pub author: UserId,
    /// Comment text
    pub content: String,
    /// Comment being replied to; None for top-level comments
    #[serde(default)]
    pub parent_id: Option<CommentId>,
    /// Upvote counter
    #[serde(default)]
    pub upvotes: u32,
    /// Downvote counter
    #[serde(default)]
    pub downvotes: u32,
    /// Nesting depth recorded at creation, 0 for top level
    #[serde(default)]
    pub depth: u32,
    /// Soft-delete flag
    #[serde(default)]
    pub deleted: bool,
    /// When the comment was created
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Net score (upvotes - downvotes), may be negative
    pub fn score(&self) -> i64 {
        self.tally().net()
    }

    /// Vote counters of this comment
    pub fn tally(&self) -> Tally {
        Tally {
            upvotes: self.upvotes,
            downvotes: self.downvotes,
        }
    }

    /// Check if this comment was posted directly on the post
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Text to display, hiding soft-deleted content
    pub fn display_content(&self) -> &str {
        if self.deleted {
            DELETED_PLACEHOLDER
        } else {
            &self.content
        }
    }
}

impl Record for Comment {
    const COLLECTION: Collection = Collection::Comments;

    fn record_id(&self) -> String {
        self.id.to_string()
    }
}
