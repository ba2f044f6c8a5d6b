//! A post together with its comment tree

use crate::comment::{count_nodes, find, CommentNode};
use crate::post::Post;
use crate::types::CommentId;
use serde::Serialize;

/// A post and the reply tree rebuilt from its comments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thread {
    pub post: Post,
    /// Root comments, each with nested replies
    pub comments: Vec<CommentNode>,
}

impl Thread {
    /// Number of comments in the tree (including soft-deleted ones)
    pub fn comment_count(&self) -> usize {
        count_nodes(&self.comments)
    }

    /// Find a comment anywhere in the tree
    pub fn find(&self, id: &CommentId) -> Option<&CommentNode> {
        find(&self.comments, id)
    }

    /// Check if the thread has no comments
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}
