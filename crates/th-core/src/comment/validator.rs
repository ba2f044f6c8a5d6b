//! Comment validation

use super::model::Comment;
use crate::config::MAX_REPLY_DEPTH;
use crate::error::{Result, ThreadHubError};

/// Maximum comment length (default)
pub const MAX_COMMENT_LENGTH: usize = 10000;

/// Minimum comment length
pub const MIN_COMMENT_LENGTH: usize = 1;

/// Validator for comments
pub struct CommentValidator {
    max_length: usize,
    min_length: usize,
}

impl CommentValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self {
            max_length: MAX_COMMENT_LENGTH,
            min_length: MIN_COMMENT_LENGTH,
        }
    }

    /// Create a new validator with custom max length
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length,
            min_length: MIN_COMMENT_LENGTH,
        }
    }

    /// Validate comment content (length counted in characters, after trimming)
    pub fn validate_content(&self, content: &str) -> Result<()> {
        let length = content.trim().chars().count();

        if length < self.min_length {
            return Err(ThreadHubError::Validation(
                "Comment content cannot be empty".to_string(),
            ));
        }

        if length > self.max_length {
            return Err(ThreadHubError::Validation(format!(
                "Comment content exceeds maximum length of {} characters",
                self.max_length
            )));
        }

        Ok(())
    }

    /// Validate a complete comment before it is stored
    pub fn validate(&self, comment: &Comment) -> Result<()> {
        self.validate_content(&comment.content)?;

        if comment.depth > MAX_REPLY_DEPTH {
            return Err(ThreadHubError::Validation(format!(
                "Comment depth {} exceeds maximum of {}",
                comment.depth, MAX_REPLY_DEPTH
            )));
        }

        if comment.parent_id.as_ref() == Some(&comment.id) {
            return Err(ThreadHubError::Validation(
                "A comment cannot reply to itself".to_string(),
            ));
        }

        if comment.parent_id.is_none() && comment.depth != 0 {
            return Err(ThreadHubError::Validation(
                "Top-level comments must have depth 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CommentValidator {
    fn default() -> Self {
        Self::new()
    }
}
