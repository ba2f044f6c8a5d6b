//! Post data models

use crate::error::{Result, ThreadHubError};
use crate::store::{Collection, Record};
use crate::types::{timestamp, PostId, UserId};
use crate::vote::Tally;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum title length in characters
pub const MAX_TITLE_LENGTH: usize = 300;

/// Community used when none is given
pub const DEFAULT_COMMUNITY: &str = "general";

/// A post in a community feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique post identifier
    pub id: PostId,
    /// Title shown in feeds
    pub title: String,
    /// Body text
    #[serde(default)]
    pub body: String,
    /// Author of the post
    pub author: UserId,
    /// Community the post belongs to
    #[serde(default = "default_community")]
    pub community: String,
    /// Attached image, as returned by the upload endpoint
    #[serde(default)]
    pub image_url: Option<String>,
    /// Upvote counter
    #[serde(default)]
    pub upvotes: u32,
    /// Downvote counter
    #[serde(default)]
    pub downvotes: u32,
    /// Denormalized number of comments, bumped on every new comment
    #[serde(default)]
    pub comment_count: u32,
    /// Soft-delete flag
    #[serde(default)]
    pub deleted: bool,
    /// When the post was created
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

fn default_community() -> String {
    DEFAULT_COMMUNITY.to_string()
}

impl Post {
    /// Net score (upvotes - downvotes), may be negative
    pub fn score(&self) -> i64 {
        self.tally().net()
    }

    /// Vote counters of this post
    pub fn tally(&self) -> Tally {
        Tally {
            upvotes: self.upvotes,
            downvotes: self.downvotes,
        }
    }

    /// Age in fractional hours relative to `now` (never negative)
    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        let seconds = now.signed_duration_since(self.created_at).num_seconds().max(0);
        seconds as f64 / 3600.0
    }
}

impl Record for Post {
    const COLLECTION: Collection = Collection::Posts;

    fn record_id(&self) -> String {
        self.id.to_string()
    }
}

/// Input for a new post
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub community: Option<String>,
    pub image_url: Option<String>,
}

impl NewPost {
    /// Validate and turn into a post record
    pub fn into_post(self, author: UserId) -> Result<Post> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ThreadHubError::Validation("Post title cannot be empty".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(ThreadHubError::Validation(format!(
                "Post title exceeds maximum length of {} characters",
                MAX_TITLE_LENGTH
            )));
        }

        let community = self
            .community
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(default_community);
        if community.chars().any(char::is_whitespace) {
            return Err(ThreadHubError::Validation(format!(
                "Community name cannot contain whitespace: {:?}",
                community
            )));
        }

        Ok(Post {
            id: PostId::new(),
            title,
            body: self.body,
            author,
            community,
            image_url: self.image_url,
            upvotes: 0,
            downvotes: 0,
            comment_count: 0,
            deleted: false,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserId {
        UserId::from_string("alice").unwrap()
    }

    #[test]
    fn test_new_post_defaults() {
        let post = NewPost {
            title: "  Hello world  ".to_string(),
            ..Default::default()
        }
        .into_post(alice())
        .unwrap();

        assert_eq!(post.title, "Hello world");
        assert_eq!(post.community, DEFAULT_COMMUNITY);
        assert_eq!(post.comment_count, 0);
        assert_eq!(post.score(), 0);
    }

    #[test]
    fn test_new_post_validation() {
        let empty = NewPost::default().into_post(alice());
        assert!(empty.is_err());

        let long = NewPost {
            title: "x".repeat(MAX_TITLE_LENGTH + 1),
            ..Default::default()
        };
        assert!(long.into_post(alice()).is_err());

        let bad_community = NewPost {
            title: "ok".to_string(),
            community: Some("two words".to_string()),
            ..Default::default()
        };
        assert!(bad_community.into_post(alice()).is_err());
    }

    #[test]
    fn test_community_is_normalized() {
        let post = NewPost {
            title: "t".to_string(),
            community: Some(" RustLang ".to_string()),
            ..Default::default()
        }
        .into_post(alice())
        .unwrap();
        assert_eq!(post.community, "rustlang");
    }

    #[test]
    fn test_age_hours_never_negative() {
        let post = NewPost {
            title: "t".to_string(),
            ..Default::default()
        }
        .into_post(alice())
        .unwrap();
        let earlier = post.created_at - chrono::Duration::hours(1);
        assert_eq!(post.age_hours(earlier), 0.0);
        let later = post.created_at + chrono::Duration::minutes(90);
        assert!((post.age_hours(later) - 1.5).abs() < 1e-9);
    }
}
