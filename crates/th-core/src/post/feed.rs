//! Feed ordering and client-side search

use super::model::Post;
use crate::comment::Comment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Feed sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSort {
    /// Newest first
    New,
    /// Highest net score first
    Top,
    /// Net score decayed by age
    #[default]
    Hot,
}

impl fmt::Display for FeedSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSort::New => write!(f, "new"),
            FeedSort::Top => write!(f, "top"),
            FeedSort::Hot => write!(f, "hot"),
        }
    }
}

impl FromStr for FeedSort {
    type Err = crate::ThreadHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(FeedSort::New),
            "top" => Ok(FeedSort::Top),
            "hot" | "trending" => Ok(FeedSort::Hot),
            other => Err(crate::ThreadHubError::Validation(format!(
                "Unknown sort order: {}",
                other
            ))),
        }
    }
}

/// Decaying score: `net / (age_hours + 2) ^ gravity`
pub fn hot_score(net: i64, age_hours: f64, gravity: f64) -> f64 {
    net as f64 / (age_hours.max(0.0) + 2.0).powf(gravity)
}

/// Sort posts in place; ties fall back to newest first
pub fn rank_posts(posts: &mut [Post], sort: FeedSort, now: DateTime<Utc>, gravity: f64) {
    match sort {
        FeedSort::New => posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        FeedSort::Top => posts.sort_by(|a, b| {
            b.score()
                .cmp(&a.score())
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
        FeedSort::Hot => posts.sort_by(|a, b| {
            let ha = hot_score(a.score(), a.age_hours(now), gravity);
            let hb = hot_score(b.score(), b.age_hours(now), gravity);
            hb.partial_cmp(&ha)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
    }
}

/// Case-insensitive substring search over title, body and community
pub fn search_posts<'a>(posts: &'a [Post], query: &str) -> Vec<&'a Post> {
    let query_lower = query.to_lowercase();
    posts
        .iter()
        .filter(|p| !p.deleted)
        .filter(|p| {
            p.title.to_lowercase().contains(&query_lower)
                || p.body.to_lowercase().contains(&query_lower)
                || p.community.to_lowercase().contains(&query_lower)
        })
        .collect()
}

/// Case-insensitive substring search over comment text and author
pub fn search_comments<'a>(comments: &'a [Comment], query: &str) -> Vec<&'a Comment> {
    let query_lower = query.to_lowercase();
    comments
        .iter()
        .filter(|c| !c.deleted)
        .filter(|c| {
            c.content.to_lowercase().contains(&query_lower)
                || c.author.as_str().to_lowercase().contains(&query_lower)
        })
        .collect()
}
