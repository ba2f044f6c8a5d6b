//! Vote data models

use crate::store::{Collection, Record};
use crate::types::{timestamp, CommentId, PostId, UserId, VoteId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// The other direction
    pub fn opposite(&self) -> Self {
        match self {
            VoteDirection::Up => VoteDirection::Down,
            VoteDirection::Down => VoteDirection::Up,
        }
    }

    /// Display arrow
    pub fn arrow(&self) -> &'static str {
        match self {
            VoteDirection::Up => "▲",
            VoteDirection::Down => "▼",
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteDirection::Up => write!(f, "up"),
            VoteDirection::Down => write!(f, "down"),
        }
    }
}

/// Kind of entity a vote targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Post,
    Comment,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Post => write!(f, "post"),
            TargetKind::Comment => write!(f, "comment"),
        }
    }
}

/// Typed reference to something that can be voted on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VoteTarget {
    Post(PostId),
    Comment(CommentId),
}

impl VoteTarget {
    /// Kind stored on the vote record
    pub fn kind(&self) -> TargetKind {
        match self {
            VoteTarget::Post(_) => TargetKind::Post,
            VoteTarget::Comment(_) => TargetKind::Comment,
        }
    }

    /// Identifier stored on the vote record
    pub fn id_string(&self) -> String {
        match self {
            VoteTarget::Post(id) => id.to_string(),
            VoteTarget::Comment(id) => id.to_string(),
        }
    }
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id_string())
    }
}

/// One user's vote on one post or comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// Unique vote identifier
    pub id: VoteId,
    /// Voting user
    pub user_id: UserId,
    /// Identifier of the post or comment
    pub target_id: String,
    /// Whether the target is a post or a comment
    pub target_kind: TargetKind,
    /// Up or down
    pub direction: VoteDirection,
    /// When the vote was cast
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Vote {
    /// Create a fresh vote record
    pub fn new(user_id: UserId, target: &VoteTarget, direction: VoteDirection) -> Self {
        Self {
            id: VoteId::new(),
            user_id,
            target_id: target.id_string(),
            target_kind: target.kind(),
            direction,
            created_at: Utc::now(),
        }
    }

    /// Check if this vote belongs to (user, target)
    pub fn is_for(&self, user_id: &UserId, target: &VoteTarget) -> bool {
        &self.user_id == user_id
            && self.target_kind == target.kind()
            && self.target_id == target.id_string()
    }
}

impl Record for Vote {
    const COLLECTION: Collection = Collection::Votes;

    fn record_id(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposite() {
        assert_eq!(VoteDirection::Up.opposite(), VoteDirection::Down);
        assert_eq!(VoteDirection::Down.opposite(), VoteDirection::Up);
    }

    #[test]
    fn test_vote_serialization() {
        let target = VoteTarget::Comment(CommentId::new());
        let vote = Vote::new(UserId::from_string("alice").unwrap(), &target, VoteDirection::Down);

        let json = serde_json::to_value(&vote).unwrap();
        assert_eq!(json["direction"], "down");
        assert_eq!(json["target_kind"], "comment");
        assert_eq!(json["target_id"], target.id_string());

        let vote2: Vote = serde_json::from_value(json).unwrap();
        assert_eq!(vote, vote2);
    }

    #[test]
    fn test_is_for() {
        let alice = UserId::from_string("alice").unwrap();
        let bob = UserId::from_string("bob").unwrap();
        let post = PostId::new();
        let target = VoteTarget::Post(post.clone());
        let vote = Vote::new(alice.clone(), &target, VoteDirection::Up);

        assert!(vote.is_for(&alice, &target));
        assert!(!vote.is_for(&bob, &target));
        assert!(!vote.is_for(&alice, &VoteTarget::Comment(CommentId(post.0))));
    }
}
