//! Vote toggling rules
//!
//! At most one vote exists per (user, target). Voting again in the same
//! direction retracts the vote; voting the other way flips it in place.

use super::model::{Vote, VoteDirection};
use crate::types::VoteId;
use serde::{Deserialize, Serialize};

/// Store mutation needed to apply a vote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteAction {
    /// No vote yet: create one
    Create,
    /// Opposite vote exists: update its direction
    Switch { vote_id: VoteId, from: VoteDirection },
    /// Same vote exists: delete it
    Retract { vote_id: VoteId },
}

/// Decide what a vote submission does given the user's existing vote
pub fn plan_vote(existing: Option<&Vote>, direction: VoteDirection) -> VoteAction {
    match existing {
        None => VoteAction::Create,
        Some(vote) if vote.direction == direction => VoteAction::Retract {
            vote_id: vote.id.clone(),
        },
        Some(vote) => VoteAction::Switch {
            vote_id: vote.id.clone(),
            from: vote.direction,
        },
    }
}

/// Up/down counters of a post or comment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub upvotes: u32,
    pub downvotes: u32,
}

impl Tally {
    /// Net score, not clamped
    pub fn net(&self) -> i64 {
        i64::from(self.upvotes) - i64::from(self.downvotes)
    }

    /// Counters after applying `action` for a vote in `direction`
    ///
    /// Counters saturate at zero; a stale counter is never driven negative.
    pub fn apply(self, action: &VoteAction, direction: VoteDirection) -> Tally {
        let mut next = self;
        match action {
            VoteAction::Create => next.bump(direction),
            VoteAction::Switch { from, .. } => {
                next.drop_one(*from);
                next.bump(direction);
            }
            VoteAction::Retract { .. } => next.drop_one(direction),
        }
        next
    }

    fn bump(&mut self, direction: VoteDirection) {
        match direction {
            VoteDirection::Up => self.upvotes = self.upvotes.saturating_add(1),
            VoteDirection::Down => self.downvotes = self.downvotes.saturating_add(1),
        }
    }

    fn drop_one(&mut self, direction: VoteDirection) {
        match direction {
            VoteDirection::Up => self.upvotes = self.upvotes.saturating_sub(1),
            VoteDirection::Down => self.downvotes = self.downvotes.saturating_sub(1),
        }
    }
}

/// Result of a vote submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    /// What was done to the vote record
    pub action: VoteAction,
    /// Target counters after the vote
    pub tally: Tally,
    /// The user's vote after the submission, None when retracted
    pub user_vote: Option<VoteDirection>,
}
