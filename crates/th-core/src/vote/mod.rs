//! Voting on posts and comments

pub mod ledger;
pub mod model;

pub use ledger::{plan_vote, Tally, VoteAction, VoteOutcome};
pub use model::{TargetKind, Vote, VoteDirection, VoteTarget};
