//! Vote command

use super::context::{parse_comment_id, parse_post_id, AppContext};
use super::GlobalArgs;
use anyhow::Result;
use clap::{Args, ValueEnum};
use th_core::vote::{VoteAction, VoteDirection, VoteOutcome, VoteTarget};

/// Vote direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    Up,
    Down,
}

impl From<Direction> for VoteDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => VoteDirection::Up,
            Direction::Down => VoteDirection::Down,
        }
    }
}

/// What is being voted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Post,
    Comment,
}

/// Arguments for the vote command
#[derive(Debug, Args)]
pub struct VoteArgs {
    /// up or down
    #[arg(value_enum)]
    pub direction: Direction,

    /// post or comment
    #[arg(value_enum)]
    pub kind: Kind,

    /// ID of the post or comment
    pub id: String,
}

/// Execute the vote command
pub fn execute(global: &GlobalArgs, args: VoteArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let user = ctx.require_user()?;

    let target = match args.kind {
        Kind::Post => VoteTarget::Post(parse_post_id(&args.id)?),
        Kind::Comment => VoteTarget::Comment(parse_comment_id(&args.id)?),
    };

    let outcome = ctx.forum.vote(&user, &target, args.direction.into())?;
    println!("{}", describe(&outcome));
    Ok(())
}

fn describe(outcome: &VoteOutcome) -> String {
    use colored::Colorize;

    let verb = match &outcome.action {
        VoteAction::Create => "Voted",
        VoteAction::Switch { .. } => "Changed vote",
        VoteAction::Retract { .. } => "Removed vote",
    };
    let current = match outcome.user_vote {
        Some(direction) => format!(" {}", direction.arrow()),
        None => String::new(),
    };
    format!(
        "{} {}{} · score {} (▲{} ▼{})",
        "✓".green(),
        verb,
        current,
        outcome.tally.net(),
        outcome.tally.upvotes,
        outcome.tally.downvotes
    )
}
