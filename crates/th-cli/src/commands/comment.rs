//! Comment command
//!
//! Comment on posts, reply to comments, delete and search.

use super::context::{confirm, parse_comment_id, parse_post_id, AppContext};
use super::GlobalArgs;
use anyhow::Result;
use clap::Subcommand;

/// Comment subcommands
#[derive(Debug, Subcommand)]
pub enum CommentCommand {
    /// Add a top-level comment to a post
    Add {
        /// Post ID
        post_id: String,

        /// Comment text
        text: String,
    },

    /// Reply to a comment
    Reply {
        /// Parent comment ID
        comment_id: String,

        /// Reply text
        text: String,
    },

    /// Delete one of your comments (replies are kept)
    Delete {
        /// Comment ID
        comment_id: String,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Search the comments of a post
    Search {
        /// Post ID
        post_id: String,

        /// Search text
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the comment command
pub fn execute(global: &GlobalArgs, cmd: CommentCommand) -> Result<()> {
    use colored::Colorize;

    let ctx = AppContext::load(global)?;
    match cmd {
        CommentCommand::Add { post_id, text } => {
            let user = ctx.require_user()?;
            let comment = ctx.forum.comment(&user, &parse_post_id(&post_id)?, &text)?;
            println!("{} Created comment {}", "✓".green(), comment.id);
        }
        CommentCommand::Reply { comment_id, text } => {
            let user = ctx.require_user()?;
            let reply = ctx
                .forum
                .reply(&user, &parse_comment_id(&comment_id)?, &text)?;
            println!(
                "{} Created reply {} (depth {})",
                "✓".green(),
                reply.id,
                reply.depth
            );
        }
        CommentCommand::Delete { comment_id, yes } => {
            let user = ctx.require_user()?;
            let id = parse_comment_id(&comment_id)?;
            if !confirm("Delete this comment?", yes)? {
                println!("Delete cancelled.");
                return Ok(());
            }
            ctx.forum.delete_comment(&user, &id)?;
            println!("{} Deleted comment {}", "✓".green(), id);
        }
        CommentCommand::Search {
            post_id,
            query,
            json,
        } => {
            let matches = ctx.forum.search_comments(&parse_post_id(&post_id)?, &query)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else if matches.is_empty() {
                println!("{}", "No matching comments.".dimmed());
            } else {
                for comment in &matches {
                    println!(
                        "{} {} {}",
                        comment.author.to_string().cyan(),
                        comment.id.to_string().dimmed(),
                        comment.display_content()
                    );
                }
            }
        }
    }
    Ok(())
}
