//! Post command
//!
//! Create, list, show, search and delete posts.

use super::context::{confirm, parse_post_id, AppContext};
use super::GlobalArgs;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use std::path::PathBuf;
use th_core::post::{FeedSort, NewPost, Post};

/// Post subcommands
#[derive(Debug, Subcommand)]
pub enum PostCommand {
    /// Create a new post
    Create {
        /// Post title
        #[arg(long, short)]
        title: String,

        /// Post body
        #[arg(long, short, default_value = "")]
        body: String,

        /// Community to post in
        #[arg(long)]
        community: Option<String>,

        /// Image file to upload and attach
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// List posts in feed order
    List {
        /// Sort order: hot, new or top (config default when omitted)
        #[arg(long, short)]
        sort: Option<FeedSort>,

        /// Maximum number of posts
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        /// Only posts from this community
        #[arg(long)]
        community: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one post
    Show {
        /// Post ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search posts by title, body or community
    Search {
        /// Search text
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete one of your posts
    Delete {
        /// Post ID
        id: String,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

/// Execute the post command
pub fn execute(global: &GlobalArgs, cmd: PostCommand) -> Result<()> {
    let ctx = AppContext::load(global)?;
    match cmd {
        PostCommand::Create {
            title,
            body,
            community,
            image,
        } => create_post(&ctx, title, body, community, image),
        PostCommand::List {
            sort,
            limit,
            community,
            json,
        } => {
            let posts = ctx.forum.list_posts(sort, limit, community.as_deref())?;
            print_posts(&posts, json)
        }
        PostCommand::Show { id, json } => {
            let post = ctx.forum.get_post(&parse_post_id(&id)?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&post)?);
            } else {
                print_post(&post);
            }
            Ok(())
        }
        PostCommand::Search { query, json } => {
            let posts = ctx.forum.search_posts(&query)?;
            print_posts(&posts, json)
        }
        PostCommand::Delete { id, yes } => delete_post(&ctx, &id, yes),
    }
}

fn create_post(
    ctx: &AppContext,
    title: String,
    body: String,
    community: Option<String>,
    image: Option<PathBuf>,
) -> Result<()> {
    use colored::Colorize;

    let user = ctx.require_user()?;

    let image_url = match image {
        Some(path) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read image {}", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            Some(ctx.forum.upload_image(&name, &bytes)?)
        }
        None => None,
    };

    let post = ctx.forum.create_post(
        &user,
        NewPost {
            title,
            body,
            community,
            image_url,
        },
    )?;

    println!("{} Created post {}", "✓".green(), post.id);
    Ok(())
}

fn delete_post(ctx: &AppContext, id: &str, yes: bool) -> Result<()> {
    use colored::Colorize;

    let user = ctx.require_user()?;
    let id = parse_post_id(id)?;
    let post = ctx.forum.get_post(&id)?;

    if !confirm(&format!("Delete post \"{}\"?", post.title), yes)? {
        println!("Delete cancelled.");
        return Ok(());
    }

    ctx.forum.delete_post(&user, &id)?;
    println!("{} Deleted post {}", "✓".green(), id);
    Ok(())
}

fn print_posts(posts: &[Post], as_json: bool) -> Result<()> {
    use colored::Colorize;

    if as_json {
        println!("{}", serde_json::to_string_pretty(posts)?);
        return Ok(());
    }

    if posts.is_empty() {
        println!("{}", "No posts.".dimmed());
        return Ok(());
    }

    let now = Utc::now();
    for post in posts {
        println!("{}", feed_line(post, now));
        println!("       {}", post.id.to_string().dimmed());
    }
    Ok(())
}

fn print_post(post: &Post) {
    use colored::Colorize;

    println!("{}", post.title.bold());
    println!(
        "c/{} · {} · {} points · {} comments",
        post.community,
        post.author,
        post.score(),
        post.comment_count
    );
    if let Some(url) = &post.image_url {
        println!("image: {}", url.cyan());
    }
    if !post.body.is_empty() {
        println!();
        println!("{}", post.body);
    }
}

/// One feed entry: score, title, community, author, age and comment count
fn feed_line(post: &Post, now: DateTime<Utc>) -> String {
    format!(
        "{:>5}  {}  (c/{} · {} · {} · {} comments)",
        post.score(),
        post.title,
        post.community,
        post.author,
        format_age(post.created_at, now),
        post.comment_count
    )
}

/// Short relative age: "5m ago", "3h ago", "2d ago"
pub(crate) fn format_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(created_at);
    if age.num_minutes() < 1 {
        "just now".to_string()
    } else if age.num_hours() < 1 {
        format!("{}m ago", age.num_minutes())
    } else if age.num_days() < 1 {
        format!("{}h ago", age.num_hours())
    } else {
        format!("{}d ago", age.num_days())
    }
}
