//! Thread command
//!
//! Print a post with its comment tree.

use super::context::{parse_comment_id, parse_post_id, AppContext};
use super::post::format_age;
use super::GlobalArgs;
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use th_core::thread::{RenderSettings, ThreadRow, ThreadView};

/// Arguments for the thread command
#[derive(Debug, Args)]
pub struct ThreadArgs {
    /// Post ID
    pub post_id: String,

    /// Collapse the replies of this comment (repeatable)
    #[arg(long, value_name = "COMMENT_ID")]
    pub collapse: Vec<String>,

    /// Print the comment tree as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the thread command
pub fn execute(global: &GlobalArgs, args: ThreadArgs) -> Result<()> {
    use colored::Colorize;

    let ctx = AppContext::load(global)?;
    let thread = ctx.forum.load_thread(&parse_post_id(&args.post_id)?)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&thread)?);
        return Ok(());
    }

    let mut view = ThreadView::with_settings(RenderSettings::from(&ctx.config.thread));
    for id in &args.collapse {
        view.collapse(&thread.comments, &parse_comment_id(id)?)?;
    }

    let post = &thread.post;
    println!("{}", post.title.bold());
    println!(
        "c/{} · {} · {} points · {} comments",
        post.community,
        post.author,
        post.score(),
        thread.comment_count()
    );
    if !post.body.is_empty() {
        println!();
        println!("{}", post.body);
    }
    println!();

    let rows = view.render(&thread.comments);
    if rows.is_empty() {
        println!("{}", "No comments yet.".dimmed());
        return Ok(());
    }

    let now = Utc::now();
    for row in &rows {
        for line in format_row(row, ctx.config.ui.show_scores, now) {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Lines for one comment: a header with author and metadata, then the body
fn format_row(row: &ThreadRow, show_scores: bool, now: DateTime<Utc>) -> Vec<String> {
    let indent = row.indent_str();
    let marker = if row.collapsed {
        "[+]"
    } else if row.reply_count > 0 {
        "[-]"
    } else {
        " • "
    };

    let mut header = format!("{}{} {}", indent, marker, row.author);
    if show_scores {
        header.push_str(&format!(" · {} points", row.score));
    }
    header.push_str(&format!(" · {} · {}", format_age(row.created_at, now), row.id));
    if row.collapsed {
        header.push_str(&format!(" ({} hidden)", row.hidden_count));
    }

    let mut lines = vec![header];
    lines.extend(row.body.lines().map(|l| format!("{}    {}", indent, l)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use th_core::comment::{build_tree, CommentBuilder};
    use th_core::types::{PostId, UserId};

    #[test]
    fn test_format_rows() {
        let user = UserId::from_string("alice").unwrap();
        let post = PostId::new();
        let a = CommentBuilder::top_level(post, user.clone())
            .content("first")
            .build()
            .unwrap();
        let b = CommentBuilder::reply_to(&a, user.clone())
            .content("second\nline")
            .build()
            .unwrap();
        let a_id = a.id.clone();
        let b_id = b.id.clone();
        let now = b.created_at + Duration::hours(1);
        let tree = build_tree(vec![a, b]);

        let mut view = ThreadView::new();
        let rows = view.render(&tree);
        assert_eq!(
            format_row(&rows[0], true, now),
            vec![
                format!("[-] alice · 0 points · 1h ago · {}", a_id),
                "    first".to_string(),
            ]
        );
        assert_eq!(
            format_row(&rows[1], false, now),
            vec![
                format!("   •  alice · 1h ago · {}", b_id),
                "      second".to_string(),
                "      line".to_string(),
            ]
        );

        view.collapse(&tree, &a_id).unwrap();
        let rows = view.render(&tree);
        assert_eq!(rows.len(), 1);
        assert!(format_row(&rows[0], false, now)[0].ends_with("(1 hidden)"));
        assert!(format_row(&rows[0], false, now)[0].starts_with("[+] alice"));
    }
}
