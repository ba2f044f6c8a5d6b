//! Markdown exporter for threads

use super::exporter::Exporter;
use crate::comment::CommentNode;
use crate::config::MAX_DISPLAY_DEPTH;
use crate::error::Result;
use crate::forum::Thread;

/// Markdown exporter
///
/// Replies are nested as blockquotes, one `>` per level, capped at the
/// display depth.
pub struct MarkdownExporter {
    /// Include the post body
    include_body: bool,
    /// Include vote scores
    include_scores: bool,
    /// Blockquote nesting cap
    max_depth: u32,
}

impl MarkdownExporter {
    /// Create a new Markdown exporter with default settings
    pub fn new() -> Self {
        Self {
            include_body: true,
            include_scores: true,
            max_depth: MAX_DISPLAY_DEPTH,
        }
    }

    /// Set whether to include the post body
    pub fn with_body(mut self, include: bool) -> Self {
        self.include_body = include;
        self
    }

    /// Set whether to include scores
    pub fn with_scores(mut self, include: bool) -> Self {
        self.include_scores = include;
        self
    }

    /// Set the nesting cap
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    fn render_header(&self, thread: &Thread) -> String {
        let post = &thread.post;
        let mut header = String::new();

        if post.deleted {
            header.push_str("# [deleted]\n\n");
        } else {
            header.push_str(&format!("# {}\n\n", post.title));
        }

        header.push_str(&format!("**Community:** {}\n", post.community));
        header.push_str(&format!("**Author:** {}\n", post.author));
        header.push_str(&format!(
            "**Posted:** {}\n",
            post.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        if self.include_scores {
            header.push_str(&format!("**Score:** {}\n", post.score()));
        }
        if let Some(ref url) = post.image_url {
            header.push_str(&format!("\n![image]({})\n", url));
        }
        header.push('\n');

        if self.include_body && !post.deleted && !post.body.trim().is_empty() {
            header.push_str(post.body.trim_end());
            header.push_str("\n\n");
        }

        header
    }

    fn render_node(&self, node: &CommentNode, level: u32, out: &mut String) {
        let comment = &node.comment;
        let prefix = ">".repeat(level.min(self.max_depth) as usize + 1);

        let mut meta = format!("**{}**", comment.author);
        if self.include_scores {
            let points = comment.score();
            let unit = if points.abs() == 1 { "point" } else { "points" };
            meta.push_str(&format!(" · {} {}", points, unit));
        }
        meta.push_str(&format!(" · {}", comment.created_at.format("%Y-%m-%d %H:%M")));

        out.push_str(&format!("{} {}\n", prefix, meta));
        out.push_str(&format!("{}\n", prefix));
        for line in comment.display_content().lines() {
            out.push_str(&format!("{} {}\n", prefix, line));
        }
        out.push('\n');

        for reply in &node.replies {
            self.render_node(reply, level + 1, out);
        }
    }
}

impl Default for MarkdownExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for MarkdownExporter {
    fn export(&self, thread: &Thread) -> Result<String> {
        let mut output = self.render_header(thread);

        output.push_str(&format!("## Comments ({})\n\n", thread.comment_count()));
        if thread.is_empty() {
            output.push_str("_No comments yet._\n");
        }
        for node in &thread.comments {
            self.render_node(node, 0, &mut output);
        }

        Ok(output)
    }

    fn format_name(&self) -> &str {
        "markdown"
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}
