//! Per-session thread view state and row flattening

use crate::comment::{find, CommentNode};
use crate::config::{ThreadConfig, MAX_DISPLAY_DEPTH};
use crate::error::{Result, ThreadHubError};
use crate::types::{CommentId, UserId};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// UI flags of a single comment; the two flags are independent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeState {
    /// Replies and the action row are hidden
    pub collapsed: bool,
    /// The reply form under this comment is open
    pub reply_open: bool,
}

impl NodeState {
    fn is_default(&self) -> bool {
        !self.collapsed && !self.reply_open
    }
}

/// Indentation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Nesting level past which indentation stops growing
    pub max_display_depth: u32,
    /// Columns per nesting level
    pub indent_width: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_display_depth: MAX_DISPLAY_DEPTH,
            indent_width: 2,
        }
    }
}

impl From<&ThreadConfig> for RenderSettings {
    fn from(config: &ThreadConfig) -> Self {
        Self {
            max_display_depth: config.max_display_depth,
            indent_width: config.indent_width,
        }
    }
}

/// One visible line of a rendered thread
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadRow {
    pub id: CommentId,
    pub author: UserId,
    /// Text to show ("[deleted]" for soft-deleted comments)
    pub body: String,
    pub deleted: bool,
    pub upvotes: u32,
    pub downvotes: u32,
    /// Net score
    pub score: i64,
    pub created_at: DateTime<Utc>,
    /// Position in the rebuilt tree, 0 for roots
    pub tree_depth: u32,
    /// Tree depth capped at the display limit
    pub display_depth: u32,
    /// Leading columns of indentation
    pub indent: usize,
    /// Depth recorded on the comment when it was created
    pub stored_depth: u32,
    /// Number of direct replies
    pub reply_count: usize,
    /// Comments hidden below this row because it is collapsed
    pub hidden_count: usize,
    pub collapsed: bool,
    /// Whether the vote/reply action row is shown
    pub show_actions: bool,
    pub reply_open: bool,
}

impl ThreadRow {
    /// Whitespace prefix for this row
    pub fn indent_str(&self) -> String {
        " ".repeat(self.indent)
    }
}

/// Collapse and reply state of one viewing session
#[derive(Debug, Clone, Default)]
pub struct ThreadView {
    states: HashMap<CommentId, NodeState>,
    settings: RenderSettings,
}

impl ThreadView {
    /// Create a view with default indentation settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a view with explicit settings
    pub fn with_settings(settings: RenderSettings) -> Self {
        Self {
            states: HashMap::new(),
            settings,
        }
    }

    /// Indentation settings in use
    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    /// Flags of a comment
    pub fn state(&self, id: &CommentId) -> NodeState {
        self.states.get(id).copied().unwrap_or_default()
    }

    /// Check if a comment is collapsed
    pub fn is_collapsed(&self, id: &CommentId) -> bool {
        self.state(id).collapsed
    }

    /// Check if a comment's reply form is open
    pub fn is_replying(&self, id: &CommentId) -> bool {
        self.state(id).reply_open
    }

    fn update(&mut self, id: &CommentId, f: impl FnOnce(&mut NodeState)) -> NodeState {
        let mut state = self.state(id);
        f(&mut state);
        if state.is_default() {
            self.states.remove(id);
        } else {
            self.states.insert(id.clone(), state);
        }
        state
    }

    /// Toggle the collapsed flag; returns whether the comment is now collapsed
    ///
    /// Only comments with at least one reply can be collapsed. Toggling a
    /// leaf leaves it expanded and returns `Ok(false)`.
    pub fn toggle_collapsed(&mut self, roots: &[CommentNode], id: &CommentId) -> Result<bool> {
        let node = find(roots, id).ok_or_else(|| ThreadHubError::CommentNotFound(id.to_string()))?;
        let can_collapse = node.has_replies();
        let state = self.update(id, |s| s.collapsed = can_collapse && !s.collapsed);
        Ok(state.collapsed)
    }

    /// Collapse a comment if it has replies; returns whether it is collapsed
    pub fn collapse(&mut self, roots: &[CommentNode], id: &CommentId) -> Result<bool> {
        let node = find(roots, id).ok_or_else(|| ThreadHubError::CommentNotFound(id.to_string()))?;
        let can_collapse = node.has_replies();
        let state = self.update(id, |s| s.collapsed = can_collapse);
        Ok(state.collapsed)
    }

    /// Expand every collapsed comment
    pub fn expand_all(&mut self) {
        self.states.retain(|_, s| {
            s.collapsed = false;
            !s.is_default()
        });
    }

    /// Toggle the reply form; returns whether it is now open
    pub fn toggle_reply(&mut self, id: &CommentId) -> bool {
        self.update(id, |s| s.reply_open = !s.reply_open).reply_open
    }

    /// Close the reply form of a comment
    pub fn close_reply(&mut self, id: &CommentId) {
        self.update(id, |s| s.reply_open = false);
    }

    /// Forget state of comments that are no longer in the tree
    pub fn retain_known(&mut self, roots: &[CommentNode]) {
        let mut known = HashSet::new();
        crate::comment::walk(roots, &mut |node, _| {
            known.insert(node.comment.id.clone());
        });
        self.states.retain(|id, _| known.contains(id));
    }

    /// Flatten the tree into visible rows, depth-first
    pub fn render(&self, roots: &[CommentNode]) -> Vec<ThreadRow> {
        let mut rows = Vec::new();
        self.render_into(roots, 0, &mut rows);
        rows
    }

    fn render_into(&self, nodes: &[CommentNode], level: u32, rows: &mut Vec<ThreadRow>) {
        for node in nodes {
            let state = self.state(&node.comment.id);
            let collapsed = state.collapsed && node.has_replies();
            let display_depth = level.min(self.settings.max_display_depth);
            let comment = &node.comment;

            rows.push(ThreadRow {
                id: comment.id.clone(),
                author: comment.author.clone(),
                body: comment.display_content().to_string(),
                deleted: comment.deleted,
                upvotes: comment.upvotes,
                downvotes: comment.downvotes,
                score: comment.score(),
                created_at: comment.created_at,
                tree_depth: level,
                display_depth,
                indent: display_depth as usize * self.settings.indent_width,
                stored_depth: comment.depth,
                reply_count: node.reply_count(),
                hidden_count: if collapsed { node.descendant_count() } else { 0 },
                collapsed,
                show_actions: !collapsed,
                reply_open: state.reply_open,
            });

            if !collapsed {
                self.render_into(&node.replies, level + 1, rows);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::{build_tree, Comment, CommentBuilder};
    use crate::types::PostId;
    use pretty_assertions::assert_eq;

    fn user() -> UserId {
        UserId::from_string("alice").unwrap()
    }

    /// A[B[C], D]
    fn sample() -> (Vec<CommentNode>, Vec<CommentId>) {
        let post = PostId::new();
        let a = CommentBuilder::top_level(post, user()).content("A").build().unwrap();
        let b = CommentBuilder::reply_to(&a, user()).content("B").build().unwrap();
        let c = CommentBuilder::reply_to(&b, user()).content("C").build().unwrap();
        let d = CommentBuilder::reply_to(&a, user()).content("D").build().unwrap();
        let ids = vec![a.id.clone(), b.id.clone(), c.id.clone(), d.id.clone()];
        (build_tree(vec![a, b, c, d]), ids)
    }

    fn bodies(rows: &[ThreadRow]) -> Vec<&str> {
        rows.iter().map(|r| r.body.as_str()).collect()
    }

    #[test]
    fn test_render_depth_first_with_indent() {
        let (tree, _) = sample();
        let rows = ThreadView::new().render(&tree);

        assert_eq!(bodies(&rows), vec!["A", "B", "C", "D"]);
        let indents: Vec<usize> = rows.iter().map(|r| r.indent).collect();
        assert_eq!(indents, vec![0, 2, 4, 2]);
        assert!(rows.iter().all(|r| r.show_actions));
        assert_eq!(rows[0].reply_count, 2);
    }

    #[test]
    fn test_collapse_hides_descendants_but_keeps_own_text() {
        let (tree, ids) = sample();
        let mut view = ThreadView::new();

        assert!(view.toggle_collapsed(&tree, &ids[0]).unwrap());
        let rows = view.render(&tree);
        assert_eq!(bodies(&rows), vec!["A"]);
        assert!(rows[0].collapsed);
        assert!(!rows[0].show_actions);
        assert_eq!(rows[0].hidden_count, 3);

        assert!(!view.toggle_collapsed(&tree, &ids[0]).unwrap());
        assert_eq!(view.render(&tree).len(), 4);
    }

    #[test]
    fn test_collapse_inner_node() {
        let (tree, ids) = sample();
        let mut view = ThreadView::new();
        view.toggle_collapsed(&tree, &ids[1]).unwrap();
        assert_eq!(bodies(&view.render(&tree)), vec!["A", "B", "D"]);
    }

    #[test]
    fn test_leaf_cannot_collapse() {
        let (tree, ids) = sample();
        let mut view = ThreadView::new();
        assert!(!view.toggle_collapsed(&tree, &ids[2]).unwrap());
        assert!(!view.is_collapsed(&ids[2]));
        assert!(view.render(&tree).iter().all(|r| !r.collapsed));
    }

    #[test]
    fn test_toggle_unknown_comment_fails() {
        let (tree, _) = sample();
        let mut view = ThreadView::new();
        assert!(view.toggle_collapsed(&tree, &CommentId::new()).is_err());
    }

    #[test]
    fn test_reply_and_collapse_are_independent() {
        let (tree, ids) = sample();
        let mut view = ThreadView::new();

        assert!(view.toggle_reply(&ids[0]));
        view.toggle_collapsed(&tree, &ids[0]).unwrap();
        assert_eq!(
            view.state(&ids[0]),
            NodeState {
                collapsed: true,
                reply_open: true
            }
        );

        view.toggle_collapsed(&tree, &ids[0]).unwrap();
        assert!(view.is_replying(&ids[0]));
        view.close_reply(&ids[0]);
        assert_eq!(view.state(&ids[0]), NodeState::default());
    }

    #[test]
    fn test_display_depth_is_capped() {
        let post = PostId::new();
        let mut chain: Vec<Comment> = Vec::new();
        let root = CommentBuilder::top_level(post, user()).content("0").build().unwrap();
        chain.push(root);
        for i in 1..12 {
            let parent = chain.last().unwrap().clone();
            let reply = CommentBuilder::reply_to(&parent, user())
                .content(i.to_string())
                .build()
                .unwrap();
            chain.push(reply);
        }

        let tree = build_tree(chain);
        let rows = ThreadView::new().render(&tree);
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[11].tree_depth, 11);
        assert_eq!(rows[11].display_depth, 8);
        assert_eq!(rows[11].indent, 16);
        assert_eq!(rows[11].stored_depth, 10);
        assert!(rows.iter().all(|r| r.display_depth <= 8));
    }

    #[test]
    fn test_deleted_comment_keeps_replies() {
        let post = PostId::new();
        let mut a = CommentBuilder::top_level(post, user()).content("secret").build().unwrap();
        let b = CommentBuilder::reply_to(&a, user()).content("reply").build().unwrap();
        a.deleted = true;

        let rows = ThreadView::new().render(&build_tree(vec![a, b]));
        assert_eq!(bodies(&rows), vec!["[deleted]", "reply"]);
    }

    #[test]
    fn test_retain_known_and_expand_all() {
        let (tree, ids) = sample();
        let mut view = ThreadView::new();
        view.toggle_collapsed(&tree, &ids[0]).unwrap();
        view.toggle_collapsed(&tree, &ids[1]).unwrap();
        let stray = CommentId::new();
        view.toggle_reply(&stray);

        view.retain_known(&tree);
        assert!(!view.is_replying(&stray));
        assert!(view.is_collapsed(&ids[0]));

        view.expand_all();
        assert!(!view.is_collapsed(&ids[0]));
        assert!(!view.is_collapsed(&ids[1]));
    }

    #[test]
    fn test_settings_from_config() {
        let config = ThreadConfig {
            indent_width: 4,
            max_display_depth: 1,
            ..Default::default()
        };
        let (tree, _) = sample();
        let rows = ThreadView::with_settings(RenderSettings::from(&config)).render(&tree);
        let indents: Vec<usize> = rows.iter().map(|r| r.indent).collect();
        assert_eq!(indents, vec![0, 4, 4, 4]);
    }
}
