//! Reply tree reconstruction
//!
//! Comments are stored flat with a parent pointer. The tree is rebuilt from
//! scratch on every read: an id -> index map over the flat list, one pass
//! that files each comment under its parent (or at the root), then an
//! assembly step that moves the comments into owned nodes.

use super::model::Comment;
use crate::types::CommentId;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// A comment together with its replies
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    /// Direct replies in chronological order
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    /// Create a node without replies
    pub fn leaf(comment: Comment) -> Self {
        Self {
            comment,
            replies: Vec::new(),
        }
    }

    /// Number of direct replies
    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }

    /// Number of comments below this one, at any depth
    pub fn descendant_count(&self) -> usize {
        self.replies
            .iter()
            .map(|r| 1 + r.descendant_count())
            .sum()
    }

    /// Check if this node has at least one reply
    pub fn has_replies(&self) -> bool {
        !self.replies.is_empty()
    }
}

/// Build the reply tree of one post
///
/// `comments` must be in ascending creation order; sibling order in the
/// output follows input order. A comment whose parent is not in the input
/// is promoted to the root level. Stored `depth` values are left untouched.
pub fn build_tree(comments: Vec<Comment>) -> Vec<CommentNode> {
    let count = comments.len();

    // First occurrence wins when ids collide
    let mut index: HashMap<CommentId, usize> = HashMap::with_capacity(count);
    for (i, comment) in comments.iter().enumerate() {
        index.entry(comment.id.clone()).or_insert(i);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut roots: Vec<usize> = Vec::new();
    for (i, comment) in comments.iter().enumerate() {
        match comment.parent_id.as_ref().and_then(|p| index.get(p)) {
            Some(&parent) if parent != i => children[parent].push(i),
            resolved => {
                if resolved.is_none() && comment.parent_id.is_some() {
                    debug!(
                        "Comment {} has no resolvable parent, promoting to root",
                        comment.id
                    );
                }
                roots.push(i);
            }
        }
    }

    let mut slots: Vec<Option<Comment>> = comments.into_iter().map(Some).collect();
    let mut tree: Vec<CommentNode> = roots
        .into_iter()
        .filter_map(|i| assemble(i, &mut slots, &children))
        .collect();

    // Anything left over sits on a parent cycle and is unreachable from the roots
    for i in 0..count {
        if slots[i].is_some() {
            if let Some(node) = assemble(i, &mut slots, &children) {
                warn!(
                    "Comment {} is part of a parent cycle, promoting to root",
                    node.comment.id
                );
                tree.push(node);
            }
        }
    }

    tree
}

fn assemble(
    i: usize,
    slots: &mut [Option<Comment>],
    children: &[Vec<usize>],
) -> Option<CommentNode> {
    let comment = slots[i].take()?;
    let replies = children[i]
        .iter()
        .filter_map(|&child| assemble(child, slots, children))
        .collect();
    Some(CommentNode { comment, replies })
}

/// Total number of comments in a forest
pub fn count_nodes(roots: &[CommentNode]) -> usize {
    roots.iter().map(|n| 1 + n.descendant_count()).sum()
}

/// Find a comment anywhere in the forest
pub fn find<'a>(roots: &'a [CommentNode], id: &CommentId) -> Option<&'a CommentNode> {
    for node in roots {
        if &node.comment.id == id {
            return Some(node);
        }
        if let Some(found) = find(&node.replies, id) {
            return Some(found);
        }
    }
    None
}

/// Visit every node depth-first, with its position in the tree (0 = root)
pub fn walk<'a>(roots: &'a [CommentNode], visit: &mut impl FnMut(&'a CommentNode, u32)) {
    fn go<'a>(nodes: &'a [CommentNode], level: u32, visit: &mut impl FnMut(&'a CommentNode, u32)) {
        for node in nodes {
            visit(node, level);
            go(&node.replies, level + 1, visit);
        }
    }
    go(roots, 0, visit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PostId, UserId};
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    struct Fixture {
        post: PostId,
        minute: i64,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                post: PostId::new(),
                minute: 0,
            }
        }

        fn comment(&mut self, content: &str, parent: Option<&Comment>) -> Comment {
            self.minute += 1;
            Comment {
                id: CommentId::new(),
                post_id: self.post.clone(),
                author: UserId::from_string("tester").unwrap(),
                content: content.to_string(),
                parent_id: parent.map(|p| p.id.clone()),
                upvotes: 0,
                downvotes: 0,
                depth: parent.map(|p| p.depth + 1).unwrap_or(0),
                deleted: false,
                created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
                    + Duration::minutes(self.minute),
            }
        }
    }

    /// Render the forest as "A[B[C],D]" for compact assertions
    fn shape(nodes: &[CommentNode]) -> String {
        nodes
            .iter()
            .map(|n| {
                if n.replies.is_empty() {
                    n.comment.content.clone()
                } else {
                    format!("{}[{}]", n.comment.content, shape(&n.replies))
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn test_nested_example() {
        let mut f = Fixture::new();
        let a = f.comment("A", None);
        let b = f.comment("B", Some(&a));
        let c = f.comment("C", Some(&b));
        let d = f.comment("D", Some(&a));

        let tree = build_tree(vec![a, b, c, d]);
        assert_eq!(shape(&tree), "A[B[C],D]");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].reply_count(), 2);
        assert_eq!(tree[0].descendant_count(), 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(Vec::new()).is_empty());
    }

    #[test]
    fn test_no_comment_lost_or_duplicated() {
        let mut f = Fixture::new();
        let a = f.comment("A", None);
        let b = f.comment("B", Some(&a));
        let c = f.comment("C", None);
        let d = f.comment("D", Some(&b));
        let e = f.comment("E", Some(&c));
        let g = f.comment("G", Some(&a));
        let input = vec![a, b, c, d, e, g];
        let ids: Vec<CommentId> = input.iter().map(|c| c.id.clone()).collect();

        let tree = build_tree(input);
        assert_eq!(count_nodes(&tree), ids.len());

        let mut seen = Vec::new();
        walk(&tree, &mut |node, _| seen.push(node.comment.id.clone()));
        for id in &ids {
            assert_eq!(seen.iter().filter(|s| *s == id).count(), 1);
        }
    }

    #[test]
    fn test_siblings_keep_input_order() {
        let mut f = Fixture::new();
        let root = f.comment("R", None);
        let first = f.comment("1", Some(&root));
        let other_root = f.comment("X", None);
        let second = f.comment("2", Some(&root));
        let third = f.comment("3", Some(&root));

        let tree = build_tree(vec![root, first, other_root, second, third]);
        assert_eq!(shape(&tree), "R[1,2,3],X");
    }

    #[test]
    fn test_missing_parent_is_promoted_to_root() {
        let mut f = Fixture::new();
        let gone = f.comment("gone", None);
        let a = f.comment("A", None);
        let orphan = f.comment("orphan", Some(&gone));
        let child = f.comment("child", Some(&orphan));

        let tree = build_tree(vec![a, orphan, child]);
        assert_eq!(shape(&tree), "A,orphan[child]");
        // stored depth is not rewritten
        assert_eq!(tree[1].comment.depth, 1);
    }

    #[test]
    fn test_reply_listed_before_its_parent_still_attaches() {
        let mut f = Fixture::new();
        let parent = f.comment("P", None);
        let reply = f.comment("R", Some(&parent));

        let tree = build_tree(vec![reply, parent]);
        assert_eq!(shape(&tree), "P[R]");
    }

    #[test]
    fn test_self_parent_becomes_root() {
        let mut f = Fixture::new();
        let mut odd = f.comment("self", None);
        odd.parent_id = Some(odd.id.clone());

        let tree = build_tree(vec![odd]);
        assert_eq!(shape(&tree), "self");
    }

    #[test]
    fn test_parent_cycle_is_broken_without_losing_comments() {
        let mut f = Fixture::new();
        let root = f.comment("root", None);
        let mut x = f.comment("x", None);
        let mut y = f.comment("y", None);
        x.parent_id = Some(y.id.clone());
        y.parent_id = Some(x.id.clone());

        let tree = build_tree(vec![root, x, y]);
        assert_eq!(shape(&tree), "root,x[y]");
        assert_eq!(count_nodes(&tree), 3);
    }

    #[test]
    fn test_duplicate_ids_are_all_kept() {
        let mut f = Fixture::new();
        let a = f.comment("A", None);
        let mut copy = f.comment("A2", None);
        copy.id = a.id.clone();
        let reply = f.comment("R", Some(&a));

        let tree = build_tree(vec![a, copy, reply]);
        assert_eq!(shape(&tree), "A[R],A2");
    }

    #[test]
    fn test_find_and_walk_levels() {
        let mut f = Fixture::new();
        let a = f.comment("A", None);
        let b = f.comment("B", Some(&a));
        let c = f.comment("C", Some(&b));
        let c_id = c.id.clone();

        let tree = build_tree(vec![a, b, c]);
        assert_eq!(find(&tree, &c_id).unwrap().comment.content, "C");
        assert!(find(&tree, &CommentId::new()).is_none());

        let mut levels = Vec::new();
        walk(&tree, &mut |node, level| levels.push((node.comment.content.clone(), level)));
        assert_eq!(
            levels,
            vec![("A".to_string(), 0), ("B".to_string(), 1), ("C".to_string(), 2)]
        );
    }
}
