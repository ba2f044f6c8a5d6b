//! Forum service for posts, comments and votes

use super::thread::Thread;
use crate::comment::{build_tree, Comment, CommentBuilder, CommentValidator};
use crate::config::Config;
use crate::error::{Result, ThreadHubError};
use crate::post::{rank_posts, search_comments, search_posts, FeedSort, NewPost, Post};
use crate::store::{Document, Query, RecordStore, RecordStoreExt};
use crate::types::{CommentId, PostId, UserId};
use crate::vote::{plan_vote, Tally, Vote, VoteAction, VoteDirection, VoteOutcome, VoteTarget};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Service for forum reads and mutations
pub struct ForumService {
    /// Storage backend
    store: Arc<dyn RecordStore>,
    /// Loaded configuration
    config: Config,
}

impl ForumService {
    /// Create a new service with the given store
    pub fn new(store: impl RecordStore + 'static, config: Config) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Create a new service with a shared store
    pub fn with_store(store: Arc<dyn RecordStore>, config: Config) -> Self {
        Self { store, config }
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get access to the underlying store
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    // ----- posts -----

    /// Create a post
    pub fn create_post(&self, author: &UserId, new_post: NewPost) -> Result<Post> {
        let post = new_post.into_post(author.clone())?;
        let post = self
            .store
            .insert(&post)
            .inspect_err(|e| warn!("Failed to create post: {}", e))?;
        info!("Created post {} in {}", post.id, post.community);
        Ok(post)
    }

    /// Upload an image and return its public URL
    pub fn upload_image(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        let url = self
            .store
            .upload(file_name, bytes)
            .inspect_err(|e| warn!("Failed to upload {}: {}", file_name, e))?;
        debug!("Uploaded {} ({} bytes) to {}", file_name, bytes.len(), url);
        Ok(url)
    }

    /// Load a post by id
    pub fn get_post(&self, id: &PostId) -> Result<Post> {
        self.store
            .find::<Post>(&id.to_string())?
            .ok_or_else(|| ThreadHubError::PostNotFound(id.to_string()))
    }

    /// List live posts ranked by `sort` (config default when None)
    pub fn list_posts(
        &self,
        sort: Option<FeedSort>,
        limit: Option<usize>,
        community: Option<&str>,
    ) -> Result<Vec<Post>> {
        let mut query = Query::new().eq("deleted", false);
        if let Some(community) = community {
            query = query.eq("community", community.trim().to_lowercase());
        }

        let mut posts = self.store.fetch::<Post>(&query)?;
        let sort = sort.unwrap_or(self.config.feed.default_sort);
        rank_posts(&mut posts, sort, Utc::now(), self.config.feed.hot_gravity);
        posts.truncate(limit.unwrap_or(self.config.feed.page_size));
        Ok(posts)
    }

    /// Search live posts by title, body or community
    pub fn search_posts(&self, query: &str) -> Result<Vec<Post>> {
        let posts = self.store.fetch::<Post>(&Query::new().order_desc("created_at"))?;
        Ok(search_posts(&posts, query).into_iter().cloned().collect())
    }

    /// Soft-delete a post; only its author may do so
    pub fn delete_post(&self, user: &UserId, id: &PostId) -> Result<Post> {
        let post = self.get_post(id)?;
        if &post.author != user {
            warn!("{} tried to delete post {} owned by {}", user, id, post.author);
            return Err(ThreadHubError::PermissionDenied(format!(
                "only {} can delete post {}",
                post.author, id
            )));
        }
        let post: Post = self.store.patch(&id.to_string(), flag_deleted())?;
        info!("Deleted post {}", id);
        Ok(post)
    }

    // ----- comments -----

    /// Load a post with its full comment tree
    pub fn load_thread(&self, post_id: &PostId) -> Result<Thread> {
        let post = self.get_post(post_id)?;
        let query = Query::new()
            .eq("post_id", post_id.to_string())
            .order_asc("created_at");
        let comments = self.store.fetch::<Comment>(&query)?;
        debug!("Loaded {} comments for post {}", comments.len(), post_id);

        Ok(Thread {
            post,
            comments: build_tree(comments),
        })
    }

    /// Load a comment by id
    pub fn get_comment(&self, id: &CommentId) -> Result<Comment> {
        self.store
            .find::<Comment>(&id.to_string())?
            .ok_or_else(|| ThreadHubError::CommentNotFound(id.to_string()))
    }

    /// Post a top-level comment
    pub fn comment(&self, author: &UserId, post_id: &PostId, content: &str) -> Result<Comment> {
        let post = self.open_post(post_id)?;
        let comment = CommentBuilder::top_level(post.id.clone(), author.clone())
            .content(content)
            .build()?;
        self.store_comment(comment)
    }

    /// Reply to an existing comment
    pub fn reply(&self, author: &UserId, parent_id: &CommentId, content: &str) -> Result<Comment> {
        let parent = self.get_comment(parent_id)?;
        self.open_post(&parent.post_id)?;
        let comment = CommentBuilder::reply_to(&parent, author.clone())
            .content(content)
            .max_depth(self.config.thread.max_reply_depth)
            .build()
            .inspect_err(|e| warn!("Rejected reply to {}: {}", parent_id, e))?;
        self.store_comment(comment)
    }

    /// A post that still accepts comments
    fn open_post(&self, post_id: &PostId) -> Result<Post> {
        let post = self.get_post(post_id)?;
        if post.deleted {
            return Err(ThreadHubError::Validation(format!(
                "Cannot comment on deleted post {}",
                post_id
            )));
        }
        Ok(post)
    }

    fn store_comment(&self, comment: Comment) -> Result<Comment> {
        CommentValidator::with_max_length(self.config.thread.max_comment_length)
            .validate(&comment)?;

        let comment = self
            .store
            .insert(&comment)
            .inspect_err(|e| warn!("Failed to store comment: {}", e))?;
        info!(
            "Created comment {} on post {} at depth {}",
            comment.id, comment.post_id, comment.depth
        );

        self.bump_comment_count(&comment.post_id)
            .map_err(|e| e.with_context(format!("comment {} stored", comment.id)))?;
        Ok(comment)
    }

    fn bump_comment_count(&self, post_id: &PostId) -> Result<()> {
        let post = self.get_post(post_id)?;
        let mut patch = Document::new();
        patch.insert(
            "comment_count".to_string(),
            json!(post.comment_count.saturating_add(1)),
        );
        self.store
            .patch::<Post>(&post_id.to_string(), patch)
            .inspect_err(|e| warn!("Failed to update comment count of {}: {}", post_id, e))?;
        Ok(())
    }

    /// Soft-delete a comment; only its author may do so
    ///
    /// The content stays in the store and replies stay attached.
    pub fn delete_comment(&self, user: &UserId, id: &CommentId) -> Result<Comment> {
        let comment = self.get_comment(id)?;
        if &comment.author != user {
            warn!("{} tried to delete comment {} owned by {}", user, id, comment.author);
            return Err(ThreadHubError::PermissionDenied(format!(
                "only {} can delete comment {}",
                comment.author, id
            )));
        }
        let comment: Comment = self.store.patch(&id.to_string(), flag_deleted())?;
        info!("Deleted comment {}", id);
        Ok(comment)
    }

    /// Search live comments of a post by content or author
    pub fn search_comments(&self, post_id: &PostId, query: &str) -> Result<Vec<Comment>> {
        let comments = self.store.fetch::<Comment>(
            &Query::new()
                .eq("post_id", post_id.to_string())
                .order_asc("created_at"),
        )?;
        Ok(search_comments(&comments, query).into_iter().cloned().collect())
    }

    // ----- votes -----

    /// The user's current vote on a target
    pub fn user_vote(&self, user: &UserId, target: &VoteTarget) -> Result<Option<Vote>> {
        let query = Query::new()
            .eq("user_id", user.as_str())
            .eq("target_id", target.id_string())
            .eq("target_kind", target.kind().to_string());
        Ok(self
            .store
            .fetch::<Vote>(&query)?
            .into_iter()
            .find(|v| v.is_for(user, target)))
    }

    /// Submit a vote
    ///
    /// Voting again in the same direction retracts the vote, voting the other
    /// way switches it. The target's counters are read, adjusted and written
    /// back without any compare-and-swap.
    pub fn vote(
        &self,
        user: &UserId,
        target: &VoteTarget,
        direction: VoteDirection,
    ) -> Result<VoteOutcome> {
        let current = self.target_tally(target)?;
        let existing = self.user_vote(user, target)?;
        let action = plan_vote(existing.as_ref(), direction);

        let result = match &action {
            VoteAction::Create => self
                .store
                .insert(&Vote::new(user.clone(), target, direction))
                .map(|_| ()),
            VoteAction::Switch { vote_id, .. } => {
                let mut patch = Document::new();
                patch.insert("direction".to_string(), json!(direction));
                self.store.patch::<Vote>(&vote_id.to_string(), patch).map(|_| ())
            }
            VoteAction::Retract { vote_id } => self.store.remove::<Vote>(&vote_id.to_string()),
        };
        result.inspect_err(|e| warn!("Failed to record vote on {}: {}", target, e))?;

        let tally = current.apply(&action, direction);
        self.write_tally(target, tally)
            .inspect_err(|e| warn!("Failed to update counters of {}: {}", target, e))?;

        let user_vote = match action {
            VoteAction::Retract { .. } => None,
            _ => Some(direction),
        };
        info!("{} voted {} on {} (net {})", user, direction, target, tally.net());

        Ok(VoteOutcome {
            action,
            tally,
            user_vote,
        })
    }

    /// Current counters of a live target; deleted posts and comments take no votes
    fn target_tally(&self, target: &VoteTarget) -> Result<Tally> {
        let (tally, deleted) = match target {
            VoteTarget::Post(id) => {
                let post = self.get_post(id)?;
                (post.tally(), post.deleted)
            }
            VoteTarget::Comment(id) => {
                let comment = self.get_comment(id)?;
                (comment.tally(), comment.deleted)
            }
        };
        if deleted {
            return Err(ThreadHubError::Validation(format!(
                "Cannot vote on deleted {}",
                target
            )));
        }
        Ok(tally)
    }

    fn write_tally(&self, target: &VoteTarget, tally: Tally) -> Result<()> {
        let mut patch = Document::new();
        patch.insert("upvotes".to_string(), json!(tally.upvotes));
        patch.insert("downvotes".to_string(), json!(tally.downvotes));
        let id = target.id_string();
        match target {
            VoteTarget::Post(_) => self.store.patch::<Post>(&id, patch).map(|_| ()),
            VoteTarget::Comment(_) => self.store.patch::<Comment>(&id, patch).map(|_| ()),
        }
    }
}

fn flag_deleted() -> Document {
    let mut patch = Document::new();
    patch.insert("deleted".to_string(), json!(true));
    patch
}
