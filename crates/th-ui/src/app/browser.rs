//! Thread browser state machine
//!
//! Holds the loaded thread, the per-session [`ThreadView`] and the flattened
//! rows. Every mutation goes through the [`ForumService`] and is followed by
//! a full reload; failures end up in the status message and leave the
//! displayed thread unchanged.

use super::state::{AppMode, AppState};
use crate::events::{action_for, Action};
use anyhow::{Context, Result};
use crossterm::event::KeyEvent;
use std::sync::Arc;
use th_core::forum::{ForumService, Thread};
use th_core::thread::{RenderSettings, ThreadRow, ThreadView};
use th_core::types::{CommentId, PostId, UserId};
use th_core::vote::{VoteDirection, VoteTarget};
use tracing::{debug, warn};

/// Interactive state of one thread
pub struct ThreadBrowser {
    forum: Arc<ForumService>,
    user: Option<UserId>,
    thread: Thread,
    view: ThreadView,
    rows: Vec<ThreadRow>,
    /// Mode, cursor, editor and status message
    pub state: AppState,
}

impl ThreadBrowser {
    /// Load a thread and start browsing it
    pub fn open(forum: Arc<ForumService>, post_id: PostId, user: Option<UserId>) -> Result<Self> {
        let thread = forum
            .load_thread(&post_id)
            .with_context(|| format!("Failed to load post {}", post_id))?;
        let view = ThreadView::with_settings(RenderSettings::from(&forum.config().thread));
        let rows = view.render(&thread.comments);

        let mut state = AppState::new();
        if user.is_none() {
            state.set_message("Read-only: no user configured");
        }

        Ok(Self {
            forum,
            user,
            thread,
            view,
            rows,
            state,
        })
    }

    /// Loaded thread
    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    /// Visible rows
    pub fn rows(&self) -> &[ThreadRow] {
        &self.rows
    }

    /// Signed-in user, if any
    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    /// Whether scores are shown
    pub fn show_scores(&self) -> bool {
        self.forum.config().ui.show_scores
    }

    /// Row under the cursor
    pub fn selected(&self) -> Option<&ThreadRow> {
        self.rows.get(self.state.cursor)
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(action) = action_for(self.state.mode, key) {
            self.apply(action);
        }
    }

    /// Perform an action
    pub fn apply(&mut self, action: Action) {
        if self.state.mode == AppMode::Normal && action != Action::Quit {
            self.state.clear_message();
        }

        match action {
            Action::Quit => self.state.should_quit = true,
            Action::Help => self.state.mode = AppMode::Help,
            Action::Dismiss => self.state.mode = AppMode::Normal,

            Action::MoveDown => {
                if self.state.cursor + 1 < self.rows.len() {
                    self.state.cursor += 1;
                }
            }
            Action::MoveUp => self.state.cursor = self.state.cursor.saturating_sub(1),
            Action::Top => self.state.cursor = 0,
            Action::Bottom => self.state.cursor = self.rows.len().saturating_sub(1),

            Action::ToggleCollapse => self.toggle_collapse(),
            Action::Reply => self.toggle_reply(),
            Action::Comment => {
                if self.require_user().is_some() {
                    self.state.open_editor(None);
                }
            }
            Action::Vote(direction) => self.vote(direction),
            Action::Delete => self.delete(),
            Action::Reload => match self.reload() {
                Ok(()) => self.state.set_message("Reloaded"),
                Err(e) => self.fail(e),
            },

            Action::Insert(c) => self.state.insert_char(c),
            Action::Backspace => self.state.backspace(),
            Action::CursorLeft => self.state.cursor_left(),
            Action::CursorRight => self.state.cursor_right(),
            Action::Submit => self.submit(),
            Action::Cancel => self.cancel_editor(),
        }
    }

    /// Reload the thread from the store, keeping the cursor on the same comment
    pub fn reload(&mut self) -> Result<()> {
        let selected = self.selected().map(|r| r.id.clone());
        self.thread = self
            .forum
            .load_thread(&self.thread.post.id)
            .context("Failed to reload thread")?;
        self.view.retain_known(&self.thread.comments);
        self.rerender(selected.as_ref());
        debug!("Reloaded thread with {} rows", self.rows.len());
        Ok(())
    }

    fn rerender(&mut self, keep: Option<&CommentId>) {
        self.rows = self.view.render(&self.thread.comments);
        if let Some(id) = keep {
            if let Some(index) = self.rows.iter().position(|r| &r.id == id) {
                self.state.cursor = index;
                return;
            }
        }
        self.state.cursor = self.state.cursor.min(self.rows.len().saturating_sub(1));
    }

    fn fail(&mut self, error: anyhow::Error) {
        warn!("{:#}", error);
        self.state.set_message(format!("Error: {:#}", error));
    }

    fn require_user(&mut self) -> Option<UserId> {
        if self.user.is_none() {
            self.state
                .set_message("Not signed in: pass --as <user> or set identity.user");
        }
        self.user.clone()
    }

    fn selected_id(&mut self) -> Option<CommentId> {
        let id = self.selected().map(|r| r.id.clone());
        if id.is_none() {
            self.state.set_message("No comment selected");
        }
        id
    }

    fn toggle_collapse(&mut self) {
        let Some(id) = self.selected_id() else { return };
        match self.view.toggle_collapsed(&self.thread.comments, &id) {
            Ok(true) => {
                self.rerender(Some(&id));
                let hidden = self.selected().map(|r| r.hidden_count).unwrap_or(0);
                self.state.set_message(format!("Collapsed {} replies", hidden));
            }
            Ok(false) => {
                let had_replies = self.selected().map(|r| r.reply_count > 0).unwrap_or(false);
                self.rerender(Some(&id));
                if !had_replies {
                    self.state.set_message("No replies to collapse");
                }
            }
            Err(e) => self.fail(e.into()),
        }
    }

    fn toggle_reply(&mut self) {
        let Some(id) = self.selected_id() else { return };
        if self.require_user().is_none() {
            return;
        }
        if self.selected().map(|r| r.deleted).unwrap_or(false) {
            self.state.set_message("Cannot reply to a deleted comment");
            return;
        }

        if self.view.toggle_reply(&id) {
            self.state.open_editor(Some(id.clone()));
        } else {
            self.state.close_editor();
        }
        self.rerender(Some(&id));
    }

    fn cancel_editor(&mut self) {
        if let Some(id) = self.state.reply_target.clone() {
            self.view.close_reply(&id);
            self.rerender(Some(&id));
        }
        self.state.close_editor();
    }

    fn submit(&mut self) {
        let content = self.state.editor_content.trim().to_string();
        if content.is_empty() {
            self.cancel_editor();
            return;
        }
        let Some(user) = self.require_user() else { return };

        let result = match self.state.reply_target.clone() {
            Some(parent) => self.forum.reply(&user, &parent, &content),
            None => self.forum.comment(&user, &self.thread.post.id, &content),
        };

        match result {
            Ok(comment) => {
                self.cancel_editor();
                if let Err(e) = self.reload() {
                    self.fail(e);
                    return;
                }
                if let Some(index) = self.rows.iter().position(|r| r.id == comment.id) {
                    self.state.cursor = index;
                }
                self.state.set_message("Comment posted");
            }
            // editor stays open so the text is not lost
            Err(e) => self.fail(anyhow::Error::new(e).context("Failed to post comment")),
        }
    }

    fn vote(&mut self, direction: VoteDirection) {
        let Some(id) = self.selected_id() else { return };
        let Some(user) = self.require_user() else { return };

        match self.forum.vote(&user, &VoteTarget::Comment(id), direction) {
            Ok(outcome) => {
                if let Err(e) = self.reload() {
                    self.fail(e);
                    return;
                }
                let message = match outcome.user_vote {
                    Some(d) => format!("Voted {} (score {})", d.arrow(), outcome.tally.net()),
                    None => format!("Vote removed (score {})", outcome.tally.net()),
                };
                self.state.set_message(message);
            }
            Err(e) => self.fail(anyhow::Error::new(e).context("Vote failed")),
        }
    }

    fn delete(&mut self) {
        let Some(id) = self.selected_id() else { return };
        let Some(user) = self.require_user() else { return };

        match self.forum.delete_comment(&user, &id) {
            Ok(_) => match self.reload() {
                Ok(()) => self.state.set_message("Comment deleted"),
                Err(e) => self.fail(e),
            },
            Err(e) => self.fail(anyhow::Error::new(e).context("Delete failed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use th_core::config::Config;
    use th_core::post::NewPost;
    use th_core::store::MemoryStore;

    struct Fixture {
        forum: Arc<ForumService>,
        post: PostId,
        alice: UserId,
        ids: Vec<CommentId>,
    }

    /// A[B[C], D] on one post
    fn fixture() -> Fixture {
        let forum = Arc::new(ForumService::new(MemoryStore::new(), Config::default()));
        let alice = UserId::from_string("alice").unwrap();
        let post = forum
            .create_post(
                &alice,
                NewPost {
                    title: "Thread".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();

        let a = forum.comment(&alice, &post.id, "A").unwrap();
        let b = forum.reply(&alice, &a.id, "B").unwrap();
        let c = forum.reply(&alice, &b.id, "C").unwrap();
        let d = forum.reply(&alice, &a.id, "D").unwrap();

        Fixture {
            forum,
            post: post.id,
            alice,
            ids: vec![a.id, b.id, c.id, d.id],
        }
    }

    fn browser(f: &Fixture) -> ThreadBrowser {
        ThreadBrowser::open(f.forum.clone(), f.post.clone(), Some(f.alice.clone())).unwrap()
    }

    fn bodies(b: &ThreadBrowser) -> Vec<String> {
        b.rows().iter().map(|r| r.body.clone()).collect()
    }

    fn type_text(b: &mut ThreadBrowser, text: &str) {
        for c in text.chars() {
            b.apply(Action::Insert(c));
        }
    }

    #[test]
    fn test_open_renders_rows() {
        let f = fixture();
        let b = browser(&f);
        assert_eq!(bodies(&b), vec!["A", "B", "C", "D"]);
        assert_eq!(b.selected().unwrap().id, f.ids[0]);
    }

    #[test]
    fn test_cursor_movement_is_clamped() {
        let f = fixture();
        let mut b = browser(&f);
        b.apply(Action::MoveUp);
        assert_eq!(b.state.cursor, 0);
        b.apply(Action::Bottom);
        assert_eq!(b.state.cursor, 3);
        b.apply(Action::MoveDown);
        assert_eq!(b.state.cursor, 3);
        b.apply(Action::Top);
        assert_eq!(b.state.cursor, 0);
    }

    #[test]
    fn test_collapse_and_expand() {
        let f = fixture();
        let mut b = browser(&f);

        b.apply(Action::ToggleCollapse);
        assert_eq!(bodies(&b), vec!["A"]);
        assert_eq!(b.state.message.as_deref(), Some("Collapsed 3 replies"));

        b.apply(Action::ToggleCollapse);
        assert_eq!(bodies(&b).len(), 4);
    }

    #[test]
    fn test_leaf_collapse_reports_message() {
        let f = fixture();
        let mut b = browser(&f);
        b.apply(Action::Bottom);
        b.apply(Action::ToggleCollapse);
        assert_eq!(bodies(&b).len(), 4);
        assert_eq!(b.state.message.as_deref(), Some("No replies to collapse"));
    }

    #[test]
    fn test_reply_flow_reloads_thread() {
        let f = fixture();
        let mut b = browser(&f);
        b.apply(Action::Bottom);

        b.apply(Action::Reply);
        assert_eq!(b.state.mode, AppMode::Reply);
        assert!(b.selected().unwrap().reply_open);

        type_text(&mut b, "E");
        b.apply(Action::Submit);

        assert_eq!(b.state.mode, AppMode::Normal);
        assert_eq!(bodies(&b), vec!["A", "B", "C", "D", "E"]);
        assert_eq!(b.selected().unwrap().body, "E");
        assert_eq!(b.selected().unwrap().tree_depth, 2);
        assert!(b.rows().iter().all(|r| !r.reply_open));
        assert_eq!(b.thread().post.comment_count, 5);
    }

    #[test]
    fn test_cancel_reply_closes_form() {
        let f = fixture();
        let mut b = browser(&f);
        b.apply(Action::Reply);
        type_text(&mut b, "draft");
        b.apply(Action::Cancel);

        assert_eq!(b.state.mode, AppMode::Normal);
        assert!(!b.selected().unwrap().reply_open);
        assert_eq!(bodies(&b).len(), 4);
    }

    #[test]
    fn test_top_level_comment() {
        let f = fixture();
        let mut b = browser(&f);
        b.apply(Action::Comment);
        type_text(&mut b, "root two");
        b.apply(Action::Submit);

        assert_eq!(b.thread().comments.len(), 2);
        assert_eq!(b.selected().unwrap().body, "root two");
        assert_eq!(b.selected().unwrap().tree_depth, 0);
    }

    #[test]
    fn test_vote_toggles_score() {
        let f = fixture();
        let mut b = browser(&f);

        b.apply(Action::Vote(VoteDirection::Up));
        assert_eq!(b.selected().unwrap().score, 1);
        b.apply(Action::Vote(VoteDirection::Down));
        assert_eq!(b.selected().unwrap().score, -1);
        b.apply(Action::Vote(VoteDirection::Down));
        assert_eq!(b.selected().unwrap().score, 0);
    }

    #[test]
    fn test_delete_keeps_replies() {
        let f = fixture();
        let mut b = browser(&f);
        b.apply(Action::Delete);

        assert_eq!(bodies(&b), vec!["[deleted]", "B", "C", "D"]);

        b.apply(Action::Reply);
        assert_eq!(b.state.mode, AppMode::Normal);
        assert_eq!(
            b.state.message.as_deref(),
            Some("Cannot reply to a deleted comment")
        );
    }

    #[test]
    fn test_anonymous_browser_is_read_only() {
        let f = fixture();
        let mut b = ThreadBrowser::open(f.forum.clone(), f.post.clone(), None).unwrap();

        b.apply(Action::Vote(VoteDirection::Up));
        assert!(b.state.message.as_deref().unwrap().starts_with("Not signed in"));
        assert_eq!(b.selected().unwrap().score, 0);

        b.apply(Action::Reply);
        assert_eq!(b.state.mode, AppMode::Normal);
    }

    #[test]
    fn test_failed_delete_shows_error() {
        let f = fixture();
        let bob = UserId::from_string("bob").unwrap();
        let mut b = ThreadBrowser::open(f.forum.clone(), f.post.clone(), Some(bob)).unwrap();

        b.apply(Action::Delete);
        assert!(b.state.message.as_deref().unwrap().starts_with("Error: Delete failed"));
        assert_eq!(bodies(&b)[0], "A");
    }

    #[test]
    fn test_reload_keeps_collapse_state() {
        let f = fixture();
        let mut b = browser(&f);
        b.apply(Action::MoveDown);
        b.apply(Action::ToggleCollapse);
        assert_eq!(bodies(&b), vec!["A", "B", "D"]);

        f.forum.reply(&f.alice, &f.ids[3], "late").unwrap();
        b.apply(Action::Reload);
        assert_eq!(bodies(&b), vec!["A", "B", "D", "late"]);
        assert_eq!(b.selected().unwrap().id, f.ids[1]);
    }

    #[test]
    fn test_open_missing_post_fails() {
        let f = fixture();
        assert!(ThreadBrowser::open(f.forum.clone(), PostId::new(), None).is_err());
    }
}
