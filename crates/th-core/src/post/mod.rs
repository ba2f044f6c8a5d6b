//! Posts, feed ranking and search

pub mod feed;
pub mod model;

pub use feed::{hot_score, rank_posts, search_comments, search_posts, FeedSort};
pub use model::{NewPost, Post, DEFAULT_COMMUNITY, MAX_TITLE_LENGTH};
