//! th-core - Core library for threadhub
//!
//! This crate provides the discussion core of the threadhub client: the
//! comment tree builder, the per-session thread view, the vote ledger, feed
//! ranking, the record-store abstraction and the forum service that ties
//! them together.

pub mod error;
pub mod types;
pub mod config;
pub mod store;
pub mod comment;
pub mod vote;
pub mod post;
pub mod thread;
pub mod forum;
pub mod export;

pub use error::{ThreadHubError, Result};
pub use types::*;
