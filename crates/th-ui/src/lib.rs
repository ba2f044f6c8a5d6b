//! th-ui - Terminal thread browser for threadhub
//!
//! This crate provides the interactive view of one post and its comment
//! tree.
//!
//! # Overview
//!
//! The TUI provides:
//! - Indented comment tree with per-session collapse
//! - Inline reply editor
//! - Up/down voting and soft delete
//! - Status bar with transient messages
//!
//! All state changes go through [`ThreadBrowser`], which has no terminal
//! dependency; [`App`] only owns the terminal and draws the browser.
//!
//! # Example
//!
//! ```ignore
//! use th_ui::{App, ThreadBrowser, Theme};
//!
//! let browser = ThreadBrowser::open(forum, post_id, Some(user))?;
//! App::new(browser, Theme::default())?.run()?;
//! ```

pub mod app;
pub mod events;
pub mod render;
pub mod theme;

pub use app::{App, AppMode, AppState, ThreadBrowser};
pub use events::Action;
pub use theme::Theme;
